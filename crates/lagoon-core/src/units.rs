// crates/lagoon-core/src/units.rs
//
// Monetary units for the Lagoon Protocol.
//
// The smallest unit of both the native currency and the reward token is
// the "wei". 1 coin = 10^18 wei. All internal accounting uses integer wei
// to avoid floating-point precision issues in ledger calculations; u128 is
// required because reserve products (E * T) overflow u64 at 18 decimals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of wei in one coin. 1 coin = 10^18 wei.
pub const WEI_PER_COIN: u128 = 1_000_000_000_000_000_000;

/// Type alias for wei — the smallest unit of any Lagoon ledger amount.
pub type Wei = u128;

/// Identifier of a non-fungible token. Assigned sequentially from 0.
pub type TokenId = u64;

/// A coin-denominated amount (native currency, reward token, or
/// liquidity-position token).
///
/// Wraps an amount in wei. All arithmetic is performed in integer wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coins {
    /// Amount in wei (1 coin = 10^18 wei).
    pub wei: Wei,
}

impl Coins {
    /// Create an amount from a whole coin value (as f64).
    ///
    /// # Example
    /// ```
    /// use lagoon_core::units::Coins;
    /// let amount = Coins::from_coins(0.5);
    /// assert_eq!(amount.wei, 500_000_000_000_000_000);
    /// ```
    pub fn from_coins(amount: f64) -> Self {
        Self {
            wei: (amount * WEI_PER_COIN as f64) as u128,
        }
    }

    /// Create an amount from a wei value.
    pub fn from_wei(wei: Wei) -> Self {
        Self { wei }
    }

    /// Convert this amount to coins as a floating-point value.
    pub fn to_coins(&self) -> f64 {
        self.wei as f64 / WEI_PER_COIN as f64
    }

    /// Returns zero coins.
    pub fn zero() -> Self {
        Self { wei: 0 }
    }
}

impl Add for Coins {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            wei: self.wei + rhs.wei,
        }
    }
}

impl Sub for Coins {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            wei: self.wei.saturating_sub(rhs.wei),
        }
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.wei / WEI_PER_COIN;
        let frac = self.wei % WEI_PER_COIN;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            // Display up to 18 decimal places, trimming trailing zeros
            let frac_str = format!("{:018}", frac);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{}.{}", whole, trimmed)
        }
    }
}
