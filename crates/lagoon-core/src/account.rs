// crates/lagoon-core/src/account.rs

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte ledger address.
///
/// Every account on the chain is identified by an address, including the
/// deployed ledger components themselves: the NFT collection, the staking
/// ledger, and the exchange each hold value under their own address, so
/// proceeds, reward-token reserves, and native reserves are attributable
/// the same way user balances are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address. Used as the cleared lock-operator value.
    pub fn zero() -> Self {
        Self([0u8; 20])
    }

    /// Generate a fresh random address (harness and test account setup).
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Construct an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address_display() {
        let addr = Address::zero();
        assert_eq!(format!("{}", addr), format!("0x{}", "00".repeat(20)));
    }

    #[test]
    fn test_random_addresses_differ() {
        let a = Address::random();
        let b = Address::random();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_hex() {
        let addr = Address::from_bytes([0xab; 20]);
        assert_eq!(format!("{}", addr), format!("0x{}", "ab".repeat(20)));
    }
}
