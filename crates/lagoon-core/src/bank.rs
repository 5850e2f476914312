// crates/lagoon-core/src/bank.rs
//
// Native-currency ledger.
//
// All native value movement in the system goes through the Bank: mint
// payments, exchange deposits and payouts, and owner withdrawals. Ledger
// operations mutate their own guard state first and only then move value
// here, so a transfer is always the last step of an operation and its
// outcome never feeds back into already-committed state.

use std::collections::HashMap;

use crate::account::Address;
use crate::error::LagoonError;
use crate::units::Wei;

/// Per-account native currency balances.
#[derive(Debug, Default)]
pub struct Bank {
    balances: HashMap<Address, Wei>,
}

impl Bank {
    /// Create a new bank with no balances.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Get the native balance of an account (zero if unknown).
    pub fn balance_of(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credit an account out of thin air. Harness/faucet use only; real
    /// value movement between accounts goes through `transfer`.
    pub fn deposit(&mut self, account: &Address, amount: Wei) {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Move native currency between two accounts.
    ///
    /// # Errors
    /// Returns `LagoonError::InvalidAmount` if `from` has insufficient
    /// balance.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<(), LagoonError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LagoonError::InvalidAmount(format!(
                "insufficient native balance: {} has {} wei, needs {} wei",
                from, from_balance, amount
            )));
        }
        self.balances.insert(*from, from_balance - amount);
        let to_balance = self.balances.entry(*to).or_insert(0);
        *to_balance += amount;
        Ok(())
    }
}
