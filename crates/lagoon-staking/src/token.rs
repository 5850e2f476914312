// crates/lagoon-staking/src/token.rs
//
// The fungible reward token.
//
// A standard balance ledger with allowances. Minting is crate-internal:
// only the staking ledger mints, when an account claims accrued rewards.
// The exchange and other holders move balances via transfer/transfer_from.

use std::collections::HashMap;

use lagoon_core::{Address, FungibleToken, LagoonError, Wei};

/// The reward token balance ledger.
#[derive(Debug, Default)]
pub struct RewardToken {
    balances: HashMap<Address, Wei>,
    allowances: HashMap<(Address, Address), Wei>,
    total_supply: Wei,
}

impl RewardToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint new tokens to `account`. Crate-internal: only reward claims
    /// create supply.
    pub(crate) fn mint(&mut self, account: &Address, amount: Wei) {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance += amount;
        self.total_supply += amount;
    }

    /// Grant `spender` the right to move up to `amount` of the caller's
    /// balance via `transfer_from`. Overwrites any previous allowance.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Wei) {
        self.allowances.insert((*owner, *spender), amount);
    }

    fn debit(&mut self, from: &Address, amount: Wei) -> Result<(), LagoonError> {
        let balance = self.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(LagoonError::InvalidAmount(format!(
                "insufficient reward token balance: {} has {} wei, needs {} wei",
                from, balance, amount
            )));
        }
        self.balances.insert(*from, balance - amount);
        Ok(())
    }

    fn credit(&mut self, to: &Address, amount: Wei) {
        let balance = self.balances.entry(*to).or_insert(0);
        *balance += amount;
    }
}

impl FungibleToken for RewardToken {
    fn balance_of(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Wei {
        self.total_supply
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Wei {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<(), LagoonError> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Wei,
    ) -> Result<(), LagoonError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LagoonError::InvalidAmount(format!(
                "allowance of {} wei is below requested {} wei",
                allowed, amount
            )));
        }
        self.debit(from, amount)?;
        self.allowances.insert((*from, *spender), allowed - amount);
        self.credit(to, amount);
        Ok(())
    }
}
