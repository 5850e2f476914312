// crates/lagoon-core/src/traits.rs

use crate::account::Address;
use crate::error::LagoonError;
use crate::units::{TokenId, Wei};

/// Trait for a fungible token ledger.
///
/// Implemented by the staking ledger's reward token and consumed by the
/// exchange, which moves balances via transfer and never mints. The
/// `spender` on `transfer_from` must hold a sufficient allowance from
/// `from`, standard fungible-asset semantics.
pub trait FungibleToken {
    /// Balance of an account (zero if unknown).
    fn balance_of(&self, account: &Address) -> Wei;

    /// Total minted supply.
    fn total_supply(&self) -> Wei;

    /// Remaining allowance granted by `owner` to `spender`.
    fn allowance(&self, owner: &Address, spender: &Address) -> Wei;

    /// Move `amount` from `from` to `to`. `from` authorizes the call.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Wei) -> Result<(), LagoonError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`,
    /// consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Wei,
    ) -> Result<(), LagoonError>;
}

/// Trait for a token collection with an exclusive per-token lock.
///
/// Implemented by the NFT ledger and consumed by the staking ledger. A
/// locked token cannot change owner; only the recorded operator may
/// unlock it. The staking ledger records itself as operator when it
/// stakes a token, which is how "locked because staked" stays
/// attributable to the staking component specifically.
pub trait LockableCollection {
    /// Current owner of a token, if it exists.
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;

    /// Whether the token's lock flag is set.
    fn is_locked(&self, token_id: TokenId) -> bool;

    /// All token ids currently owned by `owner`, ascending.
    fn tokens_of_owner(&self, owner: &Address) -> Vec<TokenId>;

    /// Lock a token, recording `operator` as the sole unlock authority.
    /// `principal` must be the token's owner; `approved_for_all` grants
    /// the operator a management capability over all of the owner's
    /// tokens (stored, not consulted by transfer checks).
    fn lock(
        &mut self,
        principal: &Address,
        token_id: TokenId,
        operator: &Address,
        approved_for_all: bool,
    ) -> Result<(), LagoonError>;

    /// Clear a token's lock. `caller` must equal the recorded operator.
    fn unlock(&mut self, caller: &Address, token_id: TokenId) -> Result<(), LagoonError>;
}
