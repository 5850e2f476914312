// crates/lagoon-nft/src/collection.rs
//
// The lockable NFT collection ledger.
//
// Tokens are minted sequentially from id 0 against an exact native
// payment, up to a fixed maximum supply (500 in the deployed
// configuration). Each token carries an exclusive lock flag: while locked,
// transfers are vetoed and only the recorded lock operator may clear the
// flag. Metadata seeds come from an external randomness source via a
// request/fulfill pair; image synthesis itself is out of scope here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lagoon_core::{
    Address, Bank, Event, EventLog, LagoonError, LockableCollection, TokenId, Wei,
};

/// Maximum number of tokens in the deployed configuration.
pub const DEFAULT_MAX_SUPPLY: u64 = 500;

/// Result of a successful mint: the assigned token id and the id of the
/// randomness request that will complete it via `fulfill_randomness`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub token_id: TokenId,
    pub request_id: u64,
}

/// Queryable snapshot of a single token's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token_id: TokenId,
    pub owner: Address,
    pub locked: bool,
    /// Lock operator, when locked.
    pub operator: Option<Address>,
    /// Randomness-derived metadata seed, once fulfilled.
    pub seed: Option<u64>,
}

/// Lock state of a single token.
#[derive(Debug, Clone)]
struct Lock {
    /// The only account permitted to clear this lock.
    operator: Address,
    /// Whether the operator may also manage all of the owner's tokens.
    /// Stored as a capability flag; transfer checks do not consult it.
    #[allow(dead_code)]
    approved_for_all: bool,
}

/// The lockable NFT collection.
pub struct NftCollection {
    /// Address the collection itself holds value under (mint proceeds).
    address: Address,
    /// Administrative owner of the collection.
    owner: Address,
    mint_price: Wei,
    max_supply: u64,
    /// External randomness source subscription parameter.
    subscription_id: u64,
    paused: bool,
    /// Next sequential token id; doubles as the total supply.
    next_id: TokenId,
    owners: HashMap<TokenId, Address>,
    locks: HashMap<TokenId, Lock>,
    /// Randomness-derived metadata seed per fulfilled token.
    seeds: HashMap<TokenId, u64>,
    /// Outstanding randomness requests: request id -> token id.
    pending_requests: HashMap<u64, TokenId>,
    next_request_id: u64,
    /// Mint payments accumulated and not yet withdrawn by the owner.
    proceeds: Wei,
    events: EventLog,
}

impl NftCollection {
    /// Create a collection with the default maximum supply.
    pub fn new(address: Address, owner: Address, mint_price: Wei, subscription_id: u64) -> Self {
        Self::with_max_supply(address, owner, mint_price, subscription_id, DEFAULT_MAX_SUPPLY)
    }

    /// Create a collection with an explicit maximum supply.
    pub fn with_max_supply(
        address: Address,
        owner: Address,
        mint_price: Wei,
        subscription_id: u64,
        max_supply: u64,
    ) -> Self {
        Self {
            address,
            owner,
            mint_price,
            max_supply,
            subscription_id,
            paused: false,
            next_id: 0,
            owners: HashMap::new(),
            locks: HashMap::new(),
            seeds: HashMap::new(),
            pending_requests: HashMap::new(),
            next_request_id: 1,
            proceeds: 0,
            events: EventLog::new(),
        }
    }

    fn ensure_admin(&self, caller: &Address) -> Result<(), LagoonError> {
        if *caller != self.owner {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the collection owner",
                caller
            )));
        }
        Ok(())
    }

    /// Mint the next sequential token to `caller` against an exact payment.
    ///
    /// Issues a randomness request for the token's metadata seed; the
    /// external source completes the mint via `fulfill_randomness`.
    ///
    /// # Errors
    /// - `ContractPaused` while the pause flag is set.
    /// - `InvalidPayment` if `payment` differs from the mint price in
    ///   either direction.
    /// - `CapacityExceeded` once the maximum supply is minted.
    /// - `InvalidAmount` if the caller cannot fund the payment.
    pub fn mint(
        &mut self,
        bank: &mut Bank,
        caller: &Address,
        payment: Wei,
    ) -> Result<MintReceipt, LagoonError> {
        if self.paused {
            return Err(LagoonError::ContractPaused(
                "minting is paused".to_string(),
            ));
        }
        if payment != self.mint_price {
            return Err(LagoonError::InvalidPayment(format!(
                "mint requires exactly {} wei, got {} wei",
                self.mint_price, payment
            )));
        }
        if self.next_id >= self.max_supply {
            return Err(LagoonError::CapacityExceeded(format!(
                "all {} tokens minted",
                self.max_supply
            )));
        }
        if bank.balance_of(caller) < payment {
            return Err(LagoonError::InvalidAmount(format!(
                "caller balance below mint price of {} wei",
                payment
            )));
        }

        let token_id = self.next_id;
        self.next_id += 1;
        self.owners.insert(token_id, *caller);
        self.proceeds += payment;

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_requests.insert(request_id, token_id);
        self.events.record(Event::MintRequested {
            request_id,
            token_id,
        });

        // Value moves last; all guard state above is already committed.
        bank.transfer(caller, &self.address, payment)?;
        Ok(MintReceipt {
            token_id,
            request_id,
        })
    }

    /// Complete a mint with the randomness word supplied by the external
    /// source. Stores the metadata seed for the requested token.
    ///
    /// # Errors
    /// Returns `InvalidState` for an unknown or already-fulfilled request.
    pub fn fulfill_randomness(
        &mut self,
        request_id: u64,
        word: u64,
    ) -> Result<TokenId, LagoonError> {
        let token_id = self.pending_requests.remove(&request_id).ok_or_else(|| {
            LagoonError::InvalidState(format!("unknown randomness request {}", request_id))
        })?;
        self.seeds.insert(token_id, word);
        self.events.record(Event::MintCompleted { token_id });
        Ok(token_id)
    }

    /// Lock a token, recording `operator` as its sole unlock authority.
    ///
    /// # Errors
    /// - `Unauthorized` unless `principal` owns the token.
    /// - `InvalidState` if the token does not exist or is already locked.
    pub fn lock_token(
        &mut self,
        principal: &Address,
        token_id: TokenId,
        operator: &Address,
        approved_for_all: bool,
    ) -> Result<(), LagoonError> {
        let owner = self.require_token(token_id)?;
        if owner != *principal {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the owner of token {}",
                principal, token_id
            )));
        }
        if self.locks.contains_key(&token_id) {
            return Err(LagoonError::InvalidState(format!(
                "token {} is already locked",
                token_id
            )));
        }
        self.locks.insert(
            token_id,
            Lock {
                operator: *operator,
                approved_for_all,
            },
        );
        self.events.record(Event::TokenLocked {
            token_id,
            operator: *operator,
        });
        Ok(())
    }

    /// Clear a token's lock. Only the recorded operator may call this.
    pub fn unlock_token(&mut self, caller: &Address, token_id: TokenId) -> Result<(), LagoonError> {
        self.require_token(token_id)?;
        let lock = self.locks.get(&token_id).ok_or_else(|| {
            LagoonError::InvalidState(format!("token {} is not locked", token_id))
        })?;
        if lock.operator != *caller {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the lock operator of token {}",
                caller, token_id
            )));
        }
        self.locks.remove(&token_id);
        self.events.record(Event::TokenUnlocked { token_id });
        Ok(())
    }

    /// Transfer ownership of an unlocked token.
    ///
    /// # Errors
    /// - `InvalidState` if the token is locked (`TokenLocked` veto).
    /// - `Unauthorized` unless the caller is the current owner (`from`).
    pub fn transfer_token(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        token_id: TokenId,
    ) -> Result<(), LagoonError> {
        let owner = self.require_token(token_id)?;
        if self.locks.contains_key(&token_id) {
            return Err(LagoonError::InvalidState(format!(
                "token {} is locked",
                token_id
            )));
        }
        if owner != *from || caller != from {
            return Err(LagoonError::Unauthorized(format!(
                "{} may not transfer token {}",
                caller, token_id
            )));
        }
        self.owners.insert(token_id, *to);
        self.events.record(Event::TokenTransferred {
            token_id,
            from: *from,
            to: *to,
        });
        Ok(())
    }

    /// Pay all accumulated mint proceeds to the collection owner. Any
    /// account may trigger this; the funds always go to the owner.
    pub fn withdraw_funds(&mut self, bank: &mut Bank, _caller: &Address) -> Result<Wei, LagoonError> {
        let amount = self.proceeds;
        self.proceeds = 0;
        self.events.record(Event::FundsWithdrawn { amount });
        bank.transfer(&self.address, &self.owner, amount)?;
        Ok(amount)
    }

    /// Toggle the pause flag gating `mint`. Owner-gated.
    pub fn toggle_pause(&mut self, caller: &Address) -> Result<bool, LagoonError> {
        self.ensure_admin(caller)?;
        self.paused = !self.paused;
        self.events.record(Event::PauseToggled {
            paused: self.paused,
        });
        Ok(self.paused)
    }

    /// Update the mint price. Owner-gated.
    pub fn update_mint_price(&mut self, caller: &Address, new_price: Wei) -> Result<(), LagoonError> {
        self.ensure_admin(caller)?;
        self.mint_price = new_price;
        self.events.record(Event::MintPriceUpdated { new_price });
        Ok(())
    }

    /// Update the external randomness source subscription. Owner-gated.
    pub fn update_subscription_id(
        &mut self,
        caller: &Address,
        new_id: u64,
    ) -> Result<(), LagoonError> {
        self.ensure_admin(caller)?;
        self.subscription_id = new_id;
        Ok(())
    }

    fn require_token(&self, token_id: TokenId) -> Result<Address, LagoonError> {
        self.owners.get(&token_id).copied().ok_or_else(|| {
            LagoonError::InvalidState(format!("token {} does not exist", token_id))
        })
    }

    // --- query surface ---

    pub fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    pub fn is_token_locked(&self, token_id: TokenId) -> bool {
        self.locks.contains_key(&token_id)
    }

    /// Number of tokens minted so far.
    pub fn total_supply(&self) -> u64 {
        self.next_id
    }

    /// Number of tokens owned by `owner`.
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.owners.values().filter(|o| *o == owner).count() as u64
    }

    /// Token ids owned by `owner`, ascending.
    pub fn owned_tokens(&self, owner: &Address) -> Vec<TokenId> {
        let mut ids: Vec<TokenId> = self
            .owners
            .iter()
            .filter(|(_, o)| *o == owner)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn mint_price(&self) -> Wei {
        self.mint_price
    }

    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn subscription_id(&self) -> u64 {
        self.subscription_id
    }

    /// Metadata seed of a fulfilled token.
    pub fn seed_of(&self, token_id: TokenId) -> Option<u64> {
        self.seeds.get(&token_id).copied()
    }

    /// Snapshot of a token's state, if it exists.
    pub fn token_info(&self, token_id: TokenId) -> Option<TokenInfo> {
        let owner = self.owner_of(token_id)?;
        Some(TokenInfo {
            token_id,
            owner,
            locked: self.is_token_locked(token_id),
            operator: self.locks.get(&token_id).map(|l| l.operator),
            seed: self.seed_of(token_id),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}

impl LockableCollection for NftCollection {
    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        NftCollection::owner_of(self, token_id)
    }

    fn is_locked(&self, token_id: TokenId) -> bool {
        self.is_token_locked(token_id)
    }

    fn tokens_of_owner(&self, owner: &Address) -> Vec<TokenId> {
        self.owned_tokens(owner)
    }

    fn lock(
        &mut self,
        principal: &Address,
        token_id: TokenId,
        operator: &Address,
        approved_for_all: bool,
    ) -> Result<(), LagoonError> {
        self.lock_token(principal, token_id, operator, approved_for_all)
    }

    fn unlock(&mut self, caller: &Address, token_id: TokenId) -> Result<(), LagoonError> {
        self.unlock_token(caller, token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lagoon_core::WEI_PER_COIN;

    const MINT_PRICE: Wei = WEI_PER_COIN / 2; // 0.5 coin, dev-chain config

    fn setup() -> (Bank, NftCollection, Address, Address) {
        let mut bank = Bank::new();
        let admin = Address::random();
        let user = Address::random();
        bank.deposit(&admin, 1_000 * WEI_PER_COIN);
        bank.deposit(&user, 1_000 * WEI_PER_COIN);
        let nft = NftCollection::new(Address::random(), admin, MINT_PRICE, 488);
        (bank, nft, admin, user)
    }

    #[test]
    fn test_constructor_configuration() {
        let (_, nft, _, _) = setup();
        assert_eq!(nft.mint_price(), MINT_PRICE);
        assert_eq!(nft.max_supply(), 500);
        assert_eq!(nft.total_supply(), 0);
        assert!(!nft.is_paused());
    }

    #[test]
    fn test_mint_with_exact_price() {
        let (mut bank, mut nft, _, user) = setup();
        let receipt = nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        assert_eq!(receipt.token_id, 0);
        assert_eq!(nft.total_supply(), 1);
        assert_eq!(nft.balance_of(&user), 1);
        assert_eq!(nft.owner_of(0), Some(user));
        assert_eq!(bank.balance_of(nft.address()), MINT_PRICE);
    }

    #[test]
    fn test_mint_incorrect_price_rejected() {
        let (mut bank, mut nft, _, user) = setup();
        let low = nft.mint(&mut bank, &user, MINT_PRICE - 1);
        assert!(matches!(low, Err(LagoonError::InvalidPayment(_))));
        let high = nft.mint(&mut bank, &user, MINT_PRICE + 1);
        assert!(matches!(high, Err(LagoonError::InvalidPayment(_))));
        assert_eq!(nft.total_supply(), 0);
    }

    #[test]
    fn test_mint_ids_are_sequential() {
        let (mut bank, mut nft, _, user) = setup();
        for expected in 0..5 {
            let receipt = nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
            assert_eq!(receipt.token_id, expected);
        }
        assert_eq!(nft.owned_tokens(&user), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mint_sold_out() {
        let mut bank = Bank::new();
        let admin = Address::random();
        bank.deposit(&admin, 100 * WEI_PER_COIN);
        let mut nft =
            NftCollection::with_max_supply(Address::random(), admin, MINT_PRICE, 488, 3);
        for _ in 0..3 {
            nft.mint(&mut bank, &admin, MINT_PRICE).unwrap();
        }
        let result = nft.mint(&mut bank, &admin, MINT_PRICE);
        assert!(matches!(result, Err(LagoonError::CapacityExceeded(_))));
        assert_eq!(nft.total_supply(), 3);
    }

    #[test]
    fn test_mint_emits_request_then_fulfill_completes() {
        let (mut bank, mut nft, _, user) = setup();
        let receipt = nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        assert_eq!(receipt.request_id, 1);
        assert_eq!(
            nft.events()[0],
            Event::MintRequested {
                request_id: receipt.request_id,
                token_id: receipt.token_id
            }
        );

        let fulfilled = nft.fulfill_randomness(receipt.request_id, 0xfeed).unwrap();
        assert_eq!(fulfilled, receipt.token_id);
        assert_eq!(nft.seed_of(0), Some(0xfeed));
        assert_eq!(nft.events()[1], Event::MintCompleted { token_id: 0 });

        // Second fulfill of the same request is rejected
        assert!(nft.fulfill_randomness(receipt.request_id, 0xfeed).is_err());
    }

    #[test]
    fn test_mint_receipts_pair_sequential_ids() {
        let (mut bank, mut nft, _, user) = setup();
        for n in 0..3 {
            let receipt = nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
            assert_eq!(receipt.token_id, n);
            assert_eq!(receipt.request_id, n + 1);
            assert_eq!(nft.fulfill_randomness(receipt.request_id, n).unwrap(), n);
        }
    }

    #[test]
    fn test_withdraw_funds_pays_owner_regardless_of_caller() {
        let (mut bank, mut nft, admin, user) = setup();
        nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        let admin_before = bank.balance_of(&admin);

        let paid = nft.withdraw_funds(&mut bank, &user).unwrap();
        assert_eq!(paid, MINT_PRICE);
        assert_eq!(bank.balance_of(&admin), admin_before + MINT_PRICE);
        assert_eq!(bank.balance_of(nft.address()), 0);
    }

    #[test]
    fn test_lock_requires_token_owner() {
        let (mut bank, mut nft, _, user) = setup();
        nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        let other = Address::random();
        let result = nft.lock_token(&other, 0, &other, false);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }

    #[test]
    fn test_locked_token_cannot_transfer() {
        let (mut bank, mut nft, _, user) = setup();
        nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        let operator = Address::random();
        nft.lock_token(&user, 0, &operator, false).unwrap();
        assert!(nft.is_token_locked(0));

        let to = Address::random();
        let result = nft.transfer_token(&user, &user, &to, 0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
        assert_eq!(nft.owner_of(0), Some(user));
    }

    #[test]
    fn test_unlock_then_transfer() {
        let (mut bank, mut nft, _, user) = setup();
        nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        let operator = Address::random();
        nft.lock_token(&user, 0, &operator, false).unwrap();
        nft.unlock_token(&operator, 0).unwrap();
        assert!(!nft.is_token_locked(0));

        let to = Address::random();
        nft.transfer_token(&user, &user, &to, 0).unwrap();
        assert_eq!(nft.owner_of(0), Some(to));
    }

    #[test]
    fn test_unlock_requires_recorded_operator() {
        let (mut bank, mut nft, _, user) = setup();
        nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        let operator = Address::random();
        nft.lock_token(&user, 0, &operator, false).unwrap();

        // Not even the token owner may unlock
        let result = nft.unlock_token(&user, 0);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
        assert!(nft.is_token_locked(0));
    }

    #[test]
    fn test_double_lock_rejected() {
        let (mut bank, mut nft, _, user) = setup();
        nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        let operator = Address::random();
        nft.lock_token(&user, 0, &operator, false).unwrap();
        let result = nft.lock_token(&user, 0, &operator, false);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_pause_gates_mint() {
        let (mut bank, mut nft, admin, user) = setup();
        assert!(nft.toggle_pause(&admin).unwrap());
        let result = nft.mint(&mut bank, &user, MINT_PRICE);
        assert!(matches!(result, Err(LagoonError::ContractPaused(_))));

        assert!(!nft.toggle_pause(&admin).unwrap());
        assert!(nft.mint(&mut bank, &user, MINT_PRICE).is_ok());
    }

    #[test]
    fn test_pause_is_owner_gated() {
        let (_, mut nft, _, user) = setup();
        let result = nft.toggle_pause(&user);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }

    #[test]
    fn test_update_mint_price() {
        let (mut bank, mut nft, admin, user) = setup();
        let new_price = WEI_PER_COIN / 50; // 0.02 coin
        nft.update_mint_price(&admin, new_price).unwrap();
        assert_eq!(nft.mint_price(), new_price);
        assert!(nft.mint(&mut bank, &user, new_price).is_ok());

        let result = nft.update_mint_price(&user, WEI_PER_COIN);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }

    #[test]
    fn test_update_subscription_id() {
        let (_, mut nft, admin, user) = setup();
        nft.update_subscription_id(&admin, 1000).unwrap();
        assert_eq!(nft.subscription_id(), 1000);

        let result = nft.update_subscription_id(&user, 2000);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }
}
