// crates/lagoon-staking/src/ledger.rs
//
// The staking ledger.
//
// Per-account stake records track which token ids are staked, the last
// accrual timestamp, and the accrued-but-unclaimed reward balance. Every
// state-changing call settles the elapsed interval BEFORE mutating the
// staked count, so reward for the interval just ended is priced at the
// count that was valid during it.
//
// The coupling to the NFT ledger is an explicit operator identity: when
// a token is staked, this ledger locks it with its own address recorded
// as the sole unlock authority. A token is "staked" if and only if it is
// in some account's record, which holds exactly while its lock resolves
// back to this ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lagoon_core::{
    Address, Event, EventLog, FungibleToken, LagoonError, LockableCollection, TokenId, Wei,
};

use crate::accrual::accrued_over;
use crate::token::RewardToken;

/// Per-account staking state. Created implicitly on first stake; the
/// timestamp and accrued fields persist across zero-stake periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Currently staked token ids, in stake order.
    pub token_ids: Vec<TokenId>,
    /// Unix timestamp of the last accrual settlement.
    pub last_accrual_ts: u64,
    /// Accrued-but-unclaimed reward (wei).
    pub accrued: Wei,
}

impl StakeRecord {
    fn new(now: u64) -> Self {
        Self {
            token_ids: Vec::new(),
            last_accrual_ts: now,
            accrued: 0,
        }
    }
}

/// The staking ledger and the reward token it mints.
pub struct StakingLedger {
    /// Address this ledger locks tokens under (the recorded operator).
    address: Address,
    /// Administrative owner.
    owner: Address,
    /// Reward rate in wei per staked token per day.
    reward_per_day: Wei,
    records: HashMap<Address, StakeRecord>,
    /// Which account staked each token. A token id appears here for at
    /// most one account at a time.
    staker_of: HashMap<TokenId, Address>,
    token: RewardToken,
    events: EventLog,
}

impl StakingLedger {
    pub fn new(address: Address, owner: Address, reward_per_day: Wei) -> Self {
        Self {
            address,
            owner,
            reward_per_day,
            records: HashMap::new(),
            staker_of: HashMap::new(),
            token: RewardToken::new(),
            events: EventLog::new(),
        }
    }

    /// Settle the elapsed interval for `account` at the current rate and
    /// advance its timestamp. Must run before any staked-count change.
    fn settle(&mut self, account: &Address, now: u64) -> Result<(), LagoonError> {
        let rate = self.reward_per_day;
        let record = self
            .records
            .entry(*account)
            .or_insert_with(|| StakeRecord::new(now));
        let elapsed = now.saturating_sub(record.last_accrual_ts);
        let earned = accrued_over(rate, record.token_ids.len() as u64, elapsed)?;
        record.accrued += earned;
        record.last_accrual_ts = now;
        Ok(())
    }

    /// Stake a single token: settle accrual, lock the token with this
    /// ledger as operator, and add it to the caller's record.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller does not own the token.
    /// - `InvalidState` if the token is already staked here, or locked
    ///   by a different operator.
    pub fn stake<C: LockableCollection>(
        &mut self,
        collection: &mut C,
        caller: &Address,
        token_id: TokenId,
        now: u64,
    ) -> Result<(), LagoonError> {
        let owner = collection.owner_of(token_id).ok_or_else(|| {
            LagoonError::InvalidState(format!("token {} does not exist", token_id))
        })?;
        if owner != *caller {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the owner of token {}",
                caller, token_id
            )));
        }
        if self.staker_of.contains_key(&token_id) {
            return Err(LagoonError::InvalidState(format!(
                "token {} is already staked",
                token_id
            )));
        }
        if collection.is_locked(token_id) {
            return Err(LagoonError::InvalidState(format!(
                "token {} is locked",
                token_id
            )));
        }

        self.settle(caller, now)?;
        collection.lock(caller, token_id, &self.address, true)?;
        self.add_staked(caller, token_id);
        Ok(())
    }

    /// Stake every eligible (owned and unlocked) token of the caller.
    ///
    /// # Errors
    /// Returns `InvalidState` if the caller holds no eligible tokens.
    pub fn stake_all<C: LockableCollection>(
        &mut self,
        collection: &mut C,
        caller: &Address,
        now: u64,
    ) -> Result<Vec<TokenId>, LagoonError> {
        let eligible: Vec<TokenId> = collection
            .tokens_of_owner(caller)
            .into_iter()
            .filter(|id| !collection.is_locked(*id))
            .collect();
        if eligible.is_empty() {
            return Err(LagoonError::InvalidState(
                "nothing to stake".to_string(),
            ));
        }

        self.settle(caller, now)?;
        for &token_id in &eligible {
            collection.lock(caller, token_id, &self.address, true)?;
            self.add_staked(caller, token_id);
        }
        Ok(eligible)
    }

    /// Unstake a single token: settle accrual, unlock it, and remove it
    /// from the caller's record.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller does not own the token.
    /// - `InvalidState` if the token is not staked by the caller.
    pub fn unstake<C: LockableCollection>(
        &mut self,
        collection: &mut C,
        caller: &Address,
        token_id: TokenId,
        now: u64,
    ) -> Result<(), LagoonError> {
        let owner = collection.owner_of(token_id).ok_or_else(|| {
            LagoonError::InvalidState(format!("token {} does not exist", token_id))
        })?;
        if owner != *caller {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the owner of token {}",
                caller, token_id
            )));
        }
        if self.staker_of.get(&token_id) != Some(caller) {
            return Err(LagoonError::InvalidState(format!(
                "token {} is not staked",
                token_id
            )));
        }

        self.settle(caller, now)?;
        collection.unlock(&self.address, token_id)?;
        self.remove_staked(caller, token_id);
        Ok(())
    }

    /// Unstake every token in the caller's staked set.
    ///
    /// # Errors
    /// Returns `InvalidState` if the caller's staked set is empty.
    pub fn unstake_all<C: LockableCollection>(
        &mut self,
        collection: &mut C,
        caller: &Address,
        now: u64,
    ) -> Result<Vec<TokenId>, LagoonError> {
        let staked: Vec<TokenId> = self
            .records
            .get(caller)
            .map(|r| r.token_ids.clone())
            .unwrap_or_default();
        if staked.is_empty() {
            return Err(LagoonError::InvalidState(
                "nothing to unstake".to_string(),
            ));
        }

        self.settle(caller, now)?;
        for &token_id in &staked {
            collection.unlock(&self.address, token_id)?;
            self.remove_staked(caller, token_id);
        }
        Ok(staked)
    }

    /// Settle and mint the full accrued balance to the caller.
    ///
    /// # Errors
    /// Returns `InvalidState` if nothing has accrued.
    pub fn claim_rewards(&mut self, caller: &Address, now: u64) -> Result<Wei, LagoonError> {
        self.settle(caller, now)?;
        let record = self.records.get_mut(caller).ok_or_else(|| {
            LagoonError::InvalidState("nothing to claim".to_string())
        })?;
        let amount = record.accrued;
        if amount == 0 {
            return Err(LagoonError::InvalidState(
                "nothing to claim".to_string(),
            ));
        }
        record.accrued = 0;
        self.token.mint(caller, amount);
        self.events.record(Event::RewardsClaimed {
            account: *caller,
            amount,
        });
        Ok(amount)
    }

    /// Update the reward rate. Owner-gated. Every account's outstanding
    /// interval is settled at the old rate first, so past elapsed time is
    /// never repriced.
    pub fn update_reward_per_day(
        &mut self,
        caller: &Address,
        new_rate: Wei,
        now: u64,
    ) -> Result<(), LagoonError> {
        if *caller != self.owner {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the staking ledger owner",
                caller
            )));
        }
        let accounts: Vec<Address> = self.records.keys().copied().collect();
        for account in accounts {
            self.settle(&account, now)?;
        }
        self.reward_per_day = new_rate;
        self.events.record(Event::RewardRateUpdated { new_rate });
        Ok(())
    }

    fn add_staked(&mut self, account: &Address, token_id: TokenId) {
        // settle() has already created the record for this account
        if let Some(record) = self.records.get_mut(account) {
            record.token_ids.push(token_id);
        }
        self.staker_of.insert(token_id, *account);
        self.events.record(Event::Staked {
            account: *account,
            token_id,
        });
    }

    fn remove_staked(&mut self, account: &Address, token_id: TokenId) {
        if let Some(record) = self.records.get_mut(account) {
            record.token_ids.retain(|id| *id != token_id);
        }
        self.staker_of.remove(&token_id);
        self.events.record(Event::Unstaked {
            account: *account,
            token_id,
        });
    }

    // --- query surface ---

    /// Accrued rewards as of `now`, including the unsettled interval.
    /// Read-only; does not advance the account's timestamp.
    pub fn get_available_rewards(&self, account: &Address, now: u64) -> Result<Wei, LagoonError> {
        let Some(record) = self.records.get(account) else {
            return Ok(0);
        };
        let elapsed = now.saturating_sub(record.last_accrual_ts);
        let pending = accrued_over(self.reward_per_day, record.token_ids.len() as u64, elapsed)?;
        Ok(record.accrued + pending)
    }

    pub fn is_token_staked(&self, token_id: TokenId) -> bool {
        self.staker_of.contains_key(&token_id)
    }

    /// Number of tokens currently staked by `account`.
    pub fn staked_amount(&self, account: &Address) -> u64 {
        self.records
            .get(account)
            .map(|r| r.token_ids.len() as u64)
            .unwrap_or(0)
    }

    /// Token ids currently staked by `account`, in stake order.
    pub fn staked_token_ids(&self, account: &Address) -> Vec<TokenId> {
        self.records
            .get(account)
            .map(|r| r.token_ids.clone())
            .unwrap_or_default()
    }

    pub fn reward_per_day(&self) -> Wei {
        self.reward_per_day
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The fungible reward token ledger.
    pub fn token(&self) -> &RewardToken {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut RewardToken {
        &mut self.token
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accrual::{DEFAULT_REWARD_PER_DAY, SECONDS_PER_DAY};
    use lagoon_core::{Bank, WEI_PER_COIN};
    use lagoon_nft::NftCollection;

    const MINT_PRICE: Wei = WEI_PER_COIN / 2;
    const T0: u64 = 1_700_000_000;

    /// Mint three tokens to `user` and wire a fresh staking ledger.
    fn setup() -> (NftCollection, StakingLedger, Address, Address) {
        let mut bank = Bank::new();
        let admin = Address::random();
        let user = Address::random();
        bank.deposit(&user, 100 * WEI_PER_COIN);
        let mut nft = NftCollection::new(Address::random(), admin, MINT_PRICE, 488);
        for _ in 0..3 {
            nft.mint(&mut bank, &user, MINT_PRICE).unwrap();
        }
        let staking = StakingLedger::new(Address::random(), admin, DEFAULT_REWARD_PER_DAY);
        (nft, staking, admin, user)
    }

    #[test]
    fn test_constructor_reward_rate() {
        let (_, staking, _, _) = setup();
        assert_eq!(staking.reward_per_day(), 10 * WEI_PER_COIN);
    }

    #[test]
    fn test_update_reward_rate_owner_gated() {
        let (_, mut staking, admin, user) = setup();
        staking
            .update_reward_per_day(&admin, 11 * WEI_PER_COIN, T0)
            .unwrap();
        assert_eq!(staking.reward_per_day(), 11 * WEI_PER_COIN);

        let result = staking.update_reward_per_day(&user, 12 * WEI_PER_COIN, T0);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }

    #[test]
    fn test_rate_update_settles_old_interval_at_old_rate() {
        let (mut nft, mut staking, admin, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();

        // One day at 10/day, then the rate doubles
        staking
            .update_reward_per_day(&admin, 20 * WEI_PER_COIN, T0 + SECONDS_PER_DAY)
            .unwrap();
        // One more day at 20/day
        let available = staking
            .get_available_rewards(&user, T0 + 2 * SECONDS_PER_DAY)
            .unwrap();
        assert_eq!(available, 30 * WEI_PER_COIN);
    }

    #[test]
    fn test_stake_updates_details() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();

        assert!(nft.is_token_locked(0));
        assert!(staking.is_token_staked(0));
        assert_eq!(staking.staked_amount(&user), 1);
        assert_eq!(staking.staked_token_ids(&user), vec![0]);
    }

    #[test]
    fn test_stake_already_staked() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();
        let result = staking.stake(&mut nft, &user, 0, T0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_stake_externally_locked_token() {
        let (mut nft, mut staking, _, user) = setup();
        let other = Address::random();
        nft.lock_token(&user, 0, &other, false).unwrap();
        let result = staking.stake(&mut nft, &user, 0, T0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
        assert!(!staking.is_token_staked(0));
    }

    #[test]
    fn test_stake_not_token_owner() {
        let (mut nft, mut staking, _, _) = setup();
        let stranger = Address::random();
        let result = staking.stake(&mut nft, &stranger, 0, T0);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }

    #[test]
    fn test_stake_all() {
        let (mut nft, mut staking, _, user) = setup();
        let staked = staking.stake_all(&mut nft, &user, T0).unwrap();
        assert_eq!(staked, vec![0, 1, 2]);
        for id in 0..3 {
            assert!(nft.is_token_locked(id));
            assert!(staking.is_token_staked(id));
        }
        assert_eq!(staking.staked_amount(&user), 3);
    }

    #[test]
    fn test_stake_all_nothing_to_stake() {
        let (mut nft, mut staking, _, _) = setup();
        let stranger = Address::random();
        let result = staking.stake_all(&mut nft, &stranger, T0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_unstake() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();
        staking
            .unstake(&mut nft, &user, 0, T0 + SECONDS_PER_DAY)
            .unwrap();

        assert!(!nft.is_token_locked(0));
        assert!(!staking.is_token_staked(0));
        assert_eq!(staking.staked_amount(&user), 0);
        // Accrual from the staked day survives the unstake
        let rewards = staking
            .get_available_rewards(&user, T0 + SECONDS_PER_DAY)
            .unwrap();
        assert_eq!(rewards, 10 * WEI_PER_COIN);
    }

    #[test]
    fn test_unstake_already_unstaked() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();
        staking.unstake(&mut nft, &user, 0, T0).unwrap();
        let result = staking.unstake(&mut nft, &user, 0, T0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_unstake_not_token_owner() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();
        let stranger = Address::random();
        let result = staking.unstake(&mut nft, &stranger, 0, T0);
        assert!(matches!(result, Err(LagoonError::Unauthorized(_))));
    }

    #[test]
    fn test_unstake_all() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();
        staking.stake(&mut nft, &user, 1, T0).unwrap();
        let unstaked = staking
            .unstake_all(&mut nft, &user, T0 + SECONDS_PER_DAY)
            .unwrap();
        assert_eq!(unstaked, vec![0, 1]);
        assert_eq!(staking.staked_amount(&user), 0);
        assert!(!nft.is_token_locked(0));
        assert!(!nft.is_token_locked(1));
    }

    #[test]
    fn test_unstake_all_nothing_to_unstake() {
        let (mut nft, mut staking, _, _) = setup();
        let stranger = Address::random();
        let result = staking.unstake_all(&mut nft, &stranger, T0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_claim_rewards() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();

        let claimed = staking
            .claim_rewards(&user, T0 + SECONDS_PER_DAY)
            .unwrap();
        assert_eq!(claimed, 10 * WEI_PER_COIN);
        assert_eq!(staking.token().balance_of(&user), 10 * WEI_PER_COIN);
        assert_eq!(
            staking
                .get_available_rewards(&user, T0 + SECONDS_PER_DAY)
                .unwrap(),
            0
        );

        // Immediate second claim has nothing to settle
        let result = staking.claim_rewards(&user, T0 + SECONDS_PER_DAY);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_claim_nothing_to_claim() {
        let (_, mut staking, _, _) = setup();
        let stranger = Address::random();
        let result = staking.claim_rewards(&stranger, T0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }

    #[test]
    fn test_accrual_is_linear_and_monotonic() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake_all(&mut nft, &user, T0).unwrap();

        let mut previous = 0;
        for day in 1..=7 {
            let available = staking
                .get_available_rewards(&user, T0 + day * SECONDS_PER_DAY)
                .unwrap();
            assert_eq!(available, day as u128 * 30 * WEI_PER_COIN);
            assert!(available > previous);
            previous = available;
        }
    }

    #[test]
    fn test_settlement_before_count_change() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();

        // Day one accrues at 1 staked token; the second stake must not
        // retroactively reprice that interval at 2 tokens.
        staking
            .stake(&mut nft, &user, 1, T0 + SECONDS_PER_DAY)
            .unwrap();
        let available = staking
            .get_available_rewards(&user, T0 + 2 * SECONDS_PER_DAY)
            .unwrap();
        assert_eq!(available, (10 + 20) * WEI_PER_COIN);
    }

    #[test]
    fn test_lock_and_stake_stay_coupled() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake_all(&mut nft, &user, T0).unwrap();
        for id in 0..3 {
            assert_eq!(nft.is_token_locked(id), staking.is_token_staked(id));
        }
        staking.unstake(&mut nft, &user, 1, T0).unwrap();
        for id in 0..3 {
            assert_eq!(nft.is_token_locked(id), staking.is_token_staked(id));
        }
    }

    #[test]
    fn test_staked_token_cannot_transfer() {
        let (mut nft, mut staking, _, user) = setup();
        staking.stake(&mut nft, &user, 0, T0).unwrap();
        let to = Address::random();
        let result = nft.transfer_token(&user, &user, &to, 0);
        assert!(matches!(result, Err(LagoonError::InvalidState(_))));
    }
}
