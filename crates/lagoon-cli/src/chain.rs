// crates/lagoon-cli/src/chain.rs
//
// The in-process chain harness: a deterministic, single-threaded
// execution environment owning the bank, the three ledgers, a logical
// clock, and a set of funded accounts. Every operation is a synchronous
// call that either fully applies or fully rejects; "time passing" is an
// explicit clock advance between calls.

use tracing::info;

use lagoon_core::{Address, Bank, Coins, FungibleToken, LagoonError, TokenId, Wei};
use lagoon_exchange::Exchange;
use lagoon_nft::NftCollection;
use lagoon_staking::StakingLedger;

use crate::config::NetworkConfig;

/// Logical genesis timestamp for the harness clock.
const GENESIS_TS: u64 = 1_700_000_000;

/// The wired-up ledgers and their execution environment.
pub struct Chain {
    pub bank: Bank,
    pub nft: NftCollection,
    pub staking: StakingLedger,
    pub exchange: Exchange,
    /// Deployer; administrative owner of all three ledgers.
    pub admin: Address,
    /// Funded user accounts.
    pub accounts: Vec<Address>,
    /// Current unix time of the environment.
    pub now: u64,
}

impl Chain {
    /// Deploy and wire the three ledgers per the network config.
    pub fn new(config: &NetworkConfig) -> Result<Self, LagoonError> {
        let admin = Address::random();
        let mut bank = Bank::new();
        let faucet = Coins::from_coins(config.faucet_coins).wei;
        bank.deposit(&admin, faucet);
        let accounts: Vec<Address> = (0..config.accounts)
            .map(|_| {
                let account = Address::random();
                bank.deposit(&account, faucet);
                account
            })
            .collect();

        let nft = NftCollection::with_max_supply(
            Address::random(),
            admin,
            Coins::from_coins(config.mint_price_coins).wei,
            config.subscription_id,
            config.max_supply,
        );
        let staking = StakingLedger::new(
            Address::random(),
            admin,
            Coins::from_coins(config.reward_per_day_coins).wei,
        );
        let mut exchange = Exchange::new(Address::random(), admin);
        exchange.set_fee(
            &admin,
            config.owner_fee_per_thousandth,
            config.lp_fee_per_thousandth,
        )?;

        info!(
            mint_price = %Coins::from_coins(config.mint_price_coins),
            reward_per_day = %Coins::from_coins(config.reward_per_day_coins),
            accounts = config.accounts,
            "chain harness deployed"
        );
        Ok(Self {
            bank,
            nft,
            staking,
            exchange,
            admin,
            accounts,
            now: GENESIS_TS,
        })
    }

    /// Advance the logical clock.
    pub fn advance(&mut self, secs: u64) {
        self.now += secs;
        info!(by_secs = secs, now = self.now, "clock advanced");
    }

    /// Mint `count` tokens to `account` at the configured price and
    /// immediately fulfill each randomness request (the harness stands
    /// in for the external randomness source).
    pub fn mint(&mut self, account: &Address, count: u64) -> Result<Vec<TokenId>, LagoonError> {
        let price = self.nft.mint_price();
        let mut minted = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let receipt = self.nft.mint(&mut self.bank, account, price)?;
            // Deterministic stand-in randomness word
            self.nft.fulfill_randomness(
                receipt.request_id,
                receipt.request_id.wrapping_mul(0x9e37_79b9),
            )?;
            minted.push(receipt.token_id);
        }
        info!(account = %account, ?minted, "minted tokens");
        Ok(minted)
    }

    /// Stake every eligible token of `account`.
    pub fn stake_all(&mut self, account: &Address) -> Result<Vec<TokenId>, LagoonError> {
        let staked = self.staking.stake_all(&mut self.nft, account, self.now)?;
        info!(account = %account, ?staked, "staked all eligible tokens");
        Ok(staked)
    }

    /// Claim all accrued rewards for `account`.
    pub fn claim_rewards(&mut self, account: &Address) -> Result<Wei, LagoonError> {
        let claimed = self.staking.claim_rewards(account, self.now)?;
        info!(account = %account, amount = %Coins::from_wei(claimed), "claimed rewards");
        Ok(claimed)
    }

    /// Approve and deposit liquidity for `account`.
    pub fn add_liquidity(
        &mut self,
        account: &Address,
        token_amount: Wei,
        native_amount: Wei,
    ) -> Result<Wei, LagoonError> {
        let spender = *self.exchange.address();
        self.staking.token_mut().approve(account, &spender, token_amount);
        let minted = self.exchange.add_liquidity(
            &mut self.bank,
            self.staking.token_mut(),
            account,
            token_amount,
            native_amount,
        )?;
        info!(
            account = %account,
            native = %Coins::from_wei(native_amount),
            token = %Coins::from_wei(token_amount),
            lp = %Coins::from_wei(minted),
            "liquidity added"
        );
        Ok(minted)
    }

    /// Swap native currency for reward tokens at the quoted price.
    pub fn swap_native_for_token(
        &mut self,
        account: &Address,
        native_in: Wei,
    ) -> Result<Wei, LagoonError> {
        let quote = self.exchange.quote_native_for_token(native_in)?;
        let received = self.exchange.swap_native_for_token(
            &mut self.bank,
            self.staking.token_mut(),
            account,
            native_in,
            quote.output_amount,
        )?;
        info!(
            account = %account,
            native_in = %Coins::from_wei(native_in),
            token_out = %Coins::from_wei(received),
            "swapped native for token"
        );
        Ok(received)
    }

    /// Swap reward tokens for native currency at the quoted price.
    pub fn swap_token_for_native(
        &mut self,
        account: &Address,
        token_in: Wei,
    ) -> Result<Wei, LagoonError> {
        let quote = self.exchange.quote_token_for_native(token_in)?;
        let spender = *self.exchange.address();
        self.staking.token_mut().approve(account, &spender, token_in);
        let received = self.exchange.swap_token_for_native(
            &mut self.bank,
            self.staking.token_mut(),
            account,
            token_in,
            quote.output_amount,
        )?;
        info!(
            account = %account,
            token_in = %Coins::from_wei(token_in),
            native_out = %Coins::from_wei(received),
            "swapped token for native"
        );
        Ok(received)
    }

    /// Reward token balance of `account`.
    pub fn token_balance(&self, account: &Address) -> Wei {
        self.staking.token().balance_of(account)
    }
}
