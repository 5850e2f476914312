// crates/lagoon-exchange/src/pool.rs
//
// The exchange pool.
//
// Reserves live under the exchange's own address: the native reserve in
// the bank, the reward-token reserve in the token ledger, with the
// counters here as the authoritative accounting. Guard state (reserves,
// LP supply, owner-share counters) is always mutated before any value
// transfer within the same operation.
//
// Swaps move the full gross input into the input reserve; the owner's
// cut of the fee is earmarked in a running per-asset counter and stays
// inside the reserves until `owner_withdraw` pays it out. The LP cut is
// never earmarked at all; it stays in the reserves and inflates the
// value of every liquidity position.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lagoon_core::{
    mul_div, sqrt_of_product, Address, Bank, Event, EventLog, FungibleToken, LagoonError, Wei,
};

use crate::pricing::{
    get_swap_amount, SwapQuote, DEFAULT_LP_FEE_PER_THOUSANDTH, DEFAULT_OWNER_FEE_PER_THOUSANDTH,
    FEE_DENOMINATOR,
};

/// Queryable snapshot of the pool state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub native_reserve: Wei,
    pub token_reserve: Wei,
    pub lp_total_supply: Wei,
    pub owner_fee_per_thousandth: u128,
    pub lp_fee_per_thousandth: u128,
    pub owner_share_native: Wei,
    pub owner_share_token: Wei,
}

/// The reward-token / native-currency exchange.
pub struct Exchange {
    /// Address the exchange holds its reserves under.
    address: Address,
    /// Administrative owner; receives the owner fee cut.
    owner: Address,
    owner_fee_per_thousandth: u128,
    lp_fee_per_thousandth: u128,
    native_reserve: Wei,
    token_reserve: Wei,
    /// Liquidity-position balances and supply. Mint/burn only here.
    lp_balances: HashMap<Address, Wei>,
    lp_total_supply: Wei,
    /// Owner fee earmarks, in reserve units. Always <= the reserves.
    owner_share_native: Wei,
    owner_share_token: Wei,
    events: EventLog,
}

impl Exchange {
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            owner_fee_per_thousandth: DEFAULT_OWNER_FEE_PER_THOUSANDTH,
            lp_fee_per_thousandth: DEFAULT_LP_FEE_PER_THOUSANDTH,
            native_reserve: 0,
            token_reserve: 0,
            lp_balances: HashMap::new(),
            lp_total_supply: 0,
            owner_share_native: 0,
            owner_share_token: 0,
            events: EventLog::new(),
        }
    }

    fn ensure_admin(&self, caller: &Address) -> Result<(), LagoonError> {
        if *caller != self.owner {
            return Err(LagoonError::Unauthorized(format!(
                "{} is not the exchange owner",
                caller
            )));
        }
        Ok(())
    }

    /// Check that the caller can fund a reward-token pull of `amount`.
    /// Run in the validation phase so the later transfer cannot fail.
    fn ensure_token_funded<F: FungibleToken>(
        &self,
        token: &F,
        caller: &Address,
        amount: Wei,
    ) -> Result<(), LagoonError> {
        if token.allowance(caller, &self.address) < amount {
            return Err(LagoonError::InvalidAmount(format!(
                "exchange allowance below required {} wei",
                amount
            )));
        }
        if token.balance_of(caller) < amount {
            return Err(LagoonError::InvalidAmount(format!(
                "token balance below required {} wei",
                amount
            )));
        }
        Ok(())
    }

    fn ensure_native_funded(
        &self,
        bank: &Bank,
        caller: &Address,
        amount: Wei,
    ) -> Result<(), LagoonError> {
        if bank.balance_of(caller) < amount {
            return Err(LagoonError::InvalidAmount(format!(
                "native balance below required {} wei",
                amount
            )));
        }
        Ok(())
    }

    /// Deposit liquidity. The native amount is authoritative: follow-up
    /// deposits pull exactly the reserve-ratio-matching token amount and
    /// reject callers offering less.
    ///
    /// Returns the amount of liquidity-position tokens minted.
    ///
    /// # Errors
    /// - `InvalidAmount` if either amount is zero, the deposit is too
    ///   small to mint a position, or the caller cannot fund it.
    /// - `SlippageExceeded` if `token_amount` is below the ratio-matching
    ///   requirement.
    pub fn add_liquidity<F: FungibleToken>(
        &mut self,
        bank: &mut Bank,
        token: &mut F,
        caller: &Address,
        token_amount: Wei,
        native_amount: Wei,
    ) -> Result<Wei, LagoonError> {
        if token_amount == 0 || native_amount == 0 {
            return Err(LagoonError::InvalidAmount(
                "must transfer both tokens".to_string(),
            ));
        }
        self.ensure_native_funded(bank, caller, native_amount)?;

        let (required_token, minted) = if self.lp_total_supply == 0 {
            (token_amount, sqrt_of_product(native_amount, token_amount))
        } else {
            let required = mul_div(native_amount, self.token_reserve, self.native_reserve)?;
            if token_amount < required {
                return Err(LagoonError::SlippageExceeded(format!(
                    "deposit ratio requires {} token wei, offered {}",
                    required, token_amount
                )));
            }
            let minted = mul_div(self.lp_total_supply, native_amount, self.native_reserve)?;
            (required, minted)
        };
        if minted == 0 {
            return Err(LagoonError::InvalidAmount(
                "deposit too small to mint a liquidity position".to_string(),
            ));
        }
        self.ensure_token_funded(token, caller, required_token)?;

        self.native_reserve += native_amount;
        self.token_reserve += required_token;
        *self.lp_balances.entry(*caller).or_insert(0) += minted;
        self.lp_total_supply += minted;
        self.events.record(Event::LiquidityAdded {
            account: *caller,
            native_amount,
            token_amount: required_token,
            lp_minted: minted,
        });

        bank.transfer(caller, &self.address, native_amount)?;
        token.transfer_from(&self.address, caller, &self.address, required_token)?;
        Ok(minted)
    }

    /// Burn `lp_amount` of the caller's position and pay out the
    /// proportional share of both reserves. The owner's earmarked fee
    /// share is not distributable: payouts are computed against the
    /// reserves net of it, so a full LP exit leaves exactly the earmark
    /// behind for `owner_withdraw`.
    ///
    /// Returns `(native_paid, token_paid)`.
    pub fn remove_liquidity<F: FungibleToken>(
        &mut self,
        bank: &mut Bank,
        token: &mut F,
        caller: &Address,
        lp_amount: Wei,
    ) -> Result<(Wei, Wei), LagoonError> {
        let held = self.lp_balance_of(caller);
        if lp_amount == 0 || lp_amount > held {
            return Err(LagoonError::InvalidAmount(format!(
                "cannot remove {} LP wei against a balance of {}",
                lp_amount, held
            )));
        }

        let distributable_native = self.native_reserve - self.owner_share_native;
        let distributable_token = self.token_reserve - self.owner_share_token;
        let native_out = mul_div(distributable_native, lp_amount, self.lp_total_supply)?;
        let token_out = mul_div(distributable_token, lp_amount, self.lp_total_supply)?;

        self.lp_balances.insert(*caller, held - lp_amount);
        self.lp_total_supply -= lp_amount;
        self.native_reserve -= native_out;
        self.token_reserve -= token_out;
        self.events.record(Event::LiquidityRemoved {
            account: *caller,
            native_amount: native_out,
            token_amount: token_out,
            lp_burned: lp_amount,
        });

        bank.transfer(&self.address, caller, native_out)?;
        token.transfer(&self.address, caller, token_out)?;
        Ok((native_out, token_out))
    }

    /// Swap native currency for reward tokens.
    ///
    /// # Errors
    /// `SlippageExceeded` if the realized output falls below
    /// `min_token_out`.
    pub fn swap_native_for_token<F: FungibleToken>(
        &mut self,
        bank: &mut Bank,
        token: &mut F,
        caller: &Address,
        native_in: Wei,
        min_token_out: Wei,
    ) -> Result<Wei, LagoonError> {
        let quote = self.quote_native_for_token(native_in)?;
        if quote.output_amount < min_token_out {
            return Err(LagoonError::SlippageExceeded(format!(
                "output of {} token wei below minimum {}",
                quote.output_amount, min_token_out
            )));
        }
        self.ensure_native_funded(bank, caller, native_in)?;

        self.native_reserve += native_in;
        self.token_reserve -= quote.output_amount;
        self.owner_share_native += quote.owner_cut;
        self.events.record(Event::SwapExecuted {
            account: *caller,
            input_amount: native_in,
            output_amount: quote.output_amount,
            native_to_token: true,
        });

        bank.transfer(caller, &self.address, native_in)?;
        token.transfer(&self.address, caller, quote.output_amount)?;
        Ok(quote.output_amount)
    }

    /// Swap reward tokens for native currency.
    pub fn swap_token_for_native<F: FungibleToken>(
        &mut self,
        bank: &mut Bank,
        token: &mut F,
        caller: &Address,
        token_in: Wei,
        min_native_out: Wei,
    ) -> Result<Wei, LagoonError> {
        let quote = self.quote_token_for_native(token_in)?;
        if quote.output_amount < min_native_out {
            return Err(LagoonError::SlippageExceeded(format!(
                "output of {} native wei below minimum {}",
                quote.output_amount, min_native_out
            )));
        }
        self.ensure_token_funded(token, caller, token_in)?;

        self.token_reserve += token_in;
        self.native_reserve -= quote.output_amount;
        self.owner_share_token += quote.owner_cut;
        self.events.record(Event::SwapExecuted {
            account: *caller,
            input_amount: token_in,
            output_amount: quote.output_amount,
            native_to_token: false,
        });

        token.transfer_from(&self.address, caller, &self.address, token_in)?;
        bank.transfer(&self.address, caller, quote.output_amount)?;
        Ok(quote.output_amount)
    }

    /// Pay the accumulated owner fee share out of both reserves and
    /// reset the counters. Owner-gated.
    ///
    /// Returns `(native_paid, token_paid)`.
    pub fn owner_withdraw<F: FungibleToken>(
        &mut self,
        bank: &mut Bank,
        token: &mut F,
        caller: &Address,
    ) -> Result<(Wei, Wei), LagoonError> {
        self.ensure_admin(caller)?;
        let native_amount = self.owner_share_native;
        let token_amount = self.owner_share_token;

        self.owner_share_native = 0;
        self.owner_share_token = 0;
        self.native_reserve -= native_amount;
        self.token_reserve -= token_amount;
        self.events.record(Event::OwnerWithdrawal {
            native_amount,
            token_amount,
        });

        bank.transfer(&self.address, &self.owner, native_amount)?;
        token.transfer(&self.address, &self.owner, token_amount)?;
        Ok((native_amount, token_amount))
    }

    /// Update the fee split. Owner-gated; applies to swaps after the call.
    pub fn set_fee(
        &mut self,
        caller: &Address,
        owner_fee_per_thousandth: u128,
        lp_fee_per_thousandth: u128,
    ) -> Result<(), LagoonError> {
        self.ensure_admin(caller)?;
        if owner_fee_per_thousandth + lp_fee_per_thousandth >= FEE_DENOMINATOR {
            return Err(LagoonError::InvalidAmount(format!(
                "fee split {}+{} consumes the whole input",
                owner_fee_per_thousandth, lp_fee_per_thousandth
            )));
        }
        self.owner_fee_per_thousandth = owner_fee_per_thousandth;
        self.lp_fee_per_thousandth = lp_fee_per_thousandth;
        self.events.record(Event::FeeUpdated {
            owner_fee_per_thousandth,
            lp_fee_per_thousandth,
        });
        Ok(())
    }

    // --- query surface ---

    /// Quote a native-to-token swap against the current reserves.
    pub fn quote_native_for_token(&self, native_in: Wei) -> Result<SwapQuote, LagoonError> {
        get_swap_amount(
            native_in,
            self.native_reserve,
            self.token_reserve,
            self.owner_fee_per_thousandth,
            self.lp_fee_per_thousandth,
        )
    }

    /// Quote a token-to-native swap against the current reserves.
    pub fn quote_token_for_native(&self, token_in: Wei) -> Result<SwapQuote, LagoonError> {
        get_swap_amount(
            token_in,
            self.token_reserve,
            self.native_reserve,
            self.owner_fee_per_thousandth,
            self.lp_fee_per_thousandth,
        )
    }

    /// Current reserves as `(native, token)`.
    pub fn reserves(&self) -> (Wei, Wei) {
        (self.native_reserve, self.token_reserve)
    }

    pub fn lp_balance_of(&self, account: &Address) -> Wei {
        self.lp_balances.get(account).copied().unwrap_or(0)
    }

    pub fn lp_total_supply(&self) -> Wei {
        self.lp_total_supply
    }

    pub fn owner_fee_per_thousandth(&self) -> u128 {
        self.owner_fee_per_thousandth
    }

    pub fn lp_fee_per_thousandth(&self) -> u128 {
        self.lp_fee_per_thousandth
    }

    pub fn owner_share_native(&self) -> Wei {
        self.owner_share_native
    }

    pub fn owner_share_token(&self) -> Wei {
        self.owner_share_token
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            native_reserve: self.native_reserve,
            token_reserve: self.token_reserve,
            lp_total_supply: self.lp_total_supply,
            owner_fee_per_thousandth: self.owner_fee_per_thousandth,
            lp_fee_per_thousandth: self.lp_fee_per_thousandth,
            owner_share_native: self.owner_share_native,
            owner_share_token: self.owner_share_token,
        }
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
