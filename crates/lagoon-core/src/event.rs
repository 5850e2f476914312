// crates/lagoon-core/src/event.rs
//
// Observable events for external indexing.
//
// Each ledger records events into its own EventLog as the last step of a
// successful operation. A rejected operation records nothing: by the time
// an event is recorded, every check has passed and every state mutation
// is committed.

use serde::{Deserialize, Serialize};

use crate::account::Address;
use crate::units::{TokenId, Wei};

/// An observable ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A mint was accepted and a randomness request issued for its seed.
    MintRequested { request_id: u64, token_id: TokenId },
    /// The randomness source fulfilled a mint request.
    MintCompleted { token_id: TokenId },
    /// A token was locked with the given operator as unlock authority.
    TokenLocked { token_id: TokenId, operator: Address },
    /// A token's lock was cleared by its operator.
    TokenUnlocked { token_id: TokenId },
    /// Ownership of a token changed hands.
    TokenTransferred { token_id: TokenId, from: Address, to: Address },
    /// A token entered an account's staked set.
    Staked { account: Address, token_id: TokenId },
    /// A token left an account's staked set.
    Unstaked { account: Address, token_id: TokenId },
    /// Accrued rewards were minted to an account.
    RewardsClaimed { account: Address, amount: Wei },
    /// Liquidity was deposited into the exchange.
    LiquidityAdded {
        account: Address,
        native_amount: Wei,
        token_amount: Wei,
        lp_minted: Wei,
    },
    /// Liquidity was withdrawn from the exchange.
    LiquidityRemoved {
        account: Address,
        native_amount: Wei,
        token_amount: Wei,
        lp_burned: Wei,
    },
    /// A swap executed against the reserves.
    SwapExecuted {
        account: Address,
        input_amount: Wei,
        output_amount: Wei,
        native_to_token: bool,
    },
    /// The exchange fee split changed.
    FeeUpdated {
        owner_fee_per_thousandth: u128,
        lp_fee_per_thousandth: u128,
    },
    /// The owner's accumulated fee share was paid out.
    OwnerWithdrawal { native_amount: Wei, token_amount: Wei },
    /// The NFT mint price changed.
    MintPriceUpdated { new_price: Wei },
    /// The staking reward rate changed.
    RewardRateUpdated { new_rate: Wei },
    /// The NFT pause flag was toggled.
    PauseToggled { paused: bool },
    /// Accumulated mint proceeds were paid to the collection owner.
    FundsWithdrawn { amount: Wei },
}

/// An append-only per-ledger event log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Record an event. Called only after an operation has fully committed.
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All events recorded so far, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain all recorded events (external indexer consumption).
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
