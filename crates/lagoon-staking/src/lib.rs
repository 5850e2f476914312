// crates/lagoon-staking/src/lib.rs
//
// lagoon-staking: NFT staking with lazy time-based reward accrual, and
// the fungible reward token minted on claim.
//
// Rewards accrue linearly with wall-clock time against the number of
// staked tokens. There is no background scheduler: every state-changing
// call settles the elapsed interval first, so reward for a given period
// is always priced at the staked count and rate that held during it.

pub mod accrual;
pub mod ledger;
pub mod token;

// Re-export key types for ergonomic access from downstream crates.
pub use accrual::{accrued_over, DEFAULT_REWARD_PER_DAY, SECONDS_PER_DAY};
pub use ledger::{StakeRecord, StakingLedger};
pub use token::RewardToken;
