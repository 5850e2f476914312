// crates/lagoon-staking/src/accrual.rs
//
// The reward accrual formula.
//
// reward owed = reward_per_day * staked_count * elapsed / SECONDS_PER_DAY
//
// Integer arithmetic with truncation toward zero at each settlement.
// Settlement happens lazily at every state-changing call and at read
// time; callers settle BEFORE changing the staked count, so an interval
// is always priced with the count that held during it.

use lagoon_core::{mul_div, LagoonError, Wei, WEI_PER_COIN};

/// Number of seconds in one accrual day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Default reward rate: 10 reward coins per staked token per day.
pub const DEFAULT_REWARD_PER_DAY: Wei = 10 * WEI_PER_COIN;

/// Reward accrued for `staked_count` tokens over `elapsed_secs` at
/// `reward_per_day` wei per token-day. Truncates toward zero.
///
/// # Errors
/// Returns `LagoonError::Overflow` if the intermediate product overflows.
pub fn accrued_over(
    reward_per_day: Wei,
    staked_count: u64,
    elapsed_secs: u64,
) -> Result<Wei, LagoonError> {
    let per_day = reward_per_day.checked_mul(staked_count as u128).ok_or_else(|| {
        LagoonError::Overflow(format!(
            "accrual rate overflow: {} * {}",
            reward_per_day, staked_count
        ))
    })?;
    mul_div(per_day, elapsed_secs as u128, SECONDS_PER_DAY as u128)
}
