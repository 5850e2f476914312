// crates/lagoon-exchange/src/pricing.rs
//
// Constant-product swap pricing with a dual per-thousandth fee.
//
//   input_after_fee = input * (1000 - owner_fee - lp_fee) / 1000
//   output          = output_reserve * input_after_fee
//                     / (input_reserve + input_after_fee)
//   owner_cut       = input * owner_fee / 1000      (in input units)
//
// The LP cut is the part of the fee that is neither paid out nor
// earmarked: it simply stays in the reserves. Everything truncates
// toward zero.

use serde::{Deserialize, Serialize};

use lagoon_core::{mul_div, LagoonError, Wei};

/// Fee rates are expressed in thousandths of the input amount.
pub const FEE_DENOMINATOR: u128 = 1000;

/// Default owner fee: 1 per thousandth (0.1%).
pub const DEFAULT_OWNER_FEE_PER_THOUSANDTH: u128 = 1;

/// Default LP fee: 2 per thousandth (0.2%).
pub const DEFAULT_LP_FEE_PER_THOUSANDTH: u128 = 2;

/// Result of pricing a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Amount of the output asset the swapper receives.
    pub output_amount: Wei,
    /// Portion of the fee earmarked for the owner, in input units.
    pub owner_cut: Wei,
}

/// Price a swap of `input_amount` against the given reserves.
///
/// Pure function; callers apply the quote to reserves themselves.
///
/// # Errors
/// - `InvalidAmount` if the input is zero or the fee rates sum to 1000
///   or more.
/// - `InvalidState` if either reserve is empty.
/// - `Overflow` if an intermediate product overflows.
pub fn get_swap_amount(
    input_amount: Wei,
    input_reserve: Wei,
    output_reserve: Wei,
    owner_fee_per_thousandth: u128,
    lp_fee_per_thousandth: u128,
) -> Result<SwapQuote, LagoonError> {
    if input_amount == 0 {
        return Err(LagoonError::InvalidAmount(
            "swap input must be non-zero".to_string(),
        ));
    }
    if input_reserve == 0 || output_reserve == 0 {
        return Err(LagoonError::InvalidState(
            "cannot price a swap against an empty pool".to_string(),
        ));
    }
    let total_fee = owner_fee_per_thousandth + lp_fee_per_thousandth;
    if total_fee >= FEE_DENOMINATOR {
        return Err(LagoonError::InvalidAmount(format!(
            "fee of {} per thousandth consumes the whole input",
            total_fee
        )));
    }

    let input_after_fee = mul_div(input_amount, FEE_DENOMINATOR - total_fee, FEE_DENOMINATOR)?;
    let denominator = input_reserve
        .checked_add(input_after_fee)
        .ok_or_else(|| LagoonError::Overflow("swap denominator overflow".to_string()))?;
    let output_amount = mul_div(output_reserve, input_after_fee, denominator)?;
    let owner_cut = mul_div(input_amount, owner_fee_per_thousandth, FEE_DENOMINATOR)?;

    Ok(SwapQuote {
        output_amount,
        owner_cut,
    })
}
