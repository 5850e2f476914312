// crates/lagoon-exchange/src/lib.rs
//
// lagoon-exchange: Constant-product market between the reward token and
// the native currency.
//
// Two reserves, a fungible liquidity-position token, and swaps priced by
// the constant-product rule net of a dual fee: an LP cut that stays in
// the reserves (inflating every position) and an owner cut earmarked in
// running per-asset counters until withdrawn.

pub mod pool;
pub mod pricing;

// Re-export key types for ergonomic access from downstream crates.
pub use pool::{Exchange, PoolSnapshot};
pub use pricing::{
    get_swap_amount, SwapQuote, DEFAULT_LP_FEE_PER_THOUSANDTH, DEFAULT_OWNER_FEE_PER_THOUSANDTH,
    FEE_DENOMINATOR,
};
