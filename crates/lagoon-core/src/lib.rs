// crates/lagoon-core/src/lib.rs
//
// lagoon-core: Core types, units, errors, and trait seams for the Lagoon
// Protocol.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines account addresses, wei-denominated amounts, the workspace
// error taxonomy, the native-currency bank, checked ledger arithmetic,
// the observable-event model, and the trait interfaces the three ledgers
// use to talk to each other.

pub mod account;
pub mod bank;
pub mod error;
pub mod event;
pub mod math;
pub mod traits;
pub mod units;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use lagoon_core::Address;`

// Account types
pub use account::Address;

// Native currency ledger
pub use bank::Bank;

// Error type
pub use error::LagoonError;

// Events
pub use event::{Event, EventLog};

// Checked arithmetic
pub use math::{isqrt, mul_div, sqrt_of_product};

// Traits
pub use traits::{FungibleToken, LockableCollection};

// Units
pub use units::{Coins, TokenId, Wei, WEI_PER_COIN};
