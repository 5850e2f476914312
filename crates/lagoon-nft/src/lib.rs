// crates/lagoon-nft/src/lib.rs
//
// lagoon-nft: Lockable non-fungible token ledger for the Lagoon Protocol.
//
// Sequential-id minting against an exact payment, an exclusive per-token
// lock that vetoes transfers, and the owner-gated administrative surface
// (pause, mint price, randomness subscription).

pub mod collection;

pub use collection::{MintReceipt, NftCollection, TokenInfo, DEFAULT_MAX_SUPPLY};
