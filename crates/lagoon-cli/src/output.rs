// crates/lagoon-cli/src/output.rs
//
// Output formatting utilities for the Lagoon CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use lagoon_core::{Address, Coins, Wei};

/// One account row in the balances table.
#[derive(Tabled)]
pub struct BalanceRow {
    pub account: String,
    pub native: String,
    pub reward: String,
    pub lp: String,
}

impl BalanceRow {
    pub fn new(label: &str, address: &Address, native: Wei, reward: Wei, lp: Wei) -> Self {
        Self {
            account: format!("{} ({})", label, short(address)),
            native: Coins::from_wei(native).to_string(),
            reward: Coins::from_wei(reward).to_string(),
            lp: Coins::from_wei(lp).to_string(),
        }
    }
}

/// One day of the accrual schedule.
#[derive(Tabled, Serialize)]
pub struct AccrualRow {
    pub day: u64,
    pub accrued: String,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

fn short(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…", &full[..10])
}
