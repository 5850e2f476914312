// crates/lagoon-cli/src/config.rs
//
// Network configuration for the in-process chain harness.
// Loaded from a TOML file or populated with the dev-chain defaults
// (mint price 0.5 coin, 10 reward coins per token-day, 500 max supply).

use serde::Deserialize;
use std::fs;

use lagoon_core::LagoonError;

/// Chain parameters for the harness.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// NFT mint price, in coins.
    #[serde(default = "default_mint_price_coins")]
    pub mint_price_coins: f64,

    /// Maximum number of NFTs that can ever be minted.
    #[serde(default = "default_max_supply")]
    pub max_supply: u64,

    /// Staking reward rate, in coins per staked token per day.
    #[serde(default = "default_reward_per_day_coins")]
    pub reward_per_day_coins: f64,

    /// Exchange owner fee, per thousandth of swap input.
    #[serde(default = "default_owner_fee")]
    pub owner_fee_per_thousandth: u128,

    /// Exchange LP fee, per thousandth of swap input.
    #[serde(default = "default_lp_fee")]
    pub lp_fee_per_thousandth: u128,

    /// External randomness source subscription parameter.
    #[serde(default = "default_subscription_id")]
    pub subscription_id: u64,

    /// Native currency each harness account starts with, in coins.
    #[serde(default = "default_faucet_coins")]
    pub faucet_coins: f64,

    /// Number of user accounts to create (besides the admin).
    #[serde(default = "default_accounts")]
    pub accounts: usize,
}

fn default_mint_price_coins() -> f64 {
    0.5
}

fn default_max_supply() -> u64 {
    500
}

fn default_reward_per_day_coins() -> f64 {
    10.0
}

fn default_owner_fee() -> u128 {
    1
}

fn default_lp_fee() -> u128 {
    2
}

fn default_subscription_id() -> u64 {
    488
}

fn default_faucet_coins() -> f64 {
    1_000.0
}

fn default_accounts() -> usize {
    3
}

impl Default for NetworkConfig {
    fn default() -> Self {
        // serde fills every field from its default fn
        toml::from_str("").expect("empty config deserializes from defaults")
    }
}

impl NetworkConfig {
    /// Load a config from a TOML file.
    pub fn load(path: &str) -> Result<Self, LagoonError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| LagoonError::Serialization(format!("cannot read {}: {}", path, e)))?;
        toml::from_str(&raw)
            .map_err(|e| LagoonError::Serialization(format!("cannot parse {}: {}", path, e)))
    }
}
