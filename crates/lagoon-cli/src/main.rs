// crates/lagoon-cli/src/main.rs
//
// CLI entrypoint for the Lagoon Protocol harness.
//
// Provides subcommands for running the full mint/stake/claim/swap demo
// scenario, printing reward accrual schedules, and quoting swaps.

mod chain;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lagoon_core::{Coins, LagoonError, WEI_PER_COIN};
use lagoon_exchange::{
    get_swap_amount, DEFAULT_LP_FEE_PER_THOUSANDTH, DEFAULT_OWNER_FEE_PER_THOUSANDTH,
};
use lagoon_staking::{accrued_over, SECONDS_PER_DAY};

use chain::Chain;
use config::NetworkConfig;
use output::{format_json, format_table, AccrualRow, BalanceRow};

/// Lagoon Protocol CLI — lockable NFTs, staking rewards, and the
/// reward-token exchange in a deterministic in-process environment.
#[derive(Parser, Debug)]
#[command(
    name = "lagoon",
    version = "0.1.0",
    about = "Lagoon Protocol harness: NFT staking rewards and the reward-token exchange"
)]
struct Cli {
    /// Path to a TOML network config; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full scenario: mint, stake, accrue, claim, pool, swap.
    Demo {
        /// Days of accrual between staking and claiming.
        #[arg(long, default_value_t = 7)]
        days: u64,
    },

    /// Print the reward accrual schedule for a staked position.
    Accrual {
        /// Number of staked tokens.
        #[arg(long, default_value_t = 1)]
        tokens: u64,
        /// Number of days to tabulate.
        #[arg(long, default_value_t = 7)]
        days: u64,
    },

    /// Quote a swap against hypothetical reserves (amounts in coins).
    Quote {
        /// Swap input amount.
        #[arg(long)]
        input: f64,
        /// Reserve on the input side.
        #[arg(long)]
        input_reserve: f64,
        /// Reserve on the output side.
        #[arg(long)]
        output_reserve: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => NetworkConfig::load(path)?,
        None => NetworkConfig::default(),
    };

    match cli.command {
        Commands::Demo { days } => run_demo(&config, days)?,
        Commands::Accrual { tokens, days } => run_accrual(&config, tokens, days)?,
        Commands::Quote {
            input,
            input_reserve,
            output_reserve,
        } => run_quote(input, input_reserve, output_reserve)?,
    }
    Ok(())
}

/// The end-to-end data flow: mint NFTs, stake them, let time pass,
/// claim the reward tokens, seed the exchange, and trade against it.
fn run_demo(config: &NetworkConfig, days: u64) -> Result<(), LagoonError> {
    let mut chain = Chain::new(config)?;
    let holder = chain.accounts[0];
    let trader = chain.accounts[1];

    chain.mint(&holder, 3)?;
    chain.stake_all(&holder)?;
    chain.advance(days * SECONDS_PER_DAY);
    chain.claim_rewards(&holder)?;

    // Seed the pool with a fifth of the claimed rewards at 10 token/native
    let pool_tokens = chain.token_balance(&holder) / 5;
    chain.add_liquidity(&holder, pool_tokens, pool_tokens / 10)?;

    chain.swap_native_for_token(&trader, WEI_PER_COIN)?;
    let trader_tokens = chain.token_balance(&trader);
    chain.swap_token_for_native(&trader, trader_tokens / 2)?;

    let admin = chain.admin;
    let rows = vec![
        balance_row(&chain, "holder", &holder),
        balance_row(&chain, "trader", &trader),
        balance_row(&chain, "admin", &admin),
    ];
    println!("{}", format_table(&rows));
    println!("pool: {}", format_json(&chain.exchange.snapshot()));
    Ok(())
}

fn balance_row(chain: &Chain, label: &str, account: &lagoon_core::Address) -> BalanceRow {
    BalanceRow::new(
        label,
        account,
        chain.bank.balance_of(account),
        chain.token_balance(account),
        chain.exchange.lp_balance_of(account),
    )
}

fn run_accrual(config: &NetworkConfig, tokens: u64, days: u64) -> Result<(), LagoonError> {
    let rate = Coins::from_coins(config.reward_per_day_coins).wei;
    let mut rows = Vec::with_capacity(days as usize);
    for day in 1..=days {
        let accrued = accrued_over(rate, tokens, day * SECONDS_PER_DAY)?;
        rows.push(AccrualRow {
            day,
            accrued: Coins::from_wei(accrued).to_string(),
        });
    }
    println!("{}", format_table(&rows));
    Ok(())
}

fn run_quote(input: f64, input_reserve: f64, output_reserve: f64) -> Result<(), LagoonError> {
    let quote = get_swap_amount(
        Coins::from_coins(input).wei,
        Coins::from_coins(input_reserve).wei,
        Coins::from_coins(output_reserve).wei,
        DEFAULT_OWNER_FEE_PER_THOUSANDTH,
        DEFAULT_LP_FEE_PER_THOUSANDTH,
    )?;
    println!("{}", format_json(&quote));
    println!(
        "output: {} coins, owner cut: {} coins",
        Coins::from_wei(quote.output_amount),
        Coins::from_wei(quote.owner_cut)
    );
    Ok(())
}
