// Command-line swap quotes for Elysium pools
//
// Reads a pool snapshot from JSON, quotes one swap against it and prints
// the quote as JSON. No network access: the snapshot is the whole world.

mod snapshot;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use serde::Serialize;
use std::str::FromStr;

use elysium_math::SqrtPriceX64;
use elysium_quote::swap_quote::swap_quote_param_by_token;
use elysium_quote::{
    swap_quote_with_dev_fees, swap_quote_with_params, DevFeeConfig, DevFeeSwapQuote, PdaBuilder,
    QuoteConfig, SwapQuote,
};
use elysium_types::{pubkey_serde, Percentage, Pubkey};

use snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(name = "elysium-quote")]
#[command(about = "Quote a swap against an Elysium pool snapshot")]
#[command(version)]
#[command(group(ArgGroup::new("mint").required(true).args(["input_mint", "output_mint"])))]
struct Args {
    /// Path to quote configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the pool snapshot (JSON)
    #[arg(short, long)]
    snapshot: String,

    /// Token amount in base units
    #[arg(short, long)]
    amount: u64,

    /// Spend exactly `amount` of this mint
    #[arg(long)]
    input_mint: Option<String>,

    /// Receive exactly `amount` of this mint
    #[arg(long)]
    output_mint: Option<String>,

    /// Slippage tolerance in basis points, overrides the config
    #[arg(long)]
    slippage_bps: Option<u64>,

    /// Developer fee in basis points, overrides the config; needs a
    /// configured dev fee wallet
    #[arg(long)]
    dev_fee_bps: Option<u64>,

    /// Unix time to accrue rewards to
    #[arg(long)]
    timestamp: Option<u64>,
}

/// A developer-fee quote together with the wallet the fee is paid to
#[derive(Serialize)]
struct DevFeeOutput<'a> {
    #[serde(flatten)]
    quote: &'a DevFeeSwapQuote,
    #[serde(with = "pubkey_serde")]
    dev_fee_wallet: Pubkey,
}

/// Wallet and rate of the developer fee to charge, if any
///
/// The command line can change the rate but never the recipient, so a
/// non-zero rate without a configured wallet is an error.
fn resolve_dev_fee(
    dev_fee_bps: Option<u64>,
    config: Option<&DevFeeConfig>,
) -> Result<Option<(Pubkey, Percentage)>> {
    let Some(dev_fee) = config else {
        if dev_fee_bps.is_some_and(|bps| bps > 0) {
            bail!("--dev-fee-bps needs a dev_fee wallet in the config");
        }
        return Ok(None);
    };
    let percentage = dev_fee_bps
        .map(Percentage::from_bps)
        .unwrap_or(dev_fee.percentage);
    if percentage.is_zero() {
        return Ok(None);
    }
    Ok(Some((dev_fee.wallet, percentage)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => QuoteConfig::load(path)?,
        None => QuoteConfig::default(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let snapshot = Snapshot::load(&args.snapshot)?;
    let source = snapshot.tick_array_source();

    let (mint, mint_is_input) = match (&args.input_mint, &args.output_mint) {
        (Some(mint), None) => (mint, true),
        (None, Some(mint)) => (mint, false),
        _ => bail!("exactly one of --input-mint and --output-mint is required"),
    };
    let mint = Pubkey::from_str(mint).with_context(|| format!("Invalid mint address {}", mint))?;

    let slippage = args
        .slippage_bps
        .map(Percentage::from_bps)
        .unwrap_or(config.default_slippage);
    let dev_fee = resolve_dev_fee(args.dev_fee_bps, config.dev_fee.as_ref())?;

    tracing::info!(
        pool = %snapshot.pool_address,
        %mint,
        amount = args.amount,
        exact_input = mint_is_input,
        slippage = %slippage,
        "quoting swap"
    );

    let pda = PdaBuilder::new(config.program_id);
    let mut param = swap_quote_param_by_token(
        &snapshot.pool_address,
        &snapshot.pool,
        &mint,
        args.amount,
        mint_is_input,
        &pda,
        &source,
    )?;
    param.timestamp = args.timestamp;

    let output = match dev_fee {
        Some((wallet, percentage)) => {
            let quote = swap_quote_with_dev_fees(&param, &percentage, &slippage)?;
            log_quote(&quote.quote);
            tracing::info!(
                dev_fee_amount = quote.dev_fee_amount,
                %wallet,
                "developer fee applied"
            );
            serde_json::to_string_pretty(&DevFeeOutput {
                quote: &quote,
                dev_fee_wallet: wallet,
            })?
        }
        None => {
            let quote = swap_quote_with_params(&param, &slippage)?;
            log_quote(&quote);
            serde_json::to_string_pretty(&quote)?
        }
    };
    println!("{}", output);

    Ok(())
}

fn log_quote(quote: &SwapQuote) {
    let end_price = SqrtPriceX64::try_new(quote.estimated_end_sqrt_price)
        .map(SqrtPriceX64::to_price_f64)
        .unwrap_or(f64::NAN);
    tracing::info!(
        amount_in = quote.estimated_amount_in,
        amount_out = quote.estimated_amount_out,
        fee = quote.estimated_fee_amount,
        end_tick = quote.estimated_end_tick_index,
        end_price,
        "quote ready"
    );
}
