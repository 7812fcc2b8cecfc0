//! FeedCodec CLI: decode Starknet price-oracle transactions.
//!
//! # Commands
//! ```text
//! feedcodec selector --name <function>
//! feedcodec decode   --abi <abi.json> --txs <txs.json> [--json] [--flatten]
//! feedcodec combine  --observations <obs.json> --base <feed> --quote <feed>
//! feedcodec fetch    --config <feedcodec.yaml> [--output <txs.json>]
//! feedcodec run      --config <feedcodec.yaml>
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feedcodec_core::{
    feed::{PriceObservation, RawTransaction},
    selector::Selector,
};
use feedcodec_observability::{init_tracing, FeedMetrics, LogConfig};
use feedcodec_registry::MemoryRegistry;
use feedcodec_starknet::{
    combine_median, combine_pair, median, BatchResult, ErrorMode, FeedOutcome, FeedPipeline,
};

mod cmd_fetch;
mod config;

use config::FeedcodecConfig;

#[derive(Parser)]
#[command(
    name = "feedcodec",
    about = "FeedCodec CLI: Starknet price-oracle calldata decoder",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Starknet entry point selector of a function name
    Selector {
        #[arg(short, long)]
        name: String,
    },

    /// Decode a JSON array of raw transactions into price observations
    Decode {
        /// Cairo ABI JSON file
        #[arg(long)]
        abi: PathBuf,
        /// JSON array of raw transactions
        #[arg(long)]
        txs: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// With --json, print one flat observation array (input for `combine`)
        #[arg(long, requires = "json")]
        flatten: bool,
    },

    /// Cross rate of two feeds from a JSON array of observations
    Combine {
        #[arg(long)]
        observations: PathBuf,
        /// Numerator feed, e.g. "btc/usd"
        #[arg(long)]
        base: String,
        /// Denominator feed, e.g. "eth/usd"
        #[arg(long)]
        quote: String,
    },

    /// Pull the oracle's transactions for the configured block range
    Fetch {
        #[arg(short, long)]
        config: PathBuf,
        /// Write transactions here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch, decode and combine end to end
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Selector { name } => {
            init_logging(verbose, None);
            cmd_selector(&name)
        }
        Commands::Decode { abi, txs, json, flatten } => {
            init_logging(verbose, None);
            cmd_decode(&abi, &txs, json, flatten)
        }
        Commands::Combine { observations, base, quote } => {
            init_logging(verbose, None);
            cmd_combine(&observations, &base, &quote)
        }
        Commands::Fetch { config, output } => {
            let config = FeedcodecConfig::load(&config)?;
            init_logging(verbose, Some(&config.log));
            cmd_fetch::fetch(&config, output.as_deref()).await
        }
        Commands::Run { config } => {
            let config = FeedcodecConfig::load(&config)?;
            init_logging(verbose, Some(&config.log));
            cmd_fetch::run(&config).await
        }
    }
}

/// `--verbose` raises the configured level to debug.
fn init_logging(verbose: bool, log: Option<&LogConfig>) {
    let mut log = log.cloned().unwrap_or_default();
    if verbose {
        log.level = "debug".into();
    }
    init_tracing(&log);
}

fn cmd_selector(name: &str) -> Result<()> {
    println!("{}", Selector::from_name(name));
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {what} file '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {what} file '{}'", path.display()))
}

fn cmd_decode(abi: &Path, txs: &Path, as_json: bool, flatten: bool) -> Result<()> {
    let registry = MemoryRegistry::load_file(abi)
        .with_context(|| format!("load ABI '{}'", abi.display()))?;
    let txs: Vec<RawTransaction> = read_json(txs, "transactions")?;

    let result = decode_batch(registry, &txs)?;
    if as_json && flatten {
        println!("{}", serde_json::to_string_pretty(&result.observations())?);
    } else if as_json {
        println!("{}", serde_json::to_string_pretty(&result.feeds)?);
    } else {
        print_batch(&result);
    }
    Ok(())
}

fn cmd_combine(path: &Path, base: &str, quote: &str) -> Result<()> {
    let observations: Vec<PriceObservation> = read_json(path, "observations")?;
    print_pair(&observations, base, quote)
}

/// Decode with errors collected, recording pipeline metrics.
pub(crate) fn decode_batch(registry: MemoryRegistry, txs: &[RawTransaction]) -> Result<BatchResult> {
    let pipeline = FeedPipeline::new(Arc::new(registry));
    let result = pipeline.process_batch(txs, ErrorMode::Collect)?;
    FeedMetrics::global().record_batch(&result);
    Ok(result)
}

pub(crate) fn print_batch(result: &BatchResult) {
    for feed in &result.feeds {
        let hash = feed.transaction_hash.as_deref().unwrap_or("-");
        match &feed.outcome {
            FeedOutcome::Observations(obs) => {
                println!("#{} {} {} ({} entries)", feed.index, hash, feed.function_name, obs.len());
                for o in obs {
                    println!(
                        "    {:<12} {:>24}  t={}  publisher={}",
                        o.feed, o.price, o.timestamp, o.publisher
                    );
                }
            }
            FeedOutcome::NoData(reason) => {
                println!("#{} {} {} (no data: {:?})", feed.index, hash, feed.function_name, reason);
            }
        }
    }
    for (index, err) in &result.errors {
        println!("#{index} failed: {err}");
    }
    println!(
        "{} transactions, {} decoded, {} without data, {} failed",
        result.total_input,
        result.feeds.len(),
        result.empty_count(),
        result.errors.len()
    );
}

pub(crate) fn print_pair(observations: &[PriceObservation], base: &str, quote: &str) -> Result<()> {
    let ratios = combine_pair(observations, base, quote)?;
    for (i, r) in ratios.iter().enumerate() {
        println!("{i:>6}  {r:.8}");
    }
    match combine_median(observations, base, quote)? {
        Some(m) => println!("median {base} / {quote}: {m:.8} over {} pairs", ratios.len()),
        None => println!("no paired observations for {base} / {quote}"),
    }
    Ok(())
}

/// One cross rate per transaction that submitted both feeds.
pub(crate) fn print_series(result: &BatchResult, base: &str, quote: &str) -> Result<()> {
    let mut rates = Vec::new();
    for point in result.pair_series(base, quote) {
        let point = point?;
        let ts = point.timestamp.map_or_else(|| "-".to_string(), |t| t.to_string());
        println!("#{:<5} t={:<12} {:.8}", point.index, ts, point.rate);
        rates.push(point.rate);
    }
    match median(&rates) {
        Some(m) => println!("median {base} / {quote}: {m:.8} over {} transactions", rates.len()),
        None => println!("no transaction submitted both {base} and {quote}"),
    }
    Ok(())
}
