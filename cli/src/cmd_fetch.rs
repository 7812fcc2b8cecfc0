//! `fetch` and `run`: the commands that talk to a node.

use std::path::Path;

use anyhow::{Context, Result};
use feedcodec_core::feed::RawTransaction;
use feedcodec_registry::MemoryRegistry;
use feedcodec_rpc::StarknetNodeClient;
use tracing::info;

use crate::config::FeedcodecConfig;
use crate::{decode_batch, print_batch, print_series};

async fn fetch_transactions(config: &FeedcodecConfig) -> Result<Vec<RawTransaction>> {
    let client = StarknetNodeClient::connect(&config.node).context("connect to node")?;
    info!(
        url = %config.node.url,
        contract = %config.node.contract_address,
        start = config.start_block,
        end = config.end_block,
        "fetching oracle transactions"
    );
    let txs = client
        .fetch_range(config.start_block, config.end_block)
        .await
        .context("fetch block range")?;
    Ok(txs)
}

pub async fn fetch(config: &FeedcodecConfig, output: Option<&Path>) -> Result<()> {
    let txs = fetch_transactions(config).await?;
    let json = serde_json::to_string_pretty(&txs)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("write transactions to '{}'", path.display()))?;
            println!("{} transactions written to {}", txs.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub async fn run(config: &FeedcodecConfig) -> Result<()> {
    let registry = MemoryRegistry::load_file(&config.abi_path)
        .with_context(|| format!("load ABI '{}'", config.abi_path.display()))?;
    let txs = fetch_transactions(config).await?;

    let result = decode_batch(registry, &txs)?;
    print_batch(&result);

    if let Some(pair) = &config.pair {
        print_series(&result, &pair.base, &pair.quote)?;
    }
    Ok(())
}
