//! `feedcodec.yaml`: everything a `fetch` or `run` needs, in one file.
//!
//! ```yaml
//! node:
//!   url: https://starknet-mainnet.example/rpc/v0_4
//!   contract_address: "0x4a05a68317edb37d34d29f34193829d7363d51a37068f32b142c637e43b47a2"
//! abi_path: abi/oracle.json
//! start_block: 177896
//! end_block: 210236
//! pair:
//!   base: eth/usd
//!   quote: btc/usd
//! log:
//!   level: info
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use feedcodec_observability::LogConfig;
use feedcodec_rpc::NodeConfig;
use serde::{Deserialize, Serialize};

/// Two feeds combined into a cross rate `base / quote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    pub base: String,
    pub quote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedcodecConfig {
    pub node: NodeConfig,
    /// Oracle ABI JSON; relative paths resolve against the config file
    pub abi_path: PathBuf,
    /// First block to scan
    pub start_block: u64,
    /// Scan stops before this block
    pub end_block: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<PairConfig>,
    #[serde(default)]
    pub log: LogConfig,
}

impl FeedcodecConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and resolve `abi_path` against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read config file '{}'", path.display()))?;
        let mut config = Self::from_yaml(&yaml)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        if config.abi_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.abi_path = dir.join(&config.abi_path);
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.start_block > self.end_block {
            bail!(
                "start_block {} is after end_block {}",
                self.start_block,
                self.end_block
            );
        }
        if self.node.url.is_empty() {
            bail!("node.url is empty");
        }
        Ok(())
    }
}
