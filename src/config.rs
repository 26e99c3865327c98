//! Configuration Module
//!
//! This module defines all configuration structures for the validator.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::consensus::{ConsensusParams, native_asset_id};
use crate::types::{AssetId, Hash};
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Contains all configuration sections for the validator.
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [consensus]
/// vm_gas_rate = 200
/// storage_gas_rate = 1
///
/// [side]
/// parent_genesis_hash = "0xabab...ab"
/// pegin_min_depth = 6
/// validate_pegin = false
///
/// [mainchain]
/// tip_height = 0
///
/// [validation]
/// block_files = ["blocks/1.json"]
/// program_cost = 100
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub consensus: ConsensusConfig,
    pub side: SideConfig,
    #[serde(default)]
    pub mainchain: MainchainConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Gas and value limits of the side chain
///
/// Any field left out takes the built-in chain default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    pub native_asset_id: AssetId,
    pub vm_gas_rate: i64,
    pub storage_gas_rate: i64,
    pub max_gas_amount: i64,
    pub default_gas_credit: i64,
    pub max_block_gas: u64,
    pub coinbase_arbitrary_size_limit: usize,
    pub max_money: u64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        let params = ConsensusParams::default();
        Self {
            native_asset_id: native_asset_id(),
            vm_gas_rate: params.vm_gas_rate,
            storage_gas_rate: params.storage_gas_rate,
            max_gas_amount: params.max_gas_amount,
            default_gas_credit: params.default_gas_credit,
            max_block_gas: params.max_block_gas,
            coinbase_arbitrary_size_limit: params.coinbase_arbitrary_size_limit,
            max_money: params.max_money,
        }
    }
}

/// Link to the parent chain
///
/// # Fields
/// - `parent_genesis_hash`: Genesis block every peg-in proof must descend from
/// - `pegin_min_depth`: Confirmations a deposit needs before it can be claimed
/// - `validate_pegin`: Ask the parent chain whether deposits are confirmed
#[derive(Debug, Clone, Deserialize)]
pub struct SideConfig {
    pub parent_genesis_hash: Hash,
    #[serde(default = "default_pegin_min_depth")]
    pub pegin_min_depth: u64,
    #[serde(default)]
    pub validate_pegin: bool,
}

fn default_pegin_min_depth() -> u64 {
    ConsensusParams::default().pegin_min_depth
}

/// Snapshot of the parent chain used for confirmation checks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainchainConfig {
    pub tip_height: u64,
}

/// What the binary validates
///
/// # Fields
/// - `block_files`: JSON block files, validated concurrently
/// - `program_cost`: Flat gas charged per program execution
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub block_files: Vec<String>,
    pub program_cost: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            block_files: Vec::new(),
            program_cost: 100,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.consensus.vm_gas_rate <= 0 {
            anyhow::bail!("consensus.vm_gas_rate must be positive");
        }
        Ok(config)
    }

    /// Consensus parameters for every validation run of this process
    pub fn consensus_params(&self) -> ConsensusParams {
        let consensus = &self.consensus;
        ConsensusParams {
            native_asset_id: consensus.native_asset_id,
            vm_gas_rate: consensus.vm_gas_rate,
            storage_gas_rate: consensus.storage_gas_rate,
            max_gas_amount: consensus.max_gas_amount,
            default_gas_credit: consensus.default_gas_credit,
            max_block_gas: consensus.max_block_gas,
            coinbase_arbitrary_size_limit: consensus.coinbase_arbitrary_size_limit,
            max_money: consensus.max_money,
            parent_genesis_hash: self.side.parent_genesis_hash,
            pegin_min_depth: self.side.pegin_min_depth,
            validate_pegin: self.side.validate_pegin,
        }
    }
}
