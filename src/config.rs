//! Network / Token Configuration
//!
//! Static mapping of chain id → contract addresses and token symbols, plus
//! the designated primary network (the one that speaks EIP-2612 permits).
//!
//! Loaded from a TOML file; `.env` can point at the file and override the
//! primary network.

use alloy_primitives::Address;
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

/// Default location of the config file
pub const DEFAULT_CONFIG_PATH: &str = "./staker.toml";

// ============================================
// TYPES
// ============================================

/// One staking pool on a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePoolConfig {
    pub name: String,

    /// Staked token (the LP pair for LP-backed pools)
    pub pool_address: Address,

    /// Liquidity-mining contract
    pub lm_address: Address,

    /// Whether the staked token is a constant-product LP token
    #[serde(default)]
    pub has_liquidity_pool: bool,
}

/// Per-network settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,

    /// Reward token, also the token tracked in LP reserves
    pub reward_token: Address,

    pub token_symbol: String,
    pub display_symbol: String,

    #[serde(default)]
    pub pools: Vec<StakePoolConfig>,
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Network using standard permits; every other network uses bridge-style permits
    pub primary_chain_id: u64,

    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

impl Config {
    /// Load from `STAKER_CONFIG` (default `./staker.toml`), with
    /// `PRIMARY_CHAIN_ID` taking precedence over the file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = env::var("STAKER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;

        if let Ok(primary) = env::var("PRIMARY_CHAIN_ID") {
            config.primary_chain_id = primary
                .parse()
                .map_err(|e| eyre!("Invalid PRIMARY_CHAIN_ID {:?}: {}", primary, e))?;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| eyre!("Invalid config: {}", e))
    }

    pub fn network(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.chain_id == chain_id)
    }

    pub fn is_primary(&self, chain_id: u64) -> bool {
        chain_id == self.primary_chain_id
    }

    pub fn validate(&self) -> Result<()> {
        if self.network(self.primary_chain_id).is_none() {
            return Err(eyre!(
                "Primary chain {} has no network entry",
                self.primary_chain_id
            ));
        }

        let mut seen = HashSet::new();
        for network in &self.networks {
            if !seen.insert(network.chain_id) {
                return Err(eyre!("Duplicate network entry for chain {}", network.chain_id));
            }
            if network.rpc_url.trim().is_empty() {
                return Err(eyre!(
                    "Network {} ({}) has no rpc_url",
                    network.name,
                    network.chain_id
                ));
            }
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║               PERMIT STAKER - CONFIGURATION                ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Primary Chain:     {:^40} ║", self.primary_chain_id);
        println!("║ Networks:          {:^40} ║", self.networks.len());
        for network in &self.networks {
            println!("╠════════════════════════════════════════════════════════════╣");
            println!("║ {:<58} ║", format!("{} ({})", network.name, network.chain_id));
            let permit = if self.is_primary(network.chain_id) {
                "EIP-2612"
            } else {
                "Bridge"
            };
            println!("║ • Permit:          {:^40} ║", permit);
            println!("║ • Reward Token:    {:^40} ║", network.token_symbol);
            println!("║ • Pools:           {:^40} ║", network.pools.len());
        }
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}
