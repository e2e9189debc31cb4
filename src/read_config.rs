// Module de lecture de configuration: router identity, attached networks
// and configured neighbors, loaded from a TOML file given by --config.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_port() -> u16 {
    crate::PORT
}

fn default_capacity() -> u32 {
    100
}

fn default_delay_ms() -> u32 {
    1
}

fn default_cost() -> u32 {
    1
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NeighborConfig {
    pub id: String,
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub local_ip: Option<String>,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u32,
    #[serde(default = "default_cost")]
    pub cost: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RouterConfig {
    pub router_id: String,
    pub local_ip: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub attached_networks: Vec<String>,
    #[serde(default)]
    pub neighbors: Vec<NeighborConfig>,
}

impl RouterConfig {
    /// The interface IP this router presents towards `neighbor_id`,
    /// falling back to the router-level `local_ip`.
    pub fn local_ip_towards(&self, neighbor_id: &str) -> Option<String> {
        self.neighbors
            .iter()
            .find(|n| n.id == neighbor_id)
            .and_then(|n| n.local_ip.clone())
            .or_else(|| self.local_ip.clone())
    }

    pub fn neighbor(&self, id: &str) -> Option<&NeighborConfig> {
        self.neighbors.iter().find(|n| n.id == id)
    }
}

/// Loads the router config from `path`, resolving `local_ip` from the
/// first neighbor entry that supplies one when the router-level field is
/// absent, matching the reference daemon's bootstrap fallback.
pub fn read_router_config(path: &str) -> Result<RouterConfig> {
    if !Path::new(path).exists() {
        return Err(AppError::ConfigError(format!("config file not found: {}", path)));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::ConfigError(format!("failed to read config file {}: {}", path, e)))?;

    let mut config: RouterConfig = toml::from_str(&content)
        .map_err(|e| AppError::ConfigError(format!("failed to parse config file {}: {}", path, e)))?;

    if config.local_ip.is_none() {
        config.local_ip = config.neighbors.iter().find_map(|n| n.local_ip.clone());
    }

    log::info!("loaded configuration for router: {}", config.router_id);
    log::debug!("config: {:?}", config);

    Ok(config)
}
