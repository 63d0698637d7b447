//! Configuration for the ledger

use serde::{Deserialize, Serialize};

/// Number of node-discriminator values the id layout can encode
const MAX_NODES: u16 = 1 << 10;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Node discriminator baked into every issued id (0..1024).
    ///
    /// Give each process that shares an id space its own value; a single
    /// deployment can leave the default.
    pub node_id: u16,

    /// Duplicate-detection window in whole seconds
    pub duplicate_window_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_id: 0,
            duplicate_window_secs: 5, // matches the accidental-resubmission window
        }
    }
}

impl Config {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(node_id) = std::env::var("TXLEDGER_NODE_ID") {
            config.node_id = node_id
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid TXLEDGER_NODE_ID: {}", e)))?;
        }

        if let Ok(window) = std::env::var("TXLEDGER_DUPLICATE_WINDOW_SECS") {
            config.duplicate_window_secs = window.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid TXLEDGER_DUPLICATE_WINDOW_SECS: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.node_id >= MAX_NODES {
            return Err(crate::Error::Config(format!(
                "node_id {} out of range (0..{})",
                self.node_id, MAX_NODES
            )));
        }
        if self.duplicate_window_secs == 0 {
            return Err(crate::Error::Config(
                "duplicate_window_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
