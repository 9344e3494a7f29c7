//! Checker configuration: JSON file with command line overrides applied on top

use crate::batcher::DEFAULT_MAX_BATCH_SIZE;
use crate::dedup_cache::MAX_PERIOD;
use crate::notifier::PROWL_API_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use stock_common::{ConfigError, ModelCatalog, Result};

/// UK store list. Other countries use a different URL.
pub const DEFAULT_STORES_URL: &str =
    "https://reserve.cdn-apple.com/GB/en_GB/reserve/iPhone/stores.json";

/// UK availability feed
pub const DEFAULT_STOCK_URL: &str =
    "https://reserve.cdn-apple.com/GB/en_GB/reserve/iPhone/availability.json";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub stores_url: String,
    pub stock_url: String,
    /// Idle gap between the end of one cycle and the next fetch
    pub poll_interval_ms: u64,
    /// Product codes to watch, must exist in the models catalog
    pub models_wanted: Vec<String>,
    /// No key means console output only
    pub prowl_api_key: Option<String>,
    pub prowl_url: String,
    pub application: String,
    pub event: String,
    pub dedup_window_secs: u64,
    pub sweep_interval_secs: u64,
    pub max_batch_size: usize,
    /// Replaces the embedded models catalog
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stores_url: DEFAULT_STORES_URL.to_string(),
            stock_url: DEFAULT_STOCK_URL.to_string(),
            poll_interval_ms: 3000,
            models_wanted: Vec::new(),
            prowl_api_key: None,
            prowl_url: PROWL_API_URL.to_string(),
            application: "Stock Checker".to_string(),
            event: "iPhone Stock".to_string(),
            dedup_window_secs: 300,
            sweep_interval_secs: 120,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            catalog_path: None,
        }
    }
}

/// Returns the default config path: ~/.config/stock_checker/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stock_checker")
        .join("config.json")
}

impl Config {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicitly named file (must exist), or the default location
    /// (defaults used when absent).
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            log::info!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Reject values that would make the poll loop spin, the batcher stall,
    /// or the cache expiry arithmetic overflow
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let checks = [
            ("pollIntervalMs", self.poll_interval_ms == 0),
            ("dedupWindowSecs", self.dedup_window_secs == 0),
            ("sweepIntervalSecs", self.sweep_interval_secs == 0),
            ("maxBatchSize", self.max_batch_size == 0),
        ];
        for (field, is_zero) in checks {
            if is_zero {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let max_secs = MAX_PERIOD.as_secs();
        let bounded = [
            ("dedupWindowSecs", self.dedup_window_secs),
            ("sweepIntervalSecs", self.sweep_interval_secs),
        ];
        for (field, secs) in bounded {
            if secs > max_secs {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be at most {} seconds", max_secs),
                });
            }
        }
        Ok(())
    }

    /// The configured catalog file, or the embedded one
    pub fn load_catalog(&self) -> Result<ModelCatalog> {
        match &self.catalog_path {
            Some(path) => ModelCatalog::load(path),
            None => ModelCatalog::embedded(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.dedup_window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
