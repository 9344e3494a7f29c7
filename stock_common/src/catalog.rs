//! Known-models catalog: product code -> display name

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Catalog shipped with the checker (UK iPhone 7 / 7 Plus codes)
const EMBEDDED_CATALOG: &str = include_str!("../data/iphone_models.json");

/// Static lookup of the product codes the checker knows how to name
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: HashMap<String, String>,
}

impl ModelCatalog {
    /// Load the embedded default catalog
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    /// Parse a catalog document of the form `{"CODE": "Display name", ...}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let models: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { models })
    }

    /// Load a user supplied catalog file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading models catalog from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Display name of a product code
    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.models.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.models.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Startup check of the wanted list.
    ///
    /// Fails when nothing is wanted, when the catalog itself is empty, or when
    /// any wanted code is unknown (all unknown codes reported, in given order).
    pub fn validate_wanted(&self, wanted: &[String]) -> std::result::Result<(), ConfigError> {
        if wanted.is_empty() {
            return Err(ConfigError::NoWantedModels);
        }
        if self.models.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let unknown: Vec<String> = wanted
            .iter()
            .filter(|code| !self.contains(code))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownModels(unknown));
        }

        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ModelCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let models = iter
            .into_iter()
            .map(|(code, name)| (code.into(), name.into()))
            .collect();
        Self { models }
    }
}
