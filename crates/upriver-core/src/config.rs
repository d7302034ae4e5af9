//! Trace configuration for upriver
//!
//! Configuration is stored as a TOML file and supplies the defaults a
//! trace run needs: which dataset version of the graph to query, the
//! default root flow/process pair, and an optional material category
//! restriction. CLI flags override every field.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default dataset version queried when none is configured
pub const DEFAULT_DATASET_VERSION: &str = "1.4.0";

/// Configuration for a trace run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Graph dataset version every exchange query is pinned to
    pub dataset_version: String,
    /// Default root process to trace when none is given on the CLI
    pub root_process_id: Option<String>,
    /// Product flow produced by the root process (reporting only)
    pub root_flow_id: Option<String>,
    /// Restrict qualifying edges to this material category
    /// (requires a filter store partition)
    pub category_filter: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            dataset_version: DEFAULT_DATASET_VERSION.to_string(),
            root_process_id: None,
            root_flow_id: None,
            category_filter: None,
        }
    }
}

impl TraceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TraceConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::UpriverError::Other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TraceConfig::default();
        assert_eq!(config.dataset_version, DEFAULT_DATASET_VERSION);
        assert!(config.root_process_id.is_none());
        assert!(config.category_filter.is_none());
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upriver.toml");
        fs::write(&path, "dataset_version = \"2.0.1\"\n").unwrap();

        let config = TraceConfig::load(&path).unwrap();
        assert_eq!(config.dataset_version, "2.0.1");
        assert!(config.root_flow_id.is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upriver.toml");

        let config = TraceConfig {
            dataset_version: "1.4.0".to_string(),
            root_process_id: Some("251da196-55f8-4c57-a783-9888cf33c626".to_string()),
            root_flow_id: Some("02eef75e-bb2f-4283-95b4-249521aa2c12".to_string()),
            category_filter: Some("15889393230266368".to_string()),
        };
        config.save(&path).unwrap();

        let loaded = TraceConfig::load(&path).unwrap();
        assert_eq!(loaded.root_process_id, config.root_process_id);
        assert_eq!(loaded.category_filter, config.category_filter);
    }
}
