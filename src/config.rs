//! Analysis settings
//!
//! Settings come from a YAML file. The first file found wins:
//!
//! 1. an explicit path (must exist)
//! 2. `<graph>/kbgraph.yaml`
//! 3. `<config dir>/kbgraph/config.yaml`
//!
//! Missing keys take their defaults, and no file at all means all defaults.

use crate::aggregate::{AggregateConfig, TagCountMode};
use crate::analysis::AnalysisConfig;
use crate::storage::LoadOptions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the graph root
pub const GRAPH_CONFIG_FILE: &str = "kbgraph.yaml";

/// Most decimal places a report may ask for
const MAX_DECIMAL_PLACES: usize = 12;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    /// A page is highly connected when either degree exceeds this
    pub hub_threshold: usize,
    pub tag_count_mode: TagCountMode,
    pub tags_as_references: bool,
    /// Length of "top" rankings
    pub top_n: usize,
    pub decimal_places: usize,
    pub upcoming_days: u32,
    pub pages_dir: String,
    pub journals_dir: String,
    pub include_journals: bool,
    /// Treat code spans and fenced blocks as plain text when false
    pub ignore_code: bool,
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            hub_threshold: 5,
            tag_count_mode: TagCountMode::Occurrences,
            tags_as_references: false,
            top_n: 10,
            decimal_places: 1,
            upcoming_days: 7,
            pages_dir: "pages".to_string(),
            journals_dir: "journals".to_string(),
            include_journals: true,
            ignore_code: true,
        }
    }
}

impl KbConfig {
    /// Load settings for a graph, following the lookup order above
    pub fn load(explicit: Option<&Path>, graph_root: &Path) -> Result<Self, ConfigError> {
        let user = dirs::config_dir().map(|dir| dir.join("kbgraph").join("config.yaml"));
        match Self::locate(explicit, graph_root, user)? {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn locate(
        explicit: Option<&Path>,
        graph_root: &Path,
        user: Option<PathBuf>,
    ) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = graph_root.join(GRAPH_CONFIG_FILE);
        if local.is_file() {
            return Ok(Some(local));
        }

        Ok(user.filter(|path| path.is_file()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|e| match e {
            ConfigError::Yaml { source, .. } => ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Invalid(format!(
                "decimal_places must be at most {}",
                MAX_DECIMAL_PLACES
            )));
        }
        if self.pages_dir.trim().is_empty() || self.journals_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("directory names must not be empty".into()));
        }
        Ok(())
    }

    pub fn aggregate_config(&self, as_of: NaiveDate) -> AggregateConfig {
        AggregateConfig {
            hub_threshold: self.hub_threshold,
            tag_count_mode: self.tag_count_mode,
            tags_as_references: self.tags_as_references,
            upcoming_days: self.upcoming_days,
            as_of,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            ignore_code: self.ignore_code,
            ..AnalysisConfig::default()
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            pages_dir: self.pages_dir.clone(),
            journals_dir: self.journals_dir.clone(),
            include_journals: self.include_journals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = KbConfig::default();
        assert_eq!(config.hub_threshold, 5);
        assert_eq!(config.tag_count_mode, TagCountMode::Occurrences);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.decimal_places, 1);
        assert!(config.include_journals);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = KbConfig::from_yaml("hub_threshold: 3\ntag_count_mode: documents\n").unwrap();
        assert_eq!(config.hub_threshold, 3);
        assert_eq!(config.tag_count_mode, TagCountMode::Documents);
        assert_eq!(config.upcoming_days, 7);
        assert_eq!(config.pages_dir, "pages");

        assert_eq!(KbConfig::from_yaml("  \n").unwrap(), KbConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            KbConfig::from_yaml("top_n: 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            KbConfig::from_yaml("hub_threshold: lots"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn test_lookup_order() {
        let graph = TempDir::new().unwrap();
        let user_dir = TempDir::new().unwrap();
        let user = user_dir.path().join("config.yaml");
        std::fs::write(&user, "hub_threshold: 9\n").unwrap();

        // User config applies when the graph has none
        let found = KbConfig::locate(None, graph.path(), Some(user.clone())).unwrap();
        assert_eq!(found, Some(user.clone()));

        // Graph-local config shadows the user config
        let local = graph.path().join(GRAPH_CONFIG_FILE);
        std::fs::write(&local, "hub_threshold: 2\n").unwrap();
        let found = KbConfig::locate(None, graph.path(), Some(user.clone())).unwrap();
        assert_eq!(found, Some(local));

        // An explicit path wins over both
        let explicit = graph.path().join("other.yaml");
        std::fs::write(&explicit, "top_n: 3\n").unwrap();
        let found = KbConfig::locate(Some(&explicit), graph.path(), Some(user)).unwrap();
        assert_eq!(found, Some(explicit.clone()));

        let config = KbConfig::from_file(&explicit).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.hub_threshold, 5);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let graph = TempDir::new().unwrap();
        let missing = graph.path().join("nope.yaml");
        let result = KbConfig::load(Some(&missing), graph.path());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_no_files_means_defaults() {
        let graph = TempDir::new().unwrap();
        let found = KbConfig::locate(None, graph.path(), None).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_conversions() {
        let config = KbConfig {
            hub_threshold: 2,
            tags_as_references: true,
            ignore_code: false,
            include_journals: false,
            ..KbConfig::default()
        };
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let aggregate = config.aggregate_config(as_of);
        assert_eq!(aggregate.hub_threshold, 2);
        assert!(aggregate.tags_as_references);
        assert_eq!(aggregate.as_of, as_of);

        assert!(!config.analysis_config().ignore_code);
        assert!(!config.load_options().include_journals);
    }
}
