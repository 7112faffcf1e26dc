//! Configuration for album-index runs.
//!
//! Settings live in a `config.toml` placed next to the input file. Every key
//! has a default, so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root_policy = "strict"    # "strict" rejects galleries with several roots,
//!                           # "first" keeps the first root edge in input order
//! report_orphans = true     # Log a warning for every edge left out of an index
//!
//! [processing]
//! max_processes = 4         # Max parallel gallery workers (omit for auto = CPU cores)
//!
//! [output]
//! pretty = true             # Pretty-print the JSON index
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::flatten::{AlbumTreeFlattener, RootPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up next to the input.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for a flatten run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// What to do when a gallery has more than one root album.
    pub root_policy: RootPolicy,
    /// Log excluded edges at `warn` level.
    pub report_orphans: bool,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Index output settings.
    pub output: OutputConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root_policy: RootPolicy::default(),
            report_orphans: true,
            processing: ProcessingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// A flattener configured from these settings.
    pub fn flattener(&self) -> AlbumTreeFlattener {
        AlbumTreeFlattener::new(self.root_policy).with_excluded_logging(self.report_orphans)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of galleries flattened at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

impl ProcessingConfig {
    /// Worker count for the gallery pool: `max_processes` capped at the core
    /// count, or every core when unset.
    pub fn worker_threads(&self) -> usize {
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        self.max_processes.map_or(cores, |n| n.min(cores))
    }
}

/// Index output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Load `config.toml` from the given directory.
///
/// A missing file yields the defaults. Keys absent from the file keep their
/// default values through `#[serde(default)]`.
pub fn load_config(dir: &Path) -> Result<IndexConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    let config = if config_path.exists() {
        toml::from_str(&fs::read_to_string(&config_path)?)?
    } else {
        IndexConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# album-index configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Place this file next to the galleries JSON file as config.toml.
# Unknown keys will cause an error.

# What to do when a gallery has more than one root album (parent_id = 0).
#   "strict" - reject the gallery
#   "first"  - keep the first root edge in input order, ignore the others
root_policy = "strict"

# Log a warning for every album edge left out of an index
# (missing parent, parent not under the root, ignored extra root,
# album already indexed through another edge).
report_orphans = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum galleries flattened in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Pretty-print the JSON index.
pretty = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = load_config(TempDir::new().unwrap().path()).unwrap();
        assert_eq!(config.root_policy, RootPolicy::Strict);
        assert!(config.report_orphans);
        assert_eq!(config.processing.max_processes, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn parse_partial_config_keeps_other_defaults() {
        let config: IndexConfig = toml::from_str(r#"root_policy = "first""#).unwrap();
        assert_eq!(config.root_policy, RootPolicy::FirstWins);
        assert!(config.report_orphans);
        assert!(config.output.pretty);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
report_orphans = false

[output]
pretty = false
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert!(!config.report_orphans);
        assert!(!config.output.pretty);
        // Unspecified values should be defaults
        assert_eq!(config.root_policy, RootPolicy::Strict);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_processes_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[processing]\nmax_processes = 0\n",
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_root_policy_rejected() {
        let result: Result<IndexConfig, _> = toml::from_str(r#"root_policy = "random""#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[output]
prety = true
"#;
        let result: Result<IndexConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<IndexConfig, _> = toml::from_str("[outputs]\npretty = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: IndexConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.root_policy, RootPolicy::Strict);
        assert!(config.report_orphans);
        assert_eq!(config.processing.max_processes, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn flattener_follows_root_policy() {
        let config: IndexConfig = toml::from_str(r#"root_policy = "first""#).unwrap();
        assert_eq!(config.flattener().root_policy(), RootPolicy::FirstWins);
    }

    // =========================================================================
    // Processing
    // =========================================================================

    fn cores() -> usize {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    }

    #[test]
    fn worker_threads_default_to_all_cores() {
        assert_eq!(ProcessingConfig::default().worker_threads(), cores());
    }

    #[test]
    fn worker_threads_never_exceed_cores() {
        let processing = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(processing.worker_threads(), cores());
        let single = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(single.worker_threads(), 1);
    }

    #[test]
    fn sparse_file_keeps_nested_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[processing]\nmax_processes = 2\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.processing.max_processes, Some(2));
        assert!(config.output.pretty);
        assert!(config.report_orphans);
    }
}
