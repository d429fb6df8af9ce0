//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// A missing file is not an error; defaults apply. Environment variables are
    /// prefixed with `MOULINETTE_` and use double underscores for nested values,
    /// for example `MOULINETTE_EVALUATION__MIN_RECALL=0.8` or
    /// `MOULINETTE_EVALUATION__K_VALUES=1,5,20`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // config crate doesn't apply serde defaults for keys missing from every source
        let builder = set_config_default(builder, "validation.max_k", default_max_k() as i64)?;
        let builder = set_config_default(
            builder,
            "validation.max_span_length",
            default_max_span_length() as i64,
        )?;
        let builder = set_config_default(builder, "validation.span_length_policy", "warn")?;
        let builder = set_config_default(
            builder,
            "evaluation.iou_threshold",
            default_iou_threshold(),
        )?;
        let builder = set_config_default(
            builder,
            "evaluation.k_values",
            default_k_values()
                .into_iter()
                .map(|k| k as i64)
                .collect::<Vec<_>>(),
        )?;
        let builder = set_config_default(builder, "evaluation.gate_k", default_gate_k() as i64)?;
        let mut builder =
            set_config_default(builder, "evaluation.min_recall", default_min_recall())?;

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MOULINETTE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("evaluation.k_values")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.moulinette/config.toml or custom --config path)
    /// 3. Environment variables (MOULINETTE_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
