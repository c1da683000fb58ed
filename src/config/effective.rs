//! Effective configuration with provenance
//!
//! The effective config is the stage-resolved configuration plus the list
//! of sources that contributed to its default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use stage_resolver::{Config, ContextError, ContextVariables, Stage, StageError};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

use super::merge::{merge_layers, resolve_value};
use super::presets::Preset;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "stage-config/effective_config@1";

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Preset,
    File,
    Cli,
}

/// A contributing config layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// Preset name (preset layers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// File path (file layers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (file layers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Stage-resolved configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// Stage the config was resolved for
    pub stage: Stage,

    /// The resolved configuration object
    pub config: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build the effective config from layers, then resolve it for `stage`.
    ///
    /// Layers, lowest precedence first: preset, file, CLI overrides. The
    /// stage table is applied after merging, so it always decides
    /// `contextVariables.stage` and `contextVariables.usage` for recognised
    /// stages.
    pub fn build(
        preset: Option<Preset>,
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
        stage: Stage,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: preset
        if let Some(preset) = preset {
            layers.push(preset.default_value()?);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Preset,
                name: Some(preset.name().to_string()),
                path: None,
                digest: None,
            });
            debug!(preset = %preset, "preset layer loaded");
        }

        // Layer 2: config file
        if let Some(path) = config_path {
            let (value, digest) = load_config_file(path)?;
            debug!(path = %path.display(), digest = %digest, "file layer loaded");
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                name: None,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 3: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                name: None,
                path: None,
                digest: None,
            });
        }

        // Typed parse validates only; the merged value is resolved as is so
        // stage strings outside the declared set survive.
        let merged = merge_layers(layers);
        let vars = validate_config(&merged)?;
        let config = resolve_value(stage, &merged)?;

        info!(
            stage = %stage,
            context = %vars.context,
            usage = config
                .pointer("/contextVariables/usage")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default(),
            layers = sources.len(),
            "configuration resolved"
        );

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            stage,
            config,
            sources,
        })
    }

    /// Typed view of the resolved config with a caller-chosen extension.
    pub fn typed<E: serde::de::DeserializeOwned>(&self) -> Result<Config<E>, ConfigError> {
        serde_json::from_value(self.config.clone())
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn context_variables(&self) -> Result<ContextVariables, ConfigError> {
        let config: Config = self.typed()?;
        Ok(config.context_variables)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get a config value by dot-separated path
    ///
    /// Numeric segments index into arrays: `orga.accounts.0.accountName`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = match current {
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => current.get(part)?,
            };
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }
}

/// Load a config file, returning its value and the digest of its bytes.
///
/// `.json` files are parsed as JSON, everything else as TOML.
pub fn load_config_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::Parse(format!("{}: invalid UTF-8: {}", path.display(), e)))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value = if is_json {
        serde_json::from_str(&contents).map_err(|e| {
            ConfigError::Parse(format!("{}: JSON parse error: {}", path.display(), e))
        })?
    } else {
        let table: toml::Value = toml::from_str(&contents).map_err(|e| {
            ConfigError::Parse(format!("{}: TOML parse error: {}", path.display(), e))
        })?;
        toml_to_json(table)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?
    };

    Ok((value, digest))
}

/// Convert TOML to JSON. JSON has no NaN or infinity, so those floats are
/// rejected.
fn toml_to_json(toml: toml::Value) -> Result<Value, String> {
    Ok(match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| format!("float {} has no JSON representation", f))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(
            arr.into_iter()
                .map(toml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| toml_to_json(v).map(|v| (k, v)))
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Parse the merged default and reject empty identity fields.
fn validate_config(merged: &Value) -> Result<ContextVariables, ConfigError> {
    if merged.is_null() {
        return Err(ConfigError::Validation(
            "no configuration layers (pass a preset or a config file)".to_string(),
        ));
    }

    let config: Config =
        Config::deserialize(merged).map_err(|e| ConfigError::Validation(e.to_string()))?;

    let vars = &config.context_variables;
    if vars.context.trim().is_empty() {
        return Err(ConfigError::Validation(
            "contextVariables.context must not be empty".to_string(),
        ));
    }
    if vars.owner.trim().is_empty() {
        return Err(ConfigError::Validation(
            "contextVariables.owner must not be empty".to_string(),
        ));
    }

    Ok(config.context_variables)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    Context(#[from] ContextError),
}
