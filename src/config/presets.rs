//! Built-in project defaults (layer 1)
//!
//! One named constructor per project. Every preset carries the `unknown`
//! placeholder stage and `EPHEMERAL` usage until it is resolved.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stage_resolver::{resolve, Config, ContextVariables, Stage, Usage};
use std::fmt;

use super::ConfigError;

/// Management account that publishes shared SSM parameters.
pub const ORGA_ACCOUNT_ID: &str = "607050363559";

/// Default owner of every preset.
pub const DEFAULT_OWNER: &str = "operations";

/// An account of the organisation, addressed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgAccount {
    #[serde(rename = "accountName")]
    pub account_name: String,
}

/// Organisation accounts a project shares data with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(rename = "orgaAccountId")]
    pub orga_account_id: String,

    pub accounts: Vec<OrgAccount>,
}

/// Extension record of the data-platform project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataExtension {
    pub orga: OrgConfig,
}

/// Extension record of the ML platform project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orga: Option<OrgConfig>,
}

pub type DataConfig = Config<DataExtension>;
pub type MlConfig = Config<MlExtension>;

fn placeholder_context(context: &str) -> ContextVariables {
    ContextVariables::new(context, Stage::Unknown, DEFAULT_OWNER, Usage::Ephemeral)
}

/// Default config of the retail data platform.
pub fn data_platform() -> DataConfig {
    Config::new(
        placeholder_context("data-platform"),
        DataExtension {
            orga: OrgConfig {
                orga_account_id: ORGA_ACCOUNT_ID.to_string(),
                accounts: vec![OrgAccount {
                    account_name: "ml_platform_b".to_string(),
                }],
            },
        },
    )
}

/// Default config of the SageMaker ML platform.
pub fn ml_platform() -> MlConfig {
    Config::new(placeholder_context("mlops-sagemaker"), MlExtension::default())
}

/// Named preset, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    DataPlatform,
    MlPlatform,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::DataPlatform, Preset::MlPlatform];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DataPlatform => "data-platform",
            Self::MlPlatform => "ml-platform",
        }
    }

    /// The unresolved default as a JSON value.
    pub fn default_value(&self) -> Result<Value, ConfigError> {
        let value = match self {
            Self::DataPlatform => serde_json::to_value(data_platform()),
            Self::MlPlatform => serde_json::to_value(ml_platform()),
        };
        value.map_err(|e| ConfigError::Parse(format!("preset {}: {}", self.name(), e)))
    }

    /// The default resolved for `stage`, as a JSON value.
    pub fn resolve(&self, stage: Stage) -> Result<Value, ConfigError> {
        let value = match self {
            Self::DataPlatform => serde_json::to_value(resolve(stage, &data_platform())),
            Self::MlPlatform => serde_json::to_value(resolve(stage, &ml_platform())),
        };
        value.map_err(|e| ConfigError::Parse(format!("preset {}: {}", self.name(), e)))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
