//! Deployment stages and usage classifications.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::StageError;

/// Stages accepted by [`Stage::parse_strict`].
pub const DECLARED_STAGES: &[&str] = &["dev", "test", "prod", "sandbox", "orga"];

/// Deployment environment a configuration is resolved for.
///
/// Any string outside the declared set parses to [`Stage::Unknown`], which
/// is also the placeholder stage carried by unresolved defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Dev,
    Test,
    Prod,
    Sandbox,
    /// Organisation management account. Declared, but has no override row.
    Orga,
    #[default]
    #[serde(other)]
    Unknown,
}

/// The `stage`/`usage` pair a recognised stage forces onto a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOverride {
    pub stage: Stage,
    pub usage: Usage,
}

impl Stage {
    /// All stages, including the unknown placeholder.
    pub const ALL: [Stage; 6] = [
        Stage::Dev,
        Stage::Test,
        Stage::Prod,
        Stage::Sandbox,
        Stage::Orga,
        Stage::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Prod => "prod",
            Self::Sandbox => "sandbox",
            Self::Orga => "orga",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stage, rejecting anything outside [`DECLARED_STAGES`].
    pub fn parse_strict(raw: &str) -> Result<Self, StageError> {
        match raw {
            "dev" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "prod" => Ok(Self::Prod),
            "sandbox" => Ok(Self::Sandbox),
            "orga" => Ok(Self::Orga),
            other => Err(StageError::Unrecognized(other.to_string())),
        }
    }

    /// Row of the stage table, or `None` when the stage leaves the
    /// configuration untouched.
    pub fn overrides(&self) -> Option<ContextOverride> {
        let usage = match self {
            Self::Test | Self::Prod => Usage::Production,
            Self::Dev => Usage::Development,
            Self::Sandbox => Usage::Poc,
            Self::Orga | Self::Unknown => return None,
        };
        Some(ContextOverride { stage: *self, usage })
    }

    /// Whether resolving against this stage changes anything.
    pub fn is_recognized(&self) -> bool {
        self.overrides().is_some()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_strict(s).unwrap_or(Self::Unknown))
    }
}

/// Purpose/criticality tag of a deployed environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Usage {
    Poc,
    Ephemeral,
    Production,
    Management,
    Development,
}

impl Usage {
    pub const ALL: [Usage; 5] = [
        Usage::Poc,
        Usage::Ephemeral,
        Usage::Production,
        Usage::Management,
        Usage::Development,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poc => "POC",
            Self::Ephemeral => "EPHEMERAL",
            Self::Production => "PRODUCTION",
            Self::Management => "MANAGEMENT",
            Self::Development => "DEVELOPMENT",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Usage {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| StageError::UnknownUsage(s.to_string()))
    }
}
