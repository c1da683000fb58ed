//! Stage Config - staged configuration for infrastructure stacks
//!
//! Resolves per-project default configurations against a deployment stage
//! and derives the names the infrastructure stacks build from the result.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod naming;

pub use config::{ConfigError, EffectiveConfig, Preset};
pub use error::AppError;
pub use naming::{describe, NameReport, NameRequest, ResourceNamer};
pub use stage_resolver::{
    resolve, Config, ContextMetadata, ContextVariables, Extensions, Stage, StageError, Usage,
};
