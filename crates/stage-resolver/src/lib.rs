//! Stage-aware resolution of infrastructure context configuration.
//!
//! Every project ships a default [`Config`] whose context variables carry a
//! placeholder stage. [`resolve`] overlays the `stage`/`usage` pair of the
//! requested [`Stage`] onto that default, keeping every other field as is.

mod config;
mod context;
mod error;
mod stage;

pub use config::{Config, Extensions, CONTEXT_VARIABLES_KEY};
pub use context::{ContextMetadata, ContextVariables, RESERVED_KEYS};
pub use error::{ContextError, StageError};
pub use stage::{ContextOverride, Stage, Usage, DECLARED_STAGES};

/// Resolve a default configuration for a stage.
///
/// Recognised stages (`dev`, `test`, `prod`, `sandbox`) replace
/// `contextVariables.stage` and `contextVariables.usage`; every other field,
/// including the whole extension record, is copied from `default`. Any other
/// stage returns a copy of `default`. The input is never modified.
pub fn resolve<E: Clone>(stage: Stage, default: &Config<E>) -> Config<E> {
    match stage.overrides() {
        Some(over) => Config {
            context_variables: default.context_variables.overlay(over),
            extension: default.extension.clone(),
        },
        None => default.clone(),
    }
}

impl<E: Clone> Config<E> {
    /// Method form of [`resolve`].
    pub fn resolve(&self, stage: Stage) -> Self {
        resolve(stage, self)
    }
}
