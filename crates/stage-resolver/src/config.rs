//! Open configuration record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::ContextVariables;

/// JSON key of the context variables in a serialized [`Config`].
pub const CONTEXT_VARIABLES_KEY: &str = "contextVariables";

/// Untyped top-level fields carried next to the context variables.
pub type Extensions = Map<String, Value>;

/// Context variables plus a project-specific extension record.
///
/// The extension is flattened into the same JSON object, so
/// `Config<Extensions>` round-trips arbitrary extra top-level fields and a
/// typed `E` gives the same shape with checked fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config<E = Extensions> {
    #[serde(rename = "contextVariables")]
    pub context_variables: ContextVariables,

    #[serde(flatten)]
    pub extension: E,
}

impl<E> Config<E> {
    pub fn new(context_variables: ContextVariables, extension: E) -> Self {
        Self {
            context_variables,
            extension,
        }
    }

    /// Swap the extension record, keeping the context variables.
    pub fn map_extension<F, T>(self, f: F) -> Config<T>
    where
        F: FnOnce(E) -> T,
    {
        Config {
            context_variables: self.context_variables,
            extension: f(self.extension),
        }
    }
}

impl Config<Extensions> {
    /// Config with no extension fields.
    pub fn bare(context_variables: ContextVariables) -> Self {
        Self::new(context_variables, Extensions::new())
    }

    /// Builder-style insertion of an extension field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extension.insert(key.into(), value);
        self
    }
}
