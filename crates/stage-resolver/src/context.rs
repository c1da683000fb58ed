//! Context variables shared by every stack of a project.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ContextError;
use crate::stage::{ContextOverride, Stage, Usage};

/// Keys owned by [`ContextVariables`]; metadata may not reuse them.
pub const RESERVED_KEYS: &[&str] = &["context", "stage", "owner", "usage"];

/// Identity of a deployed project: what it is, where it runs, who owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextVariables {
    /// Logical application/project name.
    pub context: String,
    pub stage: Stage,
    pub owner: String,
    pub usage: Usage,
}

impl ContextVariables {
    pub fn new(
        context: impl Into<String>,
        stage: Stage,
        owner: impl Into<String>,
        usage: Usage,
    ) -> Self {
        Self {
            context: context.into(),
            stage,
            owner: owner.into(),
            usage,
        }
    }

    /// Field-level overlay: the override's fields win, the rest are kept.
    pub fn overlay(&self, over: ContextOverride) -> Self {
        Self {
            stage: over.stage,
            usage: over.usage,
            ..self.clone()
        }
    }
}

/// Context variables plus free-form string metadata, flattened into one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextMetadata {
    #[serde(flatten)]
    variables: ContextVariables,
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

impl ContextMetadata {
    /// Fails if any metadata key collides with a context variable.
    pub fn new(
        variables: ContextVariables,
        entries: BTreeMap<String, String>,
    ) -> Result<Self, ContextError> {
        if let Some(key) = entries.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(ContextError::ReservedKey(key.clone()));
        }
        Ok(Self { variables, entries })
    }

    pub fn variables(&self) -> &ContextVariables {
        &self.variables
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Flat key/value view, context variables first.
    pub fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = self.entries.clone();
        tags.insert("context".to_string(), self.variables.context.clone());
        tags.insert("stage".to_string(), self.variables.stage.to_string());
        tags.insert("owner".to_string(), self.variables.owner.clone());
        tags.insert("usage".to_string(), self.variables.usage.to_string());
        tags
    }
}
