//! Layer merge over untyped configuration values
//!
//! Layers are merged in precedence order with:
//! - Objects: merged by key, recursively
//! - Arrays: replaced (last wins)
//! - Scalars: replaced (last wins)

use serde_json::{json, Value};
use stage_resolver::{Stage, CONTEXT_VARIABLES_KEY};

use super::ConfigError;

/// Deep merge two JSON values, `overlay` winning on conflict.
///
/// - Objects: merged by key (recursive)
/// - Arrays: replaced wholesale
/// - Scalars and null: overlay wins
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (_, overlay) => overlay,
    }
}

/// Merge layers in order (first is base, last has highest precedence).
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

/// The partial config a stage overlays, or `None` for identity stages.
pub fn override_layer(stage: Stage) -> Option<Value> {
    let over = stage.overrides()?;
    Some(json!({
        CONTEXT_VARIABLES_KEY: {
            "stage": over.stage,
            "usage": over.usage,
        }
    }))
}

/// Resolve an untyped config value for a stage.
///
/// Same table as [`stage_resolver::resolve`], applied as one more merge
/// layer. `default` must be an object with a `contextVariables` object.
pub fn resolve_value(stage: Stage, default: &Value) -> Result<Value, ConfigError> {
    let has_context = default
        .get(CONTEXT_VARIABLES_KEY)
        .is_some_and(Value::is_object);
    if !has_context {
        return Err(ConfigError::Validation(format!(
            "config must be an object with a '{}' object",
            CONTEXT_VARIABLES_KEY
        )));
    }

    Ok(match override_layer(stage) {
        Some(layer) => deep_merge(default.clone(), layer),
        None => default.clone(),
    })
}
