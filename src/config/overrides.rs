//! Command-line overrides (`--set key.path=value`)

use serde_json::{Map, Value};

use super::ConfigError;

/// Parse `key.path=value` pairs into one JSON object.
///
/// Arrays, objects, quoted strings, `true`, `false` and `null` are decoded as
/// JSON. Everything else, bare numbers included, stays a plain string so
/// account ids like `607050363559` keep their type. Later pairs win.
pub fn parse_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<Value, ConfigError> {
    let mut root = Map::new();

    for pair in pairs {
        let pair = pair.as_ref();
        let (path, raw) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::Parse(format!("override '{}' is not key=value", pair)))?;

        let keys: Vec<&str> = path.split('.').collect();
        if keys.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Parse(format!(
                "override '{}' has an empty key segment",
                pair
            )));
        }

        insert_path(&mut root, &keys, parse_value(raw));
    }

    Ok(Value::Object(root))
}

fn parse_value(raw: &str) -> Value {
    let structured = raw.starts_with(['[', '{', '"']) || matches!(raw, "true" | "false" | "null");
    if structured {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

fn insert_path(map: &mut Map<String, Value>, keys: &[&str], value: Value) {
    match keys {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [first, rest @ ..] => {
            let child = map
                .entry((*first).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child_map) = child {
                insert_path(child_map, rest, value);
            }
        }
    }
}
