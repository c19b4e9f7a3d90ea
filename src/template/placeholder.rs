//! Placeholder rewriting - substitutes the iteration number into a resource tree

use serde_json::{Map, Value};

/// Rewrite every occurrence of `placeholder` in `value` with `iteration`
///
/// Walks mappings (keys and values), sequences and strings. Numbers, booleans
/// and null are returned unchanged. When two keys of one mapping rewrite to the
/// same text, the entry encountered later wins.
pub fn rewrite(value: &Value, iteration: u64, placeholder: &str) -> Value {
    let replacement = iteration.to_string();
    rewrite_with(value, placeholder, &replacement)
}

fn rewrite_with(value: &Value, placeholder: &str, replacement: &str) -> Value {
    match value {
        Value::Object(map) => {
            let mut rewritten = Map::with_capacity(map.len());
            for (key, inner) in map {
                let new_key = substitute(key, placeholder, replacement);
                let new_value = rewrite_with(inner, placeholder, replacement);
                if rewritten.insert(new_key.clone(), new_value).is_some() {
                    tracing::warn!(
                        key = %key,
                        rewritten = %new_key,
                        "placeholder substitution collapsed two keys, later entry wins"
                    );
                }
            }
            Value::Object(rewritten)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| rewrite_with(item, placeholder, replacement))
                .collect(),
        ),
        Value::String(text) => Value::String(substitute(text, placeholder, replacement)),
        Value::Number(_) | Value::Bool(_) | Value::Null => value.clone(),
    }
}

fn substitute(text: &str, placeholder: &str, replacement: &str) -> String {
    if placeholder.is_empty() {
        return text.to_string();
    }
    text.replace(placeholder, replacement)
}
