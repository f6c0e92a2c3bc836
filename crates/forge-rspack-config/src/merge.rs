//! Deep merge of JSON configuration values.
//!
//! Rules, applied recursively with the update winning:
//! - object + object: merge key by key
//! - array + array: concatenate (target items first)
//! - anything else: the update replaces the target

use serde_json::Value;

/// Merge `update` into `target`.
pub fn merge_values(target: &mut Value, update: Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                match target_map.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target_items), Value::Array(update_items)) => {
            target_items.extend(update_items);
        }
        (target_slot, update) => {
            *target_slot = update;
        }
    }
}

/// Merge a sequence of values left to right into a single value.
pub fn merge_all<I>(values: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = Value::Object(serde_json::Map::new());
    for value in values {
        merge_values(&mut merged, value);
    }
    merged
}
