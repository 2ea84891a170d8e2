//! Dot-path lookup over `serde_json::Value`.

use serde_json::Value;

/// Resolve `path` (e.g. `limits.low`, `metrics.0.value`) against `root`.
///
/// Object segments are keys; purely numeric segments also index arrays.
/// A missing intermediate segment, a scalar in the middle of the path, or a
/// final `null` all resolve to `None`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}
