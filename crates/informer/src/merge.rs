//! Depth-first merge of configuration trees.
//!
//! Partial overrides compose over the default tree without mutating it:
//! nested objects are merged key by key, everything else (strings, numbers,
//! booleans, arrays) is atomic and overwrites the destination value.

use serde_json::{Map, Value};

/// Merge `src` into `dest` in place.
///
/// For each key in a source object: if the source value is itself an
/// object, recurse into it (creating an empty destination object when the
/// key is absent or holds a non-object); otherwise the source value
/// overwrites the destination value. Keys absent from `src` are left
/// untouched at every depth.
pub fn deep_merge(dest: &mut Value, src: &Value) {
    match (dest, src) {
        (Value::Object(dest), Value::Object(src)) => {
            for (key, value) in src {
                if value.is_object() {
                    let slot = dest
                        .entry(key.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if !slot.is_object() {
                        *slot = Value::Object(Map::new());
                    }
                    deep_merge(slot, value);
                } else {
                    dest.insert(key.clone(), value.clone());
                }
            }
        }
        (dest, src) => *dest = src.clone(),
    }
}

/// Apply `patches` left to right over a copy of `base`.
///
/// Later patches win on conflicting leaf keys; `base` is never mutated.
pub fn merged(base: &Value, patches: &[&Value]) -> Value {
    let mut out = base.clone();
    for patch in patches {
        deep_merge(&mut out, patch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_override_preserves_siblings() {
        let base = json!({ "css": { "color": "#FFF", "background": "#000" } });
        let out = merged(&base, &[&json!({ "css": { "color": "#123" } })]);
        assert_eq!(out, json!({ "css": { "color": "#123", "background": "#000" } }));
    }

    #[test]
    fn test_later_patch_wins() {
        let base = json!({ "delay": 0, "close": true });
        let a = json!({ "delay": 500 });
        let b = json!({ "delay": 900, "pos": "top-left" });
        let out = merged(&base, &[&a, &b]);
        assert_eq!(out, json!({ "delay": 900, "close": true, "pos": "top-left" }));
    }

    #[test]
    fn test_nested_object_created_when_absent() {
        let base = json!({ "delay": 0 });
        let out = merged(&base, &[&json!({ "css": { "padding": "1px" } })]);
        assert_eq!(out, json!({ "delay": 0, "css": { "padding": "1px" } }));
    }

    #[test]
    fn test_object_replaces_scalar_slot() {
        let base = json!({ "css": "broken" });
        let out = merged(&base, &[&json!({ "css": { "color": "red" } })]);
        assert_eq!(out, json!({ "css": { "color": "red" } }));
    }

    #[test]
    fn test_arrays_are_atomic() {
        let base = json!({ "tags": [1, 2, 3] });
        let out = merged(&base, &[&json!({ "tags": [9] })]);
        assert_eq!(out, json!({ "tags": [9] }));
    }

    #[test]
    fn test_base_is_not_mutated() {
        let base = json!({ "css": { "color": "#FFF" } });
        let _ = merged(&base, &[&json!({ "css": { "color": "red" } })]);
        assert_eq!(base, json!({ "css": { "color": "#FFF" } }));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let base = json!({ "pos": "bottom-left", "css": { "margin": "10px" } });
        assert_eq!(merged(&base, &[&json!({})]), base);
        assert_eq!(merged(&base, &[]), base);
    }
}
