//! Option merge logic.
//!
//! One merge shape serves every layer:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (overlay wins entirely)
//! - Scalars and callbacks: override (overlay wins)

use crate::value::{OptionMap, OptionValue};

/// Deep merge two option values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (no concatenation)
/// - Scalars and callbacks: override (overlay wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: OptionValue, overlay: OptionValue) -> OptionValue {
    match (base, overlay) {
        // Both objects: deep merge
        (OptionValue::Object(base_map), OptionValue::Object(overlay_map)) => {
            OptionValue::Object(deep_merge_maps(base_map, overlay_map))
        }

        // Arrays: REPLACE (no concatenation)
        (OptionValue::Array(_), overlay @ OptionValue::Array(_)) => overlay,

        // Scalars and any other case: overlay wins
        (_, overlay) => overlay,
    }
}

/// Deep merge two option maps; overlay entries win key by key.
pub fn deep_merge_maps(mut base: OptionMap, overlay: OptionMap) -> OptionMap {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Callback;
    use serde_json::json;

    fn value(raw: serde_json::Value) -> OptionValue {
        OptionValue::from(raw)
    }

    #[test]
    fn test_scalar_override() {
        let base = value(json!({"height": 300}));
        let overlay = value(json!({"height": 500}));
        let result = deep_merge(base, overlay);
        assert_eq!(result, value(json!({"height": 500})));
    }

    #[test]
    fn test_object_deep_merge() {
        let base = value(json!({
            "mobile": {
                "menubar": false,
                "toolbar_sticky": false
            }
        }));
        let overlay = value(json!({
            "mobile": {
                "menubar": true
            }
        }));
        let result = deep_merge(base, overlay);

        // menubar overridden, toolbar_sticky preserved
        assert_eq!(
            result,
            value(json!({
                "mobile": {
                    "menubar": true,
                    "toolbar_sticky": false
                }
            }))
        );
    }

    #[test]
    fn test_array_replace() {
        let base = value(json!({"plugins": ["lists", "link", "table"]}));
        let overlay = value(json!({"plugins": ["media"]}));
        let result = deep_merge(base, overlay);

        // Array completely replaced, not concatenated
        assert_eq!(result, value(json!({"plugins": ["media"]})));
    }

    #[test]
    fn test_add_new_key() {
        let base = value(json!({"height": 300}));
        let overlay = value(json!({"width": 600}));
        let result = deep_merge(base, overlay);

        assert_eq!(result, value(json!({"height": 300, "width": 600})));
    }

    #[test]
    fn test_null_override() {
        let base = value(json!({"margin": 10}));
        let overlay = value(json!({"margin": null}));
        let result = deep_merge(base, overlay);

        assert_eq!(result, value(json!({"margin": null})));
    }

    #[test]
    fn test_callback_override() {
        let hook = Callback::new(7u8);
        let mut base = OptionMap::new();
        base.insert("setup".to_string(), OptionValue::from("stale"));
        let mut overlay = OptionMap::new();
        overlay.insert("setup".to_string(), OptionValue::Callback(hook.clone()));

        let result = deep_merge_maps(base, overlay);
        assert_eq!(result["setup"], OptionValue::Callback(hook));
    }

    #[test]
    fn test_nested_deep_merge() {
        let base = value(json!({
            "mobile": {
                "toolbar": {
                    "items": "undo",
                    "sticky": false
                }
            }
        }));
        let overlay = value(json!({
            "mobile": {
                "toolbar": {
                    "sticky": true,
                    "mode": "scrolling"
                }
            }
        }));
        let result = deep_merge(base, overlay);

        assert_eq!(
            result,
            value(json!({
                "mobile": {
                    "toolbar": {
                        "items": "undo",
                        "sticky": true,
                        "mode": "scrolling"
                    }
                }
            }))
        );
    }
}
