//! Dynamic option values.
//!
//! Options arrive from embedding hosts as loosely typed documents (JSON or
//! TOML) plus host-registered callbacks. `OptionValue` is the common
//! currency: the JSON data model extended with an opaque callback variant.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

/// Map of option names to values, ordered by key.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// An opaque host callback attached to an option.
///
/// Normalization never invokes callbacks; it only routes them through the
/// merge layers untouched. Hosts downcast back to the concrete type they
/// registered. Equality is identity: a callback equals only its own clones.
#[derive(Clone)]
pub struct Callback(Arc<dyn Any + Send + Sync>);

impl Callback {
    /// Wrap a host hook.
    pub fn new<T: Any + Send + Sync>(hook: T) -> Self {
        Self(Arc::new(hook))
    }

    /// Recover the concrete hook type, if it matches.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<callback>")
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<OptionValue>),
    Object(OptionMap),
    Callback(Callback),
}

impl OptionValue {
    /// Value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric value widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    /// Numeric value as i64; floats do not coerce.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    /// Numeric value as u64; floats and negatives do not coerce.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            OptionValue::Number(number) => number.as_u64(),
            _ => None,
        }
    }

    /// Value as an array slice, if it is one.
    pub fn as_array(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Value as an object map, if it is one.
    pub fn as_object(&self) -> Option<&OptionMap> {
        match self {
            OptionValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Value as a callback, if it is one.
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            OptionValue::Callback(callback) => Some(callback),
            _ => None,
        }
    }

    /// Shape name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            OptionValue::Null => "null",
            OptionValue::Bool(_) => "bool",
            OptionValue::Number(_) => "number",
            OptionValue::String(_) => "string",
            OptionValue::Array(_) => "array",
            OptionValue::Object(_) => "object",
            OptionValue::Callback(_) => "callback",
        }
    }

    /// Render as JSON. Fails when a callback sits anywhere in the value,
    /// since callbacks have no JSON form.
    pub fn to_json(&self) -> Result<JsonValue, CallbackValueError> {
        self.to_json_at("")
    }

    fn to_json_at(&self, path: &str) -> Result<JsonValue, CallbackValueError> {
        match self {
            OptionValue::Null => Ok(JsonValue::Null),
            OptionValue::Bool(flag) => Ok(JsonValue::Bool(*flag)),
            OptionValue::Number(number) => Ok(JsonValue::Number(number.clone())),
            OptionValue::String(text) => Ok(JsonValue::String(text.clone())),
            OptionValue::Array(items) => {
                let mut rendered = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    rendered.push(item.to_json_at(&format!("{}[{}]", path, idx))?);
                }
                Ok(JsonValue::Array(rendered))
            }
            OptionValue::Object(map) => {
                let mut rendered = serde_json::Map::new();
                for (key, value) in map {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    rendered.insert(key.clone(), value.to_json_at(&child)?);
                }
                Ok(JsonValue::Object(rendered))
            }
            OptionValue::Callback(_) => Err(CallbackValueError {
                path: if path.is_empty() {
                    "(root)".to_string()
                } else {
                    path.to_string()
                },
            }),
        }
    }

    /// Convert a parsed TOML document. Datetimes carry over as strings.
    pub fn from_toml(toml: toml::Value) -> Self {
        match toml {
            toml::Value::String(text) => OptionValue::String(text),
            toml::Value::Integer(number) => OptionValue::Number(number.into()),
            toml::Value::Float(number) => serde_json::Number::from_f64(number)
                .map(OptionValue::Number)
                .unwrap_or(OptionValue::Null),
            toml::Value::Boolean(flag) => OptionValue::Bool(flag),
            toml::Value::Datetime(dt) => OptionValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                OptionValue::Array(items.into_iter().map(OptionValue::from_toml).collect())
            }
            toml::Value::Table(table) => OptionValue::Object(
                table
                    .into_iter()
                    .map(|(key, value)| (key, OptionValue::from_toml(value)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for OptionValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => OptionValue::Null,
            JsonValue::Bool(flag) => OptionValue::Bool(flag),
            JsonValue::Number(number) => OptionValue::Number(number),
            JsonValue::String(text) => OptionValue::String(text),
            JsonValue::Array(items) => {
                OptionValue::Array(items.into_iter().map(OptionValue::from).collect())
            }
            JsonValue::Object(map) => OptionValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, OptionValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(flag: bool) -> Self {
        OptionValue::Bool(flag)
    }
}

impl From<i32> for OptionValue {
    fn from(number: i32) -> Self {
        OptionValue::Number(i64::from(number).into())
    }
}

impl From<i64> for OptionValue {
    fn from(number: i64) -> Self {
        OptionValue::Number(number.into())
    }
}

impl From<u64> for OptionValue {
    fn from(number: u64) -> Self {
        OptionValue::Number(number.into())
    }
}

impl From<f64> for OptionValue {
    fn from(number: f64) -> Self {
        serde_json::Number::from_f64(number)
            .map(OptionValue::Number)
            .unwrap_or(OptionValue::Null)
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        OptionValue::String(text.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        OptionValue::String(text)
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(items: Vec<OptionValue>) -> Self {
        OptionValue::Array(items)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(map: OptionMap) -> Self {
        OptionValue::Object(map)
    }
}

impl From<Callback> for OptionValue {
    fn from(callback: Callback) -> Self {
        OptionValue::Callback(callback)
    }
}

/// A callback-valued option cannot be rendered as JSON.
#[derive(Debug, thiserror::Error)]
#[error("option `{path}` holds a callback with no JSON form")]
pub struct CallbackValueError {
    /// Dotted path to the offending value.
    pub path: String,
}
