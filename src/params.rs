//! Typed option access.
//!
//! Reads values out of a [`NormalizedOptions`] with runtime shape
//! filtering: a stored value of the wrong shape counts as absent and the
//! caller's default applies. Also parses the compact `key=value` hash
//! format some options accept as a string.

use std::collections::BTreeMap;

use tracing::warn;

use crate::options::NormalizedOptions;
use crate::value::{Callback, OptionMap, OptionValue};

/// Conversion from a stored option value into a concrete parameter type.
///
/// Implemented for the closed set of shapes options are read as. `None`
/// signals a shape mismatch, never a lossy coercion: a numeric string
/// does not convert to a number.
pub trait ParamValue: Sized {
    /// Extract `Self` from `value`, or `None` on a shape mismatch.
    fn from_option(value: &OptionValue) -> Option<Self>;
}

impl ParamValue for String {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl ParamValue for bool {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_bool()
    }
}

impl ParamValue for f64 {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_f64()
    }
}

impl ParamValue for i64 {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_i64()
    }
}

impl ParamValue for u64 {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_u64()
    }
}

impl ParamValue for OptionMap {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl ParamValue for Vec<OptionValue> {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_array().map(<[OptionValue]>::to_vec)
    }
}

/// Succeeds only when every element of the stored array is a string.
impl ParamValue for Vec<String> {
    fn from_option(value: &OptionValue) -> Option<Self> {
        let items = value.as_array()?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }
}

impl ParamValue for Callback {
    fn from_option(value: &OptionValue) -> Option<Self> {
        value.as_callback().cloned()
    }
}

/// Read option `name` as a `T`, falling back to `default` when the
/// option is absent or holds a value of another shape.
pub fn get<T: ParamValue>(options: &NormalizedOptions, name: &str, default: T) -> T {
    options
        .value_of(name)
        .as_ref()
        .and_then(T::from_option)
        .unwrap_or(default)
}

/// Read option `name` without shape filtering.
pub fn raw(options: &NormalizedOptions, name: &str, default: OptionValue) -> OptionValue {
    options.value_of(name).unwrap_or(default)
}

/// Read option `name` as a hash table.
///
/// String values go through [`parse_hash`]; object values are taken
/// as-is. Any other stored shape yields an empty table, with `default`
/// reserved for the option being absent entirely.
pub fn get_hash(options: &NormalizedOptions, name: &str, default: OptionMap) -> OptionMap {
    match options.value_of(name) {
        Some(OptionValue::String(text)) => parse_hash(&text)
            .into_iter()
            .map(|(key, value)| (key, OptionValue::String(value)))
            .collect(),
        Some(OptionValue::Object(map)) => map,
        Some(other) => {
            warn!(option = name, kind = other.kind(), "dropping non-hash value");
            OptionMap::new()
        }
        None => default,
    }
}

/// Parse the compact `key=value` hash format.
///
/// When the input contains an `=`, entries split on `;` or `,`, but a
/// separator only ends an entry when the text after it (up to the next
/// separator or the end) carries its own `=`. Values can therefore hold
/// commas: `"a=1,2;b=3"` is two entries. Without any `=` the input is a
/// plain comma list where each item maps to itself. Each entry splits on
/// its first `=`, both halves trimmed, and later duplicate keys win.
pub fn parse_hash(input: &str) -> BTreeMap<String, String> {
    let entries = if input.contains('=') {
        split_entries(input)
    } else {
        input.split(',').map(str::to_string).collect()
    };

    let mut hash = BTreeMap::new();
    for entry in &entries {
        match entry.split_once('=') {
            Some((key, value)) => {
                hash.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                let item = entry.trim().to_string();
                hash.insert(item.clone(), item);
            }
        }
    }
    hash
}

/// Split on `;`/`,` separators that are followed by another `key=` pair.
fn split_entries(input: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    let mut entries = Vec::new();
    let mut start = 0;
    for idx in 0..bytes.len() {
        if bytes[idx] != b';' && bytes[idx] != b',' {
            continue;
        }
        let rest = &bytes[idx + 1..];
        let segment_end = rest
            .iter()
            .position(|&b| b == b';' || b == b',')
            .unwrap_or(rest.len());
        if rest[..segment_end].contains(&b'=') {
            entries.push(input[start..idx].to_string());
            start = idx + 1;
        }
    }
    entries.push(input[start..].to_string());
    entries
}
