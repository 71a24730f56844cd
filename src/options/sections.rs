//! Section extraction.
//!
//! Some option names carry per-context override blocks rather than plain
//! values. Extraction splits a document into those recognized sections and
//! the remaining top-level options.

use std::collections::BTreeMap;

use crate::value::OptionValue;

use super::RawOptions;

/// Option names treated as override sections.
pub const SECTION_KEYS: &[&str] = &["mobile"];

/// A document partitioned into recognized sections and everything else.
///
/// Every key of the source document lands in exactly one side of the
/// partition. Immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct SectionResult {
    sections: BTreeMap<String, RawOptions>,
    options: RawOptions,
}

impl SectionResult {
    /// Partition `options` on the recognized section names.
    pub fn extract(keys: &[&str], options: RawOptions) -> Self {
        let mut rest = options;
        let mut sections = BTreeMap::new();

        for &key in keys {
            if key == "mobile" {
                if let Some(section) = rest.mobile.take() {
                    sections.insert(key.to_string(), *section);
                }
                continue;
            }

            // Other recognized names live in the extras; only object
            // values count as sections.
            match rest.extra.remove(key) {
                Some(OptionValue::Object(section)) => {
                    sections.insert(key.to_string(), RawOptions::from_map(section));
                }
                Some(other) => {
                    rest.extra.insert(key.to_string(), other);
                }
                None => {}
            }
        }

        Self {
            sections,
            options: rest,
        }
    }

    /// True when the named section was present.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// The named section overlaid on `defaults`, or `defaults` alone when
    /// the section is absent.
    pub fn section(&self, name: &str, defaults: RawOptions) -> RawOptions {
        match self.sections.get(name) {
            Some(section) => defaults.overlay(section.clone()),
            None => defaults,
        }
    }

    /// The named section as written, or empty options when absent.
    pub fn section_config(&self, name: &str) -> RawOptions {
        self.sections.get(name).cloned().unwrap_or_default()
    }

    /// The options not claimed by any section.
    pub fn options(&self) -> &RawOptions {
        &self.options
    }
}
