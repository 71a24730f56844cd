//! Plugin list resolution.
//!
//! Plugin names arrive from up to three sources: the integration's forced
//! list, the user's desktop list, and an optional mobile-section list.
//! Resolution flattens each spec, selects per platform, and prepends the
//! forced names.

use std::collections::BTreeMap;

use tracing::debug;

use super::sections::SectionResult;
use super::{NormalizedOptions, PluginSpec, RawOptions};

/// Flatten a plugin spec into trimmed, non-empty names.
///
/// Arrays join with single spaces first, then the combined string splits
/// on single spaces. Order and duplicates are kept; an absent spec yields
/// no names.
pub fn normalize_plugins(spec: Option<&PluginSpec>) -> Vec<String> {
    let names = match spec {
        Some(PluginSpec::Names(names)) => names.clone(),
        Some(PluginSpec::List(list)) => list.join(" "),
        None => return Vec::new(),
    };

    names
        .split(' ')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge external plugin tables; user entries win on name collision.
pub fn external_plugins(
    override_options: &RawOptions,
    user: &RawOptions,
) -> BTreeMap<String, String> {
    let mut combined = override_options.external_plugins.clone().unwrap_or_default();
    if let Some(user_plugins) = &user.external_plugins {
        combined.extend(user_plugins.clone());
    }
    combined
}

/// Resolve the final plugin fields over fully merged options.
///
/// Forced plugins come from the override layer only. The mobile list is
/// the mobile section's own `plugins` when declared, the desktop list
/// otherwise; it is selected only on a mobile-class device with a mobile
/// section present. Everything else in `merged` passes through.
pub fn process_plugins(
    is_mobile: bool,
    sections: &SectionResult,
    override_options: &RawOptions,
    merged: RawOptions,
) -> NormalizedOptions {
    let forced = normalize_plugins(override_options.forced_plugins.as_ref());
    let desktop = normalize_plugins(merged.plugins.as_ref());

    let mobile_config = sections.section_config("mobile");
    let mobile = match &mobile_config.plugins {
        Some(spec) => normalize_plugins(Some(spec)),
        None => desktop.clone(),
    };

    let selected = if is_mobile && sections.has_section("mobile") {
        mobile
    } else {
        desktop
    };

    let mut combined = forced.clone();
    combined.extend(selected);
    let plugins = combined.join(" ");
    debug!(plugins = plugins.as_str(), "resolved plugin list");

    NormalizedOptions {
        plugins,
        forced_plugins: forced,
        external_plugins: merged.external_plugins.unwrap_or_default(),
        toolbar_mode: merged.toolbar_mode.unwrap_or_default(),
        toolbar_sticky: merged.toolbar_sticky,
        table_grid: merged.table_grid,
        resize: merged.resize,
        menubar: merged.menubar,
        extra: merged.extra,
    }
}
