//! Option combination.
//!
//! Applies the full layer stack for one editor instance and hands the
//! merged result to plugin resolution. Pure: the device capabilities are
//! a parameter, not ambient state.

use tracing::debug;

use crate::device::DeviceContext;

use super::defaults::{default_mobile_options, default_options};
use super::plugins::{external_plugins, process_plugins};
use super::sections::{SectionResult, SECTION_KEYS};
use super::{NormalizedOptions, RawOptions};

/// Merge all option layers for `device` and resolve plugins.
///
/// Layer order, later wins: `defaults`, `override_options`, the user's
/// top-level options, the mobile section (mobile-class devices with a
/// section present only), and a forced external-plugins table. On
/// mobile-class devices the mobile defaults are seeded under the user's
/// mobile section before extraction, recursively, with the user winning.
pub fn combine_options(
    device: &DeviceContext,
    defaults: RawOptions,
    override_options: &RawOptions,
    user: RawOptions,
) -> NormalizedOptions {
    let forced_external = external_plugins(override_options, &user);

    let seeded = if device.is_mobile() {
        let section = user.mobile.as_deref().cloned().unwrap_or_default();
        let device_defaults = RawOptions::default()
            .with_mobile(default_mobile_options(&section, device.is_phone()));
        device_defaults.deep_overlay(user)
    } else {
        user
    };

    let sections = SectionResult::extract(SECTION_KEYS, seeded);
    let on_mobile = device.is_mobile() && sections.has_section("mobile");

    let mobile_layer = if on_mobile {
        sections.section("mobile", RawOptions::default())
    } else {
        RawOptions::default()
    };

    let mut merged = defaults
        .overlay(override_options.clone())
        .overlay(sections.options().clone())
        .overlay(mobile_layer);
    merged.external_plugins = Some(forced_external);

    debug!(
        device = device.class().as_str(),
        on_mobile, "combining option layers"
    );

    process_plugins(device.is_mobile(), &sections, override_options, merged)
}

/// Normalize `user` options for `device`, resolving built-in defaults
/// first. This is the entry point integrations call per editor instance.
pub fn normalize_options(
    device: &DeviceContext,
    override_options: &RawOptions,
    user: RawOptions,
) -> NormalizedOptions {
    let defaults = default_options(&user, device.touch());
    combine_options(device, defaults, override_options, user)
}
