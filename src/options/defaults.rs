//! Built-in option defaults.
//!
//! Two default layers exist: one applied to every editor, sensitive only
//! to touch capability, and one seeded under the mobile section on phones
//! and tablets.

use super::{Menubar, RawOptions, Resize, ToolbarMode};

/// Defaults applied to every editor.
///
/// A `toolbar_mode` the caller already set is kept; otherwise floating.
/// Touch screens additionally lose the table picker grid and chrome
/// resizing. The two touch keys never disturb the resolved toolbar mode.
pub fn default_options(user: &RawOptions, is_touch: bool) -> RawOptions {
    let mut defaults = RawOptions {
        toolbar_mode: Some(user.toolbar_mode.unwrap_or(ToolbarMode::Floating)),
        ..RawOptions::default()
    };

    if is_touch {
        defaults.table_grid = Some(false);
        defaults.resize = Some(Resize::Disabled);
    }

    defaults
}

/// Defaults seeded under the mobile section on phones and tablets.
///
/// Three layers, later wins: touch, mobile, phone. The toolbar mode
/// resolves against the mobile section the user supplied, scrolling when
/// unset; the phone layer only hides the menubar.
pub fn default_mobile_options(mobile: &RawOptions, is_phone: bool) -> RawOptions {
    let touch = RawOptions {
        table_grid: Some(false),
        resize: Some(Resize::Disabled),
        ..RawOptions::default()
    };

    let general = RawOptions {
        resize: Some(Resize::Disabled),
        toolbar_mode: Some(mobile.toolbar_mode.unwrap_or(ToolbarMode::Scrolling)),
        toolbar_sticky: Some(false),
        ..RawOptions::default()
    };

    let phone = if is_phone {
        RawOptions {
            menubar: Some(Menubar::Hidden),
            ..RawOptions::default()
        }
    } else {
        RawOptions::default()
    };

    touch.overlay(general).overlay(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_touch() {
        let defaults = default_options(&RawOptions::default(), true);

        assert_eq!(defaults.toolbar_mode, Some(ToolbarMode::Floating));
        assert_eq!(defaults.table_grid, Some(false));
        assert_eq!(defaults.resize, Some(Resize::Disabled));
    }

    #[test]
    fn test_default_options_no_touch() {
        let defaults = default_options(&RawOptions::default(), false);

        assert_eq!(defaults.toolbar_mode, Some(ToolbarMode::Floating));
        assert_eq!(defaults.table_grid, None);
        assert_eq!(defaults.resize, None);
    }

    #[test]
    fn test_default_options_keep_explicit_toolbar_mode() {
        let user = RawOptions::default().with_toolbar_mode(ToolbarMode::Wrap);
        let defaults = default_options(&user, true);

        assert_eq!(defaults.toolbar_mode, Some(ToolbarMode::Wrap));
        assert_eq!(defaults.table_grid, Some(false));
    }

    #[test]
    fn test_mobile_defaults_phone() {
        let defaults = default_mobile_options(&RawOptions::default(), true);

        assert_eq!(defaults.table_grid, Some(false));
        assert_eq!(defaults.resize, Some(Resize::Disabled));
        assert_eq!(defaults.toolbar_mode, Some(ToolbarMode::Scrolling));
        assert_eq!(defaults.toolbar_sticky, Some(false));
        assert_eq!(defaults.menubar, Some(Menubar::Hidden));
    }

    #[test]
    fn test_mobile_defaults_tablet_keeps_menubar() {
        let defaults = default_mobile_options(&RawOptions::default(), false);

        assert_eq!(defaults.menubar, None);
        assert_eq!(defaults.toolbar_mode, Some(ToolbarMode::Scrolling));
    }

    #[test]
    fn test_mobile_defaults_keep_explicit_toolbar_mode() {
        let mobile = RawOptions::default().with_toolbar_mode(ToolbarMode::Sliding);
        let defaults = default_mobile_options(&mobile, true);

        assert_eq!(defaults.toolbar_mode, Some(ToolbarMode::Sliding));
    }
}
