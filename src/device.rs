//! Device capability context.
//!
//! Normalization varies by the class of device hosting the editor and by
//! touch capability. Callers pass a `DeviceContext` snapshot explicitly;
//! nothing here sniffs the platform.

/// Coarse device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Phone,
}

impl DeviceClass {
    /// Lowercase class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Phone => "phone",
        }
    }
}

/// Capability snapshot for the device hosting the editor.
///
/// Phones and tablets always report touch; a desktop may or may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceContext {
    class: DeviceClass,
    touch: bool,
}

impl DeviceContext {
    /// Desktop without a touch screen.
    pub fn desktop() -> Self {
        Self {
            class: DeviceClass::Desktop,
            touch: false,
        }
    }

    /// Desktop with a touch screen.
    pub fn desktop_touch() -> Self {
        Self {
            class: DeviceClass::Desktop,
            touch: true,
        }
    }

    /// Tablet; touch is implied.
    pub fn tablet() -> Self {
        Self {
            class: DeviceClass::Tablet,
            touch: true,
        }
    }

    /// Phone; touch is implied.
    pub fn phone() -> Self {
        Self {
            class: DeviceClass::Phone,
            touch: true,
        }
    }

    /// Build from parts. The touch flag is forced on for phones and
    /// tablets.
    pub fn new(class: DeviceClass, touch: bool) -> Self {
        let touch = touch || class != DeviceClass::Desktop;
        Self { class, touch }
    }

    /// The device family.
    pub fn class(&self) -> DeviceClass {
        self.class
    }

    /// Whether the device has a touch screen.
    pub fn touch(&self) -> bool {
        self.touch
    }

    /// True for phones.
    pub fn is_phone(&self) -> bool {
        self.class == DeviceClass::Phone
    }

    /// True for tablets.
    pub fn is_tablet(&self) -> bool {
        self.class == DeviceClass::Tablet
    }

    /// True for phones and tablets.
    pub fn is_mobile(&self) -> bool {
        self.is_phone() || self.is_tablet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_classes_imply_touch() {
        assert!(DeviceContext::phone().touch());
        assert!(DeviceContext::tablet().touch());
        assert!(DeviceContext::new(DeviceClass::Phone, false).touch());
        assert!(DeviceContext::new(DeviceClass::Tablet, false).touch());
    }

    #[test]
    fn test_desktop_touch_is_optional() {
        assert!(!DeviceContext::desktop().touch());
        assert!(DeviceContext::desktop_touch().touch());
        assert!(!DeviceContext::new(DeviceClass::Desktop, false).touch());
    }

    #[test]
    fn test_mobile_means_phone_or_tablet() {
        assert!(DeviceContext::phone().is_mobile());
        assert!(DeviceContext::tablet().is_mobile());
        assert!(!DeviceContext::desktop_touch().is_mobile());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(DeviceClass::Desktop.as_str(), "desktop");
        assert_eq!(DeviceContext::phone().class().as_str(), "phone");
    }
}
