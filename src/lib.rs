//! Device-aware option normalization for the Vellum editor.
//!
//! Integrations hand over a raw option document plus a [`DeviceContext`]
//! and get back one flat, normalized set: built-in defaults, integration
//! overrides, the user's options, and the mobile section merged in a
//! fixed order with plugin lists resolved per device. Typed read access
//! with shape filtering lives in [`params`].

pub mod device;
pub mod merge;
pub mod options;
pub mod params;
pub mod value;

pub use device::{DeviceClass, DeviceContext};
pub use options::{
    combine_options, normalize_options, Menubar, NormalizedOptions, PluginSpec, RawOptions,
    Resize, SectionResult, ToolbarMode, SECTION_KEYS,
};
pub use value::{Callback, CallbackValueError, OptionMap, OptionValue};
