//! Option documents and their normalization.
//!
//! Implements the layered option merge:
//! 1. Built-in defaults for the device
//! 2. Integration override options
//! 3. User top-level options
//! 4. The mobile section (phones and tablets only)
//! 5. Forced external plugins
//!
//! `RawOptions` is the input shape: the keys the normalizer branches on are
//! declared fields with semantic types, everything else rides along in an
//! uninterpreted `extra` bag. `NormalizedOptions` is the output shape with
//! plugin fields fully resolved and the mobile section consumed.

use std::collections::BTreeMap;

use crate::merge::deep_merge_maps;
use crate::value::{CallbackValueError, OptionMap, OptionValue};

mod combine;
mod defaults;
mod plugins;
mod sections;

pub use combine::{combine_options, normalize_options};
pub use defaults::{default_mobile_options, default_options};
pub use plugins::{external_plugins, normalize_plugins, process_plugins};
pub use sections::{SectionResult, SECTION_KEYS};

/// How a plugin list is written in an options document.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginSpec {
    /// Space-separated names in one string.
    Names(String),
    /// One name per element.
    List(Vec<String>),
}

impl PluginSpec {
    /// Render back to the loosely typed form it was written in.
    pub fn to_value(&self) -> OptionValue {
        match self {
            PluginSpec::Names(names) => OptionValue::String(names.clone()),
            PluginSpec::List(list) => {
                OptionValue::Array(list.iter().cloned().map(OptionValue::String).collect())
            }
        }
    }
}

impl From<&str> for PluginSpec {
    fn from(names: &str) -> Self {
        PluginSpec::Names(names.to_string())
    }
}

impl From<String> for PluginSpec {
    fn from(names: String) -> Self {
        PluginSpec::Names(names)
    }
}

impl From<Vec<String>> for PluginSpec {
    fn from(list: Vec<String>) -> Self {
        PluginSpec::List(list)
    }
}

impl From<Vec<&str>> for PluginSpec {
    fn from(list: Vec<&str>) -> Self {
        PluginSpec::List(list.into_iter().map(str::to_string).collect())
    }
}

/// Toolbar presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarMode {
    Floating,
    Sliding,
    Scrolling,
    Wrap,
}

impl ToolbarMode {
    /// Returns the mode name used in option documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolbarMode::Floating => "floating",
            ToolbarMode::Sliding => "sliding",
            ToolbarMode::Scrolling => "scrolling",
            ToolbarMode::Wrap => "wrap",
        }
    }

    /// Parse a mode name from an option document.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "floating" => Some(ToolbarMode::Floating),
            "sliding" => Some(ToolbarMode::Sliding),
            "scrolling" => Some(ToolbarMode::Scrolling),
            "wrap" => Some(ToolbarMode::Wrap),
            _ => None,
        }
    }
}

impl Default for ToolbarMode {
    fn default() -> Self {
        ToolbarMode::Floating
    }
}

/// Whether and how the editor chrome may be resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resize {
    /// Vertical only (`true` in documents).
    Vertical,
    /// Both axes (`"both"` in documents).
    Both,
    /// No resizing (`false` in documents).
    Disabled,
}

impl Resize {
    /// Lowercase name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resize::Vertical => "vertical",
            Resize::Both => "both",
            Resize::Disabled => "disabled",
        }
    }

    /// Render back to the document form.
    pub fn to_value(&self) -> OptionValue {
        match self {
            Resize::Vertical => OptionValue::Bool(true),
            Resize::Both => OptionValue::String("both".to_string()),
            Resize::Disabled => OptionValue::Bool(false),
        }
    }
}

/// Menubar visibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Menubar {
    /// Host default menus (`true` in documents).
    Default,
    /// Hidden (`false` in documents).
    Hidden,
    /// Explicit space-separated menu names.
    Menus(String),
}

impl Menubar {
    /// Name or menu list for display.
    pub fn as_str(&self) -> &str {
        match self {
            Menubar::Default => "default",
            Menubar::Hidden => "hidden",
            Menubar::Menus(menus) => menus,
        }
    }

    /// Render back to the document form.
    pub fn to_value(&self) -> OptionValue {
        match self {
            Menubar::Default => OptionValue::Bool(true),
            Menubar::Hidden => OptionValue::Bool(false),
            Menubar::Menus(menus) => OptionValue::String(menus.clone()),
        }
    }
}

/// Option names the normalizer understands structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKey {
    Plugins,
    ForcedPlugins,
    ExternalPlugins,
    Mobile,
    ToolbarMode,
    ToolbarSticky,
    TableGrid,
    Resize,
    Menubar,
}

impl DeclaredKey {
    /// Every declared option name.
    pub const ALL: &'static [DeclaredKey] = &[
        DeclaredKey::Plugins,
        DeclaredKey::ForcedPlugins,
        DeclaredKey::ExternalPlugins,
        DeclaredKey::Mobile,
        DeclaredKey::ToolbarMode,
        DeclaredKey::ToolbarSticky,
        DeclaredKey::TableGrid,
        DeclaredKey::Resize,
        DeclaredKey::Menubar,
    ];

    /// Returns the option name for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredKey::Plugins => "plugins",
            DeclaredKey::ForcedPlugins => "forced_plugins",
            DeclaredKey::ExternalPlugins => "external_plugins",
            DeclaredKey::Mobile => "mobile",
            DeclaredKey::ToolbarMode => "toolbar_mode",
            DeclaredKey::ToolbarSticky => "toolbar_sticky",
            DeclaredKey::TableGrid => "table_grid",
            DeclaredKey::Resize => "resize",
            DeclaredKey::Menubar => "menubar",
        }
    }

    /// Look up the key for an option name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "plugins" => Some(DeclaredKey::Plugins),
            "forced_plugins" => Some(DeclaredKey::ForcedPlugins),
            "external_plugins" => Some(DeclaredKey::ExternalPlugins),
            "mobile" => Some(DeclaredKey::Mobile),
            "toolbar_mode" => Some(DeclaredKey::ToolbarMode),
            "toolbar_sticky" => Some(DeclaredKey::ToolbarSticky),
            "table_grid" => Some(DeclaredKey::TableGrid),
            "resize" => Some(DeclaredKey::Resize),
            "menubar" => Some(DeclaredKey::Menubar),
            _ => None,
        }
    }
}

/// A loosely typed options document, as handed over by the embedding host.
///
/// Declared fields hold the keys the normalizer interprets; `extra` carries
/// everything else through untouched. `extra` never holds a declared name:
/// `insert` routes declared names into their fields and drops values whose
/// shape does not fit, rather than erroring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions {
    /// Plugins to load.
    pub plugins: Option<PluginSpec>,
    /// Plugins the integration always loads first.
    pub forced_plugins: Option<PluginSpec>,
    /// Plugin name to script URL, loaded from outside the bundle.
    pub external_plugins: Option<BTreeMap<String, String>>,
    /// Overrides applied only on phones and tablets.
    pub mobile: Option<Box<RawOptions>>,
    /// Toolbar presentation mode.
    pub toolbar_mode: Option<ToolbarMode>,
    /// Keep the toolbar pinned while scrolling.
    pub toolbar_sticky: Option<bool>,
    /// Show the table size picker grid.
    pub table_grid: Option<bool>,
    /// Editor chrome resizing.
    pub resize: Option<Resize>,
    /// Menubar visibility.
    pub menubar: Option<Menubar>,
    /// Everything the normalizer does not interpret.
    pub extra: OptionMap,
}

impl RawOptions {
    /// Build from a parsed JSON document. A non-object document yields
    /// empty options.
    pub fn from_json(doc: serde_json::Value) -> RawOptions {
        match OptionValue::from(doc) {
            OptionValue::Object(map) => RawOptions::from_map(map),
            other => {
                tracing::warn!(kind = other.kind(), "options document is not an object");
                RawOptions::default()
            }
        }
    }

    /// Build from a parsed TOML document. A non-table document yields
    /// empty options.
    pub fn from_toml(doc: toml::Value) -> RawOptions {
        match OptionValue::from_toml(doc) {
            OptionValue::Object(map) => RawOptions::from_map(map),
            other => {
                tracing::warn!(kind = other.kind(), "options document is not a table");
                RawOptions::default()
            }
        }
    }

    /// Build from a loose option map.
    pub fn from_map(map: OptionMap) -> RawOptions {
        let mut options = RawOptions::default();
        for (name, value) in map {
            options.insert(&name, value);
        }
        options
    }

    /// Set an option by name. Declared names get their typed shape; a
    /// value of the wrong shape is dropped with a warning, leaving the
    /// field unset. Unknown names go to `extra`.
    pub fn insert(&mut self, name: &str, value: OptionValue) {
        match DeclaredKey::from_name(name) {
            Some(key) => self.set_declared(key, value),
            None => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }

    fn set_declared(&mut self, key: DeclaredKey, value: OptionValue) {
        match key {
            DeclaredKey::Plugins => self.plugins = plugin_spec_value(key, value),
            DeclaredKey::ForcedPlugins => self.forced_plugins = plugin_spec_value(key, value),
            DeclaredKey::ExternalPlugins => {
                self.external_plugins = external_plugins_value(key, value)
            }
            DeclaredKey::Mobile => self.mobile = mobile_value(key, value),
            DeclaredKey::ToolbarMode => self.toolbar_mode = toolbar_mode_value(key, value),
            DeclaredKey::ToolbarSticky => self.toolbar_sticky = bool_value(key, value),
            DeclaredKey::TableGrid => self.table_grid = bool_value(key, value),
            DeclaredKey::Resize => self.resize = resize_value(key, value),
            DeclaredKey::Menubar => self.menubar = menubar_value(key, value),
        }
    }

    /// Overlay `over` on top, key by key. `over` wins where both set a
    /// field; extras extend.
    pub fn overlay(mut self, over: RawOptions) -> RawOptions {
        self.plugins = over.plugins.or(self.plugins);
        self.forced_plugins = over.forced_plugins.or(self.forced_plugins);
        self.external_plugins = over.external_plugins.or(self.external_plugins);
        self.mobile = over.mobile.or(self.mobile);
        self.toolbar_mode = over.toolbar_mode.or(self.toolbar_mode);
        self.toolbar_sticky = over.toolbar_sticky.or(self.toolbar_sticky);
        self.table_grid = over.table_grid.or(self.table_grid);
        self.resize = over.resize.or(self.resize);
        self.menubar = over.menubar.or(self.menubar);
        self.extra.extend(over.extra);
        self
    }

    /// Overlay with recursive semantics: the mobile section, external
    /// plugin table, and extras merge depth-wise instead of being replaced
    /// wholesale. `over` still wins wherever both sides set a value.
    pub fn deep_overlay(mut self, over: RawOptions) -> RawOptions {
        self.mobile = match (self.mobile, over.mobile) {
            (Some(base), Some(section)) => Some(Box::new(base.deep_overlay(*section))),
            (base, section) => section.or(base),
        };
        self.external_plugins = match (self.external_plugins, over.external_plugins) {
            (Some(mut base), Some(table)) => {
                base.extend(table);
                Some(base)
            }
            (base, table) => table.or(base),
        };
        self.extra = deep_merge_maps(self.extra, over.extra);

        self.plugins = over.plugins.or(self.plugins);
        self.forced_plugins = over.forced_plugins.or(self.forced_plugins);
        self.toolbar_mode = over.toolbar_mode.or(self.toolbar_mode);
        self.toolbar_sticky = over.toolbar_sticky.or(self.toolbar_sticky);
        self.table_grid = over.table_grid.or(self.table_grid);
        self.resize = over.resize.or(self.resize);
        self.menubar = over.menubar.or(self.menubar);
        self
    }

    /// Reassemble into a single loose map.
    pub fn to_map(&self) -> OptionMap {
        let mut map = self.extra.clone();
        if let Some(plugins) = &self.plugins {
            map.insert("plugins".to_string(), plugins.to_value());
        }
        if let Some(forced) = &self.forced_plugins {
            map.insert("forced_plugins".to_string(), forced.to_value());
        }
        if let Some(external) = &self.external_plugins {
            map.insert("external_plugins".to_string(), external_plugins_to_value(external));
        }
        if let Some(mobile) = &self.mobile {
            map.insert("mobile".to_string(), OptionValue::Object(mobile.to_map()));
        }
        if let Some(mode) = self.toolbar_mode {
            map.insert(
                "toolbar_mode".to_string(),
                OptionValue::String(mode.as_str().to_string()),
            );
        }
        if let Some(sticky) = self.toolbar_sticky {
            map.insert("toolbar_sticky".to_string(), OptionValue::Bool(sticky));
        }
        if let Some(grid) = self.table_grid {
            map.insert("table_grid".to_string(), OptionValue::Bool(grid));
        }
        if let Some(resize) = self.resize {
            map.insert("resize".to_string(), resize.to_value());
        }
        if let Some(menubar) = &self.menubar {
            map.insert("menubar".to_string(), menubar.to_value());
        }
        map
    }

    /// Render as JSON. Fails only when `extra` holds a callback.
    pub fn to_json(&self) -> Result<serde_json::Value, CallbackValueError> {
        OptionValue::Object(self.to_map()).to_json()
    }

    /// Set the plugin list.
    pub fn with_plugins(mut self, plugins: impl Into<PluginSpec>) -> Self {
        self.plugins = Some(plugins.into());
        self
    }

    /// Set the forced plugin list.
    pub fn with_forced_plugins(mut self, plugins: impl Into<PluginSpec>) -> Self {
        self.forced_plugins = Some(plugins.into());
        self
    }

    /// Set the mobile section.
    pub fn with_mobile(mut self, mobile: RawOptions) -> Self {
        self.mobile = Some(Box::new(mobile));
        self
    }

    /// Set the toolbar mode.
    pub fn with_toolbar_mode(mut self, mode: ToolbarMode) -> Self {
        self.toolbar_mode = Some(mode);
        self
    }

    /// Set any option by name, with the same routing as `insert`.
    pub fn with_option(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value.into());
        self
    }
}

fn drop_mismatch(key: DeclaredKey, value: &OptionValue) {
    tracing::warn!(
        option = key.as_str(),
        kind = value.kind(),
        "dropping option with unusable shape"
    );
}

fn plugin_spec_value(key: DeclaredKey, value: OptionValue) -> Option<PluginSpec> {
    match value {
        OptionValue::String(names) => Some(PluginSpec::Names(names)),
        OptionValue::Array(items) => {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    OptionValue::String(name) => names.push(name),
                    other => tracing::warn!(
                        option = key.as_str(),
                        kind = other.kind(),
                        "dropping non-string plugin name"
                    ),
                }
            }
            Some(PluginSpec::List(names))
        }
        other => {
            drop_mismatch(key, &other);
            None
        }
    }
}

fn external_plugins_value(key: DeclaredKey, value: OptionValue) -> Option<BTreeMap<String, String>> {
    match value {
        OptionValue::Object(map) => {
            let mut table = BTreeMap::new();
            for (name, url) in map {
                match url {
                    OptionValue::String(url) => {
                        table.insert(name, url);
                    }
                    other => tracing::warn!(
                        option = key.as_str(),
                        plugin = name.as_str(),
                        kind = other.kind(),
                        "dropping non-string plugin URL"
                    ),
                }
            }
            Some(table)
        }
        other => {
            drop_mismatch(key, &other);
            None
        }
    }
}

fn external_plugins_to_value(table: &BTreeMap<String, String>) -> OptionValue {
    OptionValue::Object(
        table
            .iter()
            .map(|(name, url)| (name.clone(), OptionValue::String(url.clone())))
            .collect(),
    )
}

fn mobile_value(key: DeclaredKey, value: OptionValue) -> Option<Box<RawOptions>> {
    match value {
        OptionValue::Object(map) => Some(Box::new(RawOptions::from_map(map))),
        other => {
            drop_mismatch(key, &other);
            None
        }
    }
}

fn toolbar_mode_value(key: DeclaredKey, value: OptionValue) -> Option<ToolbarMode> {
    match &value {
        OptionValue::String(name) => match ToolbarMode::from_name(name) {
            Some(mode) => Some(mode),
            None => {
                tracing::warn!(
                    option = key.as_str(),
                    mode = name.as_str(),
                    "dropping unknown toolbar mode"
                );
                None
            }
        },
        _ => {
            drop_mismatch(key, &value);
            None
        }
    }
}

fn bool_value(key: DeclaredKey, value: OptionValue) -> Option<bool> {
    match value {
        OptionValue::Bool(flag) => Some(flag),
        other => {
            drop_mismatch(key, &other);
            None
        }
    }
}

fn resize_value(key: DeclaredKey, value: OptionValue) -> Option<Resize> {
    match &value {
        OptionValue::Bool(true) => Some(Resize::Vertical),
        OptionValue::Bool(false) => Some(Resize::Disabled),
        OptionValue::String(name) if name == "both" => Some(Resize::Both),
        _ => {
            drop_mismatch(key, &value);
            None
        }
    }
}

fn menubar_value(key: DeclaredKey, value: OptionValue) -> Option<Menubar> {
    match value {
        OptionValue::Bool(true) => Some(Menubar::Default),
        OptionValue::Bool(false) => Some(Menubar::Hidden),
        OptionValue::String(menus) => Some(Menubar::Menus(menus)),
        other => {
            drop_mismatch(key, &other);
            None
        }
    }
}

/// The outcome of normalization.
///
/// `plugins` is always a single space-joined string with forced plugins
/// first, `forced_plugins` the normalized forced list, and
/// `external_plugins` the merged URL table. The mobile section has been
/// consumed; `toolbar_mode` is always resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedOptions {
    /// Space-joined plugin names, forced plugins first.
    pub plugins: String,
    /// Normalized forced plugin names.
    pub forced_plugins: Vec<String>,
    /// Plugin name to script URL.
    pub external_plugins: BTreeMap<String, String>,
    /// Resolved toolbar mode.
    pub toolbar_mode: ToolbarMode,
    /// Keep the toolbar pinned while scrolling.
    pub toolbar_sticky: Option<bool>,
    /// Show the table size picker grid.
    pub table_grid: Option<bool>,
    /// Editor chrome resizing.
    pub resize: Option<Resize>,
    /// Menubar visibility.
    pub menubar: Option<Menubar>,
    /// Pass-through options.
    pub extra: OptionMap,
}

impl NormalizedOptions {
    /// Look up any option by name, declared or pass-through.
    pub fn value_of(&self, name: &str) -> Option<OptionValue> {
        match name {
            "plugins" => Some(OptionValue::String(self.plugins.clone())),
            "forced_plugins" => Some(OptionValue::Array(
                self.forced_plugins
                    .iter()
                    .cloned()
                    .map(OptionValue::String)
                    .collect(),
            )),
            "external_plugins" => Some(external_plugins_to_value(&self.external_plugins)),
            "toolbar_mode" => Some(OptionValue::String(self.toolbar_mode.as_str().to_string())),
            "toolbar_sticky" => self.toolbar_sticky.map(OptionValue::Bool),
            "table_grid" => self.table_grid.map(OptionValue::Bool),
            "resize" => self.resize.map(|resize| resize.to_value()),
            "menubar" => self.menubar.as_ref().map(Menubar::to_value),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Reassemble into a single loose map.
    pub fn to_map(&self) -> OptionMap {
        let mut map = self.extra.clone();
        for key in DeclaredKey::ALL {
            if let Some(value) = self.value_of(key.as_str()) {
                map.insert(key.as_str().to_string(), value);
            }
        }
        map
    }

    /// Render as JSON. Fails only when `extra` holds a callback.
    pub fn to_json(&self) -> Result<serde_json::Value, CallbackValueError> {
        OptionValue::Object(self.to_map()).to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Callback;
    use serde_json::json;

    #[test]
    fn test_insert_routes_declared_and_extra() {
        let options = RawOptions::from_json(json!({
            "plugins": "lists link",
            "toolbar_sticky": true,
            "height": 500,
            "menubar": "file edit"
        }));

        assert_eq!(options.plugins, Some(PluginSpec::Names("lists link".to_string())));
        assert_eq!(options.toolbar_sticky, Some(true));
        assert_eq!(options.menubar, Some(Menubar::Menus("file edit".to_string())));
        assert_eq!(options.extra.get("height").and_then(OptionValue::as_i64), Some(500));
        assert!(!options.extra.contains_key("plugins"));
    }

    #[test]
    fn test_insert_drops_mismatched_shapes() {
        let options = RawOptions::from_json(json!({
            "plugins": 5,
            "toolbar_mode": "hovering",
            "toolbar_sticky": "yes",
            "mobile": []
        }));

        assert_eq!(options.plugins, None);
        assert_eq!(options.toolbar_mode, None);
        assert_eq!(options.toolbar_sticky, None);
        assert_eq!(options.mobile, None);
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_plugin_list_drops_non_strings() {
        let options = RawOptions::from_json(json!({
            "plugins": ["lists", 7, "link"]
        }));

        assert_eq!(
            options.plugins,
            Some(PluginSpec::List(vec!["lists".to_string(), "link".to_string()]))
        );
    }

    #[test]
    fn test_external_plugins_drop_non_string_urls() {
        let options = RawOptions::from_json(json!({
            "external_plugins": { "kanban": "/js/kanban.js", "broken": 1 }
        }));

        let table = options.external_plugins.unwrap();
        assert_eq!(table.get("kanban").map(String::as_str), Some("/js/kanban.js"));
        assert!(!table.contains_key("broken"));
    }

    #[test]
    fn test_mobile_section_parses_recursively() {
        let options = RawOptions::from_json(json!({
            "mobile": {
                "plugins": ["lists"],
                "theme": "silver"
            }
        }));

        let mobile = options.mobile.unwrap();
        assert_eq!(mobile.plugins, Some(PluginSpec::List(vec!["lists".to_string()])));
        assert_eq!(mobile.extra.get("theme").and_then(OptionValue::as_str), Some("silver"));
    }

    #[test]
    fn test_resize_shapes() {
        let options = RawOptions::from_json(json!({"resize": true}));
        assert_eq!(options.resize, Some(Resize::Vertical));

        let options = RawOptions::from_json(json!({"resize": "both"}));
        assert_eq!(options.resize, Some(Resize::Both));

        let options = RawOptions::from_json(json!({"resize": false}));
        assert_eq!(options.resize, Some(Resize::Disabled));

        let options = RawOptions::from_json(json!({"resize": "sideways"}));
        assert_eq!(options.resize, None);
    }

    #[test]
    fn test_overlay_later_wins() {
        let base = RawOptions::default()
            .with_plugins("lists")
            .with_toolbar_mode(ToolbarMode::Wrap)
            .with_option("height", 300);
        let over = RawOptions::default()
            .with_plugins("media")
            .with_option("height", 500)
            .with_option("width", 800);

        let merged = base.overlay(over);
        assert_eq!(merged.plugins, Some(PluginSpec::Names("media".to_string())));
        assert_eq!(merged.toolbar_mode, Some(ToolbarMode::Wrap));
        assert_eq!(merged.extra.get("height").and_then(OptionValue::as_i64), Some(500));
        assert_eq!(merged.extra.get("width").and_then(OptionValue::as_i64), Some(800));
    }

    #[test]
    fn test_overlay_replaces_mobile_wholesale() {
        let base = RawOptions::default()
            .with_mobile(RawOptions::default().with_plugins("lists").with_option("theme", "silver"));
        let over = RawOptions::default().with_mobile(RawOptions::default().with_plugins("media"));

        let merged = base.overlay(over);
        let mobile = merged.mobile.unwrap();
        assert_eq!(mobile.plugins, Some(PluginSpec::Names("media".to_string())));
        assert!(mobile.extra.get("theme").is_none());
    }

    #[test]
    fn test_deep_overlay_recurses_into_mobile() {
        let base = RawOptions::default()
            .with_mobile(RawOptions::default().with_plugins("lists").with_option("theme", "silver"));
        let over = RawOptions::default().with_mobile(RawOptions::default().with_plugins("media"));

        let merged = base.deep_overlay(over);
        let mobile = merged.mobile.unwrap();
        assert_eq!(mobile.plugins, Some(PluginSpec::Names("media".to_string())));
        assert_eq!(mobile.extra.get("theme").and_then(OptionValue::as_str), Some("silver"));
    }

    #[test]
    fn test_deep_overlay_merges_external_plugins() {
        let mut base = RawOptions::default();
        base.external_plugins = Some(BTreeMap::from([
            ("kanban".to_string(), "/js/old.js".to_string()),
            ("gantt".to_string(), "/js/gantt.js".to_string()),
        ]));
        let mut over = RawOptions::default();
        over.external_plugins = Some(BTreeMap::from([(
            "kanban".to_string(),
            "/js/new.js".to_string(),
        )]));

        let merged = base.deep_overlay(over);
        let table = merged.external_plugins.unwrap();
        assert_eq!(table.get("kanban").map(String::as_str), Some("/js/new.js"));
        assert_eq!(table.get("gantt").map(String::as_str), Some("/js/gantt.js"));
    }

    #[test]
    fn test_to_json_round_trip() {
        let doc = json!({
            "plugins": ["lists", "link"],
            "toolbar_mode": "sliding",
            "resize": "both",
            "menubar": false,
            "external_plugins": { "kanban": "/js/kanban.js" },
            "mobile": { "plugins": "lists" },
            "height": 500
        });

        let options = RawOptions::from_json(doc.clone());
        assert_eq!(options.to_json().unwrap(), doc);
    }

    #[test]
    fn test_declared_key_names_round_trip() {
        for key in DeclaredKey::ALL {
            assert_eq!(DeclaredKey::from_name(key.as_str()), Some(*key));
        }
        assert_eq!(DeclaredKey::from_name("height"), None);
    }

    #[test]
    fn test_normalized_value_of() {
        let normalized = NormalizedOptions {
            plugins: "a b".to_string(),
            forced_plugins: vec!["a".to_string()],
            toolbar_mode: ToolbarMode::Scrolling,
            menubar: Some(Menubar::Hidden),
            extra: OptionMap::from([(
                "setup".to_string(),
                OptionValue::Callback(Callback::new(())),
            )]),
            ..NormalizedOptions::default()
        };

        assert_eq!(normalized.value_of("plugins"), Some(OptionValue::from("a b")));
        assert_eq!(
            normalized.value_of("toolbar_mode"),
            Some(OptionValue::from("scrolling"))
        );
        assert_eq!(normalized.value_of("menubar"), Some(OptionValue::Bool(false)));
        assert_eq!(normalized.value_of("toolbar_sticky"), None);
        assert!(normalized.value_of("setup").is_some());
        assert_eq!(normalized.value_of("missing"), None);
    }

    #[test]
    fn test_normalized_to_json_refuses_callbacks() {
        let normalized = NormalizedOptions {
            extra: OptionMap::from([(
                "setup".to_string(),
                OptionValue::Callback(Callback::new(())),
            )]),
            ..NormalizedOptions::default()
        };

        assert!(normalized.to_json().is_err());
    }
}
