//! Listing module settings form types.
//!
//! The page builder describes a module's settings form as an ordered list
//! of tabs, each holding sections of fields. Tab order is significant: the
//! editor renders tabs in list order, so plugins that add a tab choose its
//! position explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input for `tap_module_settings_form_alter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleFormInput {
    /// Module type machine name (e.g., "post-grid").
    pub module_type: String,
    /// The form assembled so far.
    pub form: SettingsForm,
}

/// A module settings form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsForm {
    /// Tabs in display order.
    #[serde(default)]
    pub tabs: Vec<SettingsTab>,
}

impl SettingsForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab.
    pub fn tab(mut self, tab: SettingsTab) -> Self {
        self.tabs.push(tab);
        self
    }

    /// Position of a tab in display order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.key == key)
    }

    /// Check whether the form has a tab with the given key.
    pub fn has_tab(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Get a tab by key.
    pub fn get_tab(&self, key: &str) -> Option<&SettingsTab> {
        self.tabs.iter().find(|t| t.key == key)
    }

    /// Tab keys in display order.
    pub fn tab_keys(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.key.as_str()).collect()
    }
}

/// A tab in a settings form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsTab {
    /// Machine name, unique within the form.
    pub key: String,

    /// Tab label.
    pub title: String,

    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<SettingsSection>,
}

impl SettingsTab {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section.
    pub fn section(mut self, section: SettingsSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Find a field anywhere in this tab.
    pub fn find_field(&self, key: &str) -> Option<&SettingsField> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.key == key)
    }
}

/// A titled group of fields within a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsSection {
    pub key: String,

    /// Section heading; empty for an untitled section.
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub fields: Vec<SettingsField>,
}

impl SettingsSection {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn field(mut self, field: SettingsField) -> Self {
        self.fields.push(field);
        self
    }
}

/// A single settings control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsField {
    /// Setting name; the value is stored under this key on the module.
    pub key: String,

    /// Control type with type-specific configuration.
    #[serde(flatten)]
    pub control: Control,

    /// Control label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Which other fields/sections are shown for each value of this control.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub toggle: BTreeMap<String, FieldToggle>,
}

impl SettingsField {
    fn new(key: impl Into<String>, control: Control) -> Self {
        Self {
            key: key.into(),
            control,
            label: None,
            description: None,
            default_value: None,
            toggle: BTreeMap::new(),
        }
    }

    /// Create a single-line text control.
    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, Control::Text { max_length: None })
    }

    /// Create a multi-line text control.
    pub fn textarea(key: impl Into<String>, rows: u32) -> Self {
        Self::new(key, Control::Textarea { rows })
    }

    /// Create a select control from `(value, label)` pairs.
    pub fn select(key: impl Into<String>, options: Vec<(String, String)>) -> Self {
        Self::new(key, Control::Select { options })
    }

    /// Create a checkbox control.
    pub fn checkbox(key: impl Into<String>) -> Self {
        Self::new(key, Control::Checkbox)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Show the given fields when this control holds `value`.
    pub fn toggle_fields<I, S>(mut self, value: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toggle.entry(value.into()).or_default().fields =
            fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Control types supported by the settings editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    /// Single-line text input.
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },

    /// Multi-line text input.
    Textarea { rows: u32 },

    /// Dropdown select.
    Select { options: Vec<(String, String)> },

    /// Single checkbox.
    Checkbox,
}

impl Control {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Control::Text { .. } => "text",
            Control::Textarea { .. } => "textarea",
            Control::Select { .. } => "select",
            Control::Checkbox => "checkbox",
        }
    }
}

/// Targets revealed by one value of a toggling control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldToggle {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> SettingsForm {
        SettingsForm::new()
            .tab(SettingsTab::new("general", "General"))
            .tab(
                SettingsTab::new("content", "Content").section(
                    SettingsSection::new("filter")
                        .title("Filter")
                        .field(SettingsField::text("posts_post").label("Posts")),
                ),
            )
    }

    #[test]
    fn position_follows_display_order() {
        let form = sample();
        assert_eq!(form.position("general"), Some(0));
        assert_eq!(form.position("content"), Some(1));
        assert_eq!(form.position("style"), None);
        assert_eq!(form.tab_keys(), vec!["general", "content"]);
    }

    #[test]
    fn find_field_searches_sections() {
        let form = sample();
        let tab = form.get_tab("content").unwrap();
        assert!(tab.find_field("posts_post").is_some());
        assert!(tab.find_field("missing").is_none());
    }

    #[test]
    fn select_serializes_with_type_tag() {
        let field = SettingsField::select(
            "mode",
            vec![("a".to_string(), "A".to_string())],
        )
        .default_value("a")
        .toggle_fields("a", ["other"]);

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["key"], "mode");
        assert_eq!(json["default_value"], "a");
        assert_eq!(json["toggle"]["a"]["fields"][0], "other");
        assert!(json.get("label").is_none());
    }

    #[test]
    fn checkbox_and_textarea_round_trip() {
        let json = serde_json::json!([
            {"key": "show_excerpt", "type": "checkbox", "label": "Show excerpt"},
            {"key": "custom_css", "type": "textarea", "rows": 4}
        ]);
        let fields: Vec<SettingsField> = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(fields[0], SettingsField::checkbox("show_excerpt").label("Show excerpt"));
        assert_eq!(fields[1], SettingsField::textarea("custom_css", 4));
        assert_eq!(fields[0].control.type_name(), "checkbox");
        assert_eq!(fields[1].control.type_name(), "textarea");
        assert_eq!(serde_json::to_value(&fields).unwrap(), json);
    }

    #[test]
    fn form_input_deserializes() {
        let input: ModuleFormInput = serde_json::from_value(serde_json::json!({
            "module_type": "post-grid",
            "form": {
                "tabs": [
                    {"key": "content", "title": "Content", "sections": [
                        {"key": "main", "fields": [{"key": "k", "type": "text"}]}
                    ]}
                ]
            }
        }))
        .unwrap();

        assert_eq!(input.module_type, "post-grid");
        let field = input.form.tabs[0].find_field("k").unwrap();
        assert_eq!(field.control.type_name(), "text");
    }
}
