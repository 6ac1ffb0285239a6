//! Per-module settings added by this plugin.

use related_items_sdk::query::ModuleSettings;
use serde::{Deserialize, Serialize};

/// Setting key of the placement select.
pub const PLACEMENT_KEY: &str = "related_items_placement";

/// Setting key of the relation field key text control.
pub const FIELD_KEY: &str = "related_items_field";

/// Where related items go relative to the module's own results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
    /// Feature off. Unknown stored values read as this.
    #[default]
    #[serde(other)]
    None,
}

impl Placement {
    /// All placements in select-option order.
    pub const ALL: [Placement; 3] = [Placement::None, Placement::Before, Placement::After];

    /// Stored setting value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::None => "none",
            Placement::Before => "before",
            Placement::After => "after",
        }
    }

    /// Select option label.
    pub fn label(&self) -> &'static str {
        match self {
            Placement::None => "None",
            Placement::Before => "Before",
            Placement::After => "After",
        }
    }
}

/// The plugin's settings on one module instance, when the feature is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedSettings {
    /// `Before` or `After`; never `None`.
    pub placement: Placement,
    /// Relation field key, trimmed and non-empty.
    pub field_key: String,
}

impl RelatedSettings {
    /// Read the plugin's settings off a module.
    ///
    /// Returns `None` when placement is absent or `none`, or the field key
    /// is absent or blank.
    pub fn from_module(settings: &ModuleSettings) -> Option<Self> {
        let placement = settings.get::<Placement>(PLACEMENT_KEY)?;
        if placement == Placement::None {
            return None;
        }

        let field_key = settings.get_str(FIELD_KEY)?.trim();
        if field_key.is_empty() {
            return None;
        }

        Some(Self {
            placement,
            field_key: field_key.to_string(),
        })
    }

    /// Whether related items go after the module's own results.
    pub fn appends(&self) -> bool {
        self.placement == Placement::After
    }
}
