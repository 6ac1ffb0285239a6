//! Loop query arguments for listing modules.
//!
//! Before a listing module renders, the kernel resolves its settings into a
//! loop query and passes the arguments through `tap_loop_query_alter`.
//! Keys that plugins commonly touch are typed; everything else rides along
//! in `extra` and is serialized back unchanged.
//!
//! Parsing never rejects a query a plugin leaves alone. Enum keys fall back
//! to an `Other` variant holding the raw value, and `nopaging`/`per_page`
//! stay raw JSON read through [`LoopQueryArgs::is_unpaged`] and
//! [`LoopQueryArgs::page_size`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::types::ItemId;

/// Arguments of a listing module's loop query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopQueryArgs {
    /// Resolved settings of the module that issued the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ModuleSettings>,

    /// Result mode: full records or IDs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ResultFields>,

    /// Return every match, ignoring `per_page`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nopaging: Option<Value>,

    /// Restrict results to these items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_in: Option<Vec<ItemId>>,

    /// Exclude these items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_not_in: Option<Vec<ItemId>>,

    /// Exclude items by these authors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_not_in: Option<Vec<Uuid>>,

    /// Category filter, passed through to the query engine as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_query: Option<Value>,

    /// Content type filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemTypeFilter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<OrderBy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,

    /// Page size (-1 = unlimited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<Value>,

    /// Any other query keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoopQueryArgs {
    /// Whether `nopaging` is set, in any of the spellings the kernel accepts.
    pub fn is_unpaged(&self) -> bool {
        match &self.nopaging {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
            _ => false,
        }
    }

    /// `per_page` as a number; numeric strings count.
    pub fn page_size(&self) -> Option<i64> {
        match self.per_page.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Settings of a listing module instance, as stored by the page builder.
///
/// Settings are free-form: each plugin that adds controls to a module's
/// form reads its own keys back out with [`ModuleSettings::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleSettings {
    pub values: Map<String, Value>,
}

impl ModuleSettings {
    /// Get a setting as a specific type.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Option<T> {
        self.values
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a string setting.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Set a setting value.
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.values.insert(name.to_string(), v);
        }
    }

    /// Builder form of [`ModuleSettings::set`].
    pub fn with<T: Serialize>(mut self, name: &str, value: T) -> Self {
        self.set(name, value);
        self
    }
}

/// What the query engine returns for each match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFields {
    /// Full item records.
    All,
    /// Item IDs only.
    Ids,
    #[serde(untagged)]
    Other(Value),
}

/// Content type restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemTypeFilter {
    One(String),
    Many(Vec<String>),
    /// Anything else the host sent; matches nothing.
    Other(Value),
}

impl ItemTypeFilter {
    /// Wildcard accepted by the query engine for "every content type".
    pub const ANY: &'static str = "any";

    /// Filter that matches every content type.
    pub fn any() -> Self {
        ItemTypeFilter::One(Self::ANY.to_string())
    }

    /// Check whether this filter is the wildcard.
    pub fn is_any(&self) -> bool {
        matches!(self, ItemTypeFilter::One(t) if t == Self::ANY)
    }

    /// Check whether an item of the given type passes this filter.
    pub fn matches(&self, item_type: &str) -> bool {
        match self {
            ItemTypeFilter::One(t) => t == Self::ANY || t == item_type,
            ItemTypeFilter::Many(types) => types.iter().any(|t| t == Self::ANY || t == item_type),
            ItemTypeFilter::Other(_) => false,
        }
    }
}

/// Ordering key for a loop query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Date,
    Modified,
    Title,
    /// Follow the order of `item_in` exactly.
    ItemIn,
    /// Any ordering the kernel knows that plugins don't need to inspect,
    /// including keyed objects such as `{"date": "DESC"}`.
    #[serde(untagged)]
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
    /// Other spellings, kept verbatim.
    #[serde(untagged)]
    Other(Value),
}

impl SortOrder {
    /// Ascending, case-insensitively. Everything else sorts descending.
    pub fn is_ascending(&self) -> bool {
        match self {
            SortOrder::Asc => true,
            SortOrder::Desc => false,
            SortOrder::Other(v) => v.as_str().is_some_and(|s| s.trim().eq_ignore_ascii_case("asc")),
        }
    }
}
