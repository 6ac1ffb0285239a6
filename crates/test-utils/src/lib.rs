//! Test utilities for listing module plugins.
//!
//! Fixtures and in-memory stand-ins for the kernel services a plugin talks
//! to: a loop query engine over test items, a relation field source, a
//! host-shaped settings form, and a parser for plugin manifests.

use std::cell::RefCell;
use std::collections::HashMap;

use related_items_sdk::prelude::*;
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Deterministic item ID for fixtures (`item_id(10)`, `item_id(20)`, ...).
pub fn item_id(n: u128) -> ItemId {
    Uuid::from_u128(n)
}

/// Deterministic IDs for a list of fixture numbers.
pub fn item_ids(ns: &[u128]) -> Vec<ItemId> {
    ns.iter().copied().map(item_id).collect()
}

/// Install a test-writer tracing subscriber (once per process).
///
/// Honors `RUST_LOG`; defaults to `debug`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Create a test item with default values.
pub fn test_item(item_type: &str, title: &str) -> TestItem {
    TestItem {
        id: Uuid::now_v7(),
        item_type: item_type.to_string(),
        title: title.to_string(),
        author_id: Uuid::nil(),
        status: 1,
        categories: Vec::new(),
        created: 0,
        changed: 0,
    }
}

/// A test item builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestItem {
    pub id: ItemId,
    pub item_type: String,
    pub title: String,
    pub author_id: Uuid,
    pub status: i16,
    pub categories: Vec<Uuid>,
    pub created: i64,
    pub changed: i64,
}

impl TestItem {
    /// Set a custom ID.
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author_id: Uuid) -> Self {
        self.author_id = author_id;
        self
    }

    /// Set as unpublished.
    pub fn unpublished(mut self) -> Self {
        self.status = 0;
        self
    }

    /// Tag with a category term.
    pub fn with_category(mut self, term: Uuid) -> Self {
        self.categories.push(term);
        self
    }

    /// Set the creation timestamp (also used as last change).
    pub fn created_at(mut self, timestamp: i64) -> Self {
        self.created = timestamp;
        self.changed = timestamp;
        self
    }

    /// Set the last change timestamp.
    pub fn changed_at(mut self, timestamp: i64) -> Self {
        self.changed = timestamp;
        self
    }
}

/// In-memory loop query engine.
///
/// Understands the keys listing plugins rewrite: `item_type`, `item_in`,
/// `item_not_in`, `author_not_in`, `tax_query` (a list of category IDs;
/// an item matches if it carries any of them), `orderby` (`date`,
/// `modified`, `title`, `item_in`), `order`, `per_page` and `nopaging`.
/// Only published items match. Every executed query is recorded.
#[derive(Debug, Default)]
pub struct InMemoryContent {
    items: Vec<TestItem>,
    executed: RefCell<Vec<LoopQueryArgs>>,
}

impl InMemoryContent {
    pub fn new(items: Vec<TestItem>) -> Self {
        Self {
            items,
            executed: RefCell::new(Vec::new()),
        }
    }

    /// Queries executed so far, oldest first.
    pub fn executed(&self) -> Vec<LoopQueryArgs> {
        self.executed.borrow().clone()
    }

    fn matches(item: &TestItem, args: &LoopQueryArgs) -> bool {
        if item.status != 1 {
            return false;
        }
        if let Some(filter) = &args.item_type
            && !filter.matches(&item.item_type)
        {
            return false;
        }
        if let Some(ids) = &args.item_in
            && !ids.is_empty()
            && !ids.contains(&item.id)
        {
            return false;
        }
        if let Some(ids) = &args.item_not_in
            && ids.contains(&item.id)
        {
            return false;
        }
        if let Some(authors) = &args.author_not_in
            && authors.contains(&item.author_id)
        {
            return false;
        }
        if let Some(tax) = &args.tax_query {
            let terms = ids_from_value(tax);
            if !terms.is_empty() && !item.categories.iter().any(|c| terms.contains(c)) {
                return false;
            }
        }
        true
    }
}

impl ContentQuery for InMemoryContent {
    fn query_ids(&self, args: &LoopQueryArgs) -> Result<Vec<ItemId>, HostError> {
        self.executed.borrow_mut().push(args.clone());

        let mut found: Vec<&TestItem> = self
            .items
            .iter()
            .filter(|item| Self::matches(item, args))
            .collect();

        match (&args.orderby, &args.item_in) {
            (Some(OrderBy::ItemIn), Some(order)) => {
                found.sort_by_key(|item| order.iter().position(|id| *id == item.id));
            }
            (orderby, _) => {
                match orderby {
                    Some(OrderBy::Title) => found.sort_by(|a, b| a.title.cmp(&b.title)),
                    Some(OrderBy::Modified) => found.sort_by_key(|item| item.changed),
                    _ => found.sort_by_key(|item| item.created),
                }
                if !args.order.as_ref().is_some_and(SortOrder::is_ascending) {
                    found.reverse();
                }
            }
        }

        if !args.is_unpaged()
            && let Some(per_page) = args.page_size()
            && let Ok(limit) = usize::try_from(per_page)
        {
            found.truncate(limit);
        }

        Ok(found.into_iter().map(|item| item.id).collect())
    }
}

/// Query engine that always returns the same IDs, recording what it was asked.
#[derive(Debug, Default)]
pub struct CannedQuery {
    ids: Vec<ItemId>,
    executed: RefCell<Vec<LoopQueryArgs>>,
}

impl CannedQuery {
    pub fn new(ids: Vec<ItemId>) -> Self {
        Self {
            ids,
            executed: RefCell::new(Vec::new()),
        }
    }

    /// Queries executed so far, oldest first.
    pub fn executed(&self) -> Vec<LoopQueryArgs> {
        self.executed.borrow().clone()
    }
}

impl ContentQuery for CannedQuery {
    fn query_ids(&self, args: &LoopQueryArgs) -> Result<Vec<ItemId>, HostError> {
        self.executed.borrow_mut().push(args.clone());
        Ok(self.ids.clone())
    }
}

/// Relation field source backed by stored field values of the current item.
#[derive(Debug, Default)]
pub struct StaticRelations {
    fields: HashMap<String, JsonValue>,
    lookups: RefCell<Vec<(String, FieldFormat)>>,
}

impl StaticRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a relation field referencing `ids`.
    pub fn with_ids(self, field_key: &str, ids: &[ItemId]) -> Self {
        let value = JsonValue::Array(
            ids.iter()
                .map(|id| JsonValue::String(id.to_string()))
                .collect(),
        );
        self.with_value(field_key, value)
    }

    /// Store a raw field value as the kernel would return it.
    pub fn with_value(mut self, field_key: &str, value: JsonValue) -> Self {
        self.fields.insert(field_key.to_string(), value);
        self
    }

    /// Field lookups made so far, oldest first.
    pub fn lookups(&self) -> Vec<(String, FieldFormat)> {
        self.lookups.borrow().clone()
    }
}

impl RelationSource for StaticRelations {
    fn related_ids(&self, field_key: &str, format: FieldFormat) -> Result<Vec<ItemId>, HostError> {
        self.lookups
            .borrow_mut()
            .push((field_key.to_string(), format));
        Ok(self
            .fields
            .get(field_key)
            .map(ids_from_value)
            .unwrap_or_default())
    }
}

/// Kernel services that fail every call with the given error.
#[derive(Debug, Clone)]
pub struct Unavailable(pub HostError);

impl RelationSource for Unavailable {
    fn related_ids(&self, _field_key: &str, _format: FieldFormat) -> Result<Vec<ItemId>, HostError> {
        Err(self.0.clone())
    }
}

impl ContentQuery for Unavailable {
    fn query_ids(&self, _args: &LoopQueryArgs) -> Result<Vec<ItemId>, HostError> {
        Err(self.0.clone())
    }
}

/// Settings form fixtures shaped like the page builder's listing modules.
pub mod forms {
    use related_items_sdk::form::{SettingsField, SettingsForm, SettingsSection, SettingsTab};

    fn pair(value: &str, label: &str) -> (String, String) {
        (value.to_string(), label.to_string())
    }

    /// Settings form of a post grid: general, content, layout, style, pagination.
    pub fn listing_settings_form() -> SettingsForm {
        SettingsForm::new()
            .tab(
                SettingsTab::new("general", "General").section(
                    SettingsSection::new("general").field(
                        SettingsField::select(
                            "layout",
                            vec![pair("grid", "Grid"), pair("columns", "Columns")],
                        )
                        .label("Layout")
                        .default_value("grid"),
                    ),
                ),
            )
            .tab(
                SettingsTab::new("content", "Content").section(
                    SettingsSection::new("filter")
                        .title("Filter")
                        .field(SettingsField::text("posts_post").label("Posts"))
                        .field(SettingsField::text("posts_page").label("Pages")),
                ),
            )
            .tab(
                SettingsTab::new("layout", "Layout").section(
                    SettingsSection::new("columns")
                        .field(SettingsField::text("columns").label("Columns")),
                ),
            )
            .tab(
                SettingsTab::new("style", "Style").section(
                    SettingsSection::new("text")
                        .field(SettingsField::checkbox("show_excerpt").label("Show excerpt"))
                        .field(SettingsField::textarea("custom_css", 4).label("Custom CSS")),
                ),
            )
            .tab(
                SettingsTab::new("pagination", "Pagination").section(
                    SettingsSection::new("pagination")
                        .field(SettingsField::text("posts_per_page").label("Posts per page")),
                ),
            )
    }

    /// A settings form without a "content" tab.
    pub fn form_without_content_tab() -> SettingsForm {
        let mut form = listing_settings_form();
        form.tabs.retain(|t| t.key != "content");
        form
    }
}

/// Plugin manifest (`{name}.info.toml`) parsing for manifest assertions.
pub mod manifest {
    use std::collections::HashMap;

    use anyhow::{Context, Result};
    use serde::Deserialize;

    /// Plugin metadata parsed from `.info.toml`.
    #[derive(Debug, Clone, Deserialize)]
    pub struct PluginManifest {
        pub name: String,
        pub description: String,
        pub version: String,
        #[serde(default)]
        pub dependencies: Vec<String>,
        #[serde(default)]
        pub taps: TapConfig,
    }

    /// Which taps a plugin implements, and in what order it runs.
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct TapConfig {
        #[serde(default)]
        pub implements: Vec<String>,

        /// Plugin-wide weight (lower = called first).
        #[serde(default)]
        pub weight: i32,

        #[serde(default)]
        pub options: HashMap<String, TapOptions>,
    }

    /// Per-tap options.
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct TapOptions {
        /// Overrides the plugin-wide weight for this tap.
        #[serde(default)]
        pub weight: Option<i32>,
    }

    impl PluginManifest {
        /// Parse a manifest from a TOML string.
        pub fn parse_str(content: &str) -> Result<Self> {
            let manifest: PluginManifest =
                toml::from_str(content).context("failed to parse plugin manifest TOML")?;
            if manifest.name.is_empty() {
                anyhow::bail!("plugin manifest has empty 'name' field");
            }
            Ok(manifest)
        }

        /// Check whether the plugin requires another plugin to be enabled.
        pub fn depends_on(&self, plugin: &str) -> bool {
            self.dependencies.iter().any(|d| d == plugin)
        }

        /// Check whether the manifest declares a tap.
        pub fn implements(&self, tap: &str) -> bool {
            self.taps.implements.iter().any(|t| t == tap)
        }

        /// Effective weight of a tap.
        pub fn weight_for(&self, tap: &str) -> i32 {
            self.taps
                .options
                .get(tap)
                .and_then(|o| o.weight)
                .unwrap_or(self.taps.weight)
        }
    }
}
