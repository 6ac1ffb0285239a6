//! Listing modules this plugin extends.
//!
//! Each eligible module type maps to the key of the settings tab the
//! "Related items" tab is inserted after.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tab the related items tab follows in the default modules' forms.
pub const DEFAULT_ANCHOR: &str = "content";

/// Listing modules extended when the site supplies no override.
pub const DEFAULT_MODULES: &[&str] = &["post-grid", "post-slider", "post-carousel"];

/// Site variable holding a JSON object that replaces the default list.
pub const OVERRIDE_VARIABLE: &str = "related_items_modules";

/// Module type → anchor tab key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleAllowList {
    modules: BTreeMap<String, String>,
}

impl Default for ModuleAllowList {
    fn default() -> Self {
        Self {
            modules: DEFAULT_MODULES
                .iter()
                .map(|m| ((*m).to_string(), DEFAULT_ANCHOR.to_string()))
                .collect(),
        }
    }
}

impl ModuleAllowList {
    /// Build a list from `(module type, anchor)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            modules: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolve the list by passing the defaults through `filter`.
    ///
    /// The filter's result is taken as-is; it is not validated.
    pub fn resolve(filter: impl FnOnce(Self) -> Self) -> Self {
        filter(Self::default())
    }

    /// Replacement for `defaults` from the override variable's raw value.
    ///
    /// An empty value keeps the defaults, as does a value that does not
    /// parse as a JSON object of strings (logged).
    pub fn with_override(defaults: Self, raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return defaults;
        }
        match serde_json::from_str::<Self>(raw) {
            Ok(replacement) => replacement,
            Err(e) => {
                warn!(
                    variable = OVERRIDE_VARIABLE,
                    error = %e,
                    "ignoring unparseable module override"
                );
                defaults
            }
        }
    }

    /// Check whether the plugin acts on a module type.
    pub fn is_eligible(&self, module_type: &str) -> bool {
        self.modules.contains_key(module_type)
    }

    /// Anchor tab for a module type, if eligible.
    pub fn anchor(&self, module_type: &str) -> Option<&str> {
        self.modules.get(module_type).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// An allow list resolved at most once per process.
///
/// The first [`ResolvedModules::get_or_resolve`] call runs its filter;
/// later calls return the stored list and never run theirs.
#[derive(Debug, Default)]
pub struct ResolvedModules(OnceLock<ModuleAllowList>);

impl ResolvedModules {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn get_or_resolve(
        &self,
        filter: impl FnOnce(ModuleAllowList) -> ModuleAllowList,
    ) -> &ModuleAllowList {
        self.0.get_or_init(|| ModuleAllowList::resolve(filter))
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn defaults_cover_three_listing_modules() {
        let modules = ModuleAllowList::default();
        assert_eq!(modules.len(), 3);
        for module in DEFAULT_MODULES {
            assert!(modules.is_eligible(module));
            assert_eq!(modules.anchor(module), Some("content"));
        }
        assert!(!modules.is_eligible("rich-text"));
        assert_eq!(modules.anchor("rich-text"), None);
    }

    #[test]
    fn resolve_passes_defaults_to_filter() {
        let modules = ModuleAllowList::resolve(|defaults| {
            assert_eq!(defaults, ModuleAllowList::default());
            ModuleAllowList::from_pairs([("event-list", "query")])
        });
        assert!(modules.is_eligible("event-list"));
        assert!(!modules.is_eligible("post-grid"));
        assert_eq!(modules.anchor("event-list"), Some("query"));
    }

    #[test]
    fn resolve_identity_keeps_defaults() {
        assert_eq!(
            ModuleAllowList::resolve(|defaults| defaults),
            ModuleAllowList::default()
        );
    }

    #[test]
    fn filter_runs_once_per_holder() {
        let calls = Cell::new(0);
        let counting = |defaults: ModuleAllowList| {
            calls.set(calls.get() + 1);
            defaults
        };

        let resolved = ResolvedModules::new();
        let first = resolved.get_or_resolve(counting);
        assert_eq!(first, &ModuleAllowList::default());

        let second = resolved.get_or_resolve(|_| {
            calls.set(calls.get() + 1);
            ModuleAllowList::from_pairs([("event-list", "query")])
        });
        assert_eq!(second, &ModuleAllowList::default());
        assert!(!second.is_eligible("event-list"));
        assert_eq!(calls.get(), 1);

        // A fresh holder resolves again.
        ResolvedModules::new().get_or_resolve(counting);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn override_replaces_defaults() {
        let modules = ModuleAllowList::with_override(
            ModuleAllowList::default(),
            r#"{"post-grid": "layout", "news-ticker": "content"}"#,
        );
        assert_eq!(modules.len(), 2);
        assert_eq!(modules.anchor("post-grid"), Some("layout"));
        assert!(modules.is_eligible("news-ticker"));
        assert!(!modules.is_eligible("post-slider"));
    }

    #[test]
    fn empty_object_override_disables_everything() {
        let modules = ModuleAllowList::with_override(ModuleAllowList::default(), "{}");
        assert!(modules.is_empty());
        assert!(!modules.is_eligible("post-grid"));
    }

    #[test]
    fn blank_or_malformed_override_keeps_defaults() {
        for raw in ["", "   ", "not json", r#"["post-grid"]"#, r#"{"post-grid": 3}"#] {
            assert_eq!(
                ModuleAllowList::with_override(ModuleAllowList::default(), raw),
                ModuleAllowList::default(),
                "override {raw:?}"
            );
        }
    }
}
