//! "Related items" tab for listing module settings forms.

use related_items_sdk::form::{SettingsField, SettingsForm, SettingsSection, SettingsTab};
use tracing::{debug, warn};

use crate::allow_list::ModuleAllowList;
use crate::settings::{FIELD_KEY, PLACEMENT_KEY, Placement};

/// Key of the injected tab (and its only section).
pub const TAB_KEY: &str = "related_items";

/// Module fields the host shows while placement is "none".
const MODULE_SOURCE_FIELDS: &[&str] = &["posts_post", "posts_page"];

/// The tab holding the placement select and the relation field key.
pub fn related_items_tab() -> SettingsTab {
    let options = Placement::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.label().to_string()))
        .collect();

    let placement = SettingsField::select(PLACEMENT_KEY, options)
        .label("Insert related items")
        .default_value(Placement::None.as_str())
        .toggle_fields(Placement::None.as_str(), MODULE_SOURCE_FIELDS.iter().copied())
        .toggle_fields(Placement::Before.as_str(), [FIELD_KEY])
        .toggle_fields(Placement::After.as_str(), [FIELD_KEY]);

    let field_key = SettingsField::text(FIELD_KEY)
        .label("Relation field key")
        .description("Machine name of the relation field on the item being viewed.");

    SettingsTab::new(TAB_KEY, "Related items")
        .section(SettingsSection::new(TAB_KEY).field(placement).field(field_key))
}

/// Add the related items tab to an eligible module's settings form.
///
/// The tab goes right after the module's anchor tab. Forms of modules the
/// allow-list doesn't name come back unchanged, as do forms that already
/// carry the tab. A form without the anchor tab gets the tab appended.
pub fn build_settings_form(
    mut form: SettingsForm,
    module_type: &str,
    modules: &ModuleAllowList,
) -> SettingsForm {
    let Some(anchor) = modules.anchor(module_type) else {
        return form;
    };

    if form.has_tab(TAB_KEY) {
        debug!(module = %module_type, "related items tab already present");
        return form;
    }

    let tab = related_items_tab();
    match form.position(anchor) {
        Some(pos) => form.tabs.insert(pos + 1, tab),
        None => {
            warn!(
                module = %module_type,
                anchor = %anchor,
                "anchor tab missing from settings form; appending related items tab"
            );
            form.tabs.push(tab);
        }
    }

    form
}
