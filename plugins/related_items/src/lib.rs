//! Related items plugin.
//!
//! Extends the page builder's listing modules (post grid, post slider,
//! post carousel) so that items picked in a relation field of the item
//! being viewed are merged into the module's results, before or after the
//! items the module finds on its own, without duplicates.
//!
//! Two taps do the work: `tap_module_settings_form_alter` adds a
//! "Related items" tab to eligible modules, and `tap_loop_query_alter`
//! rewrites their loop query. The tap manifest gives the query tap weight
//! 9999 so it sees every other plugin's alterations first, and lists the
//! page builder and the relation field provider as dependencies so neither
//! tap is registered on a site missing either of them.

pub mod allow_list;
pub mod host_services;
pub mod join;
pub mod rewrite;
pub mod settings;
pub mod settings_form;

use related_items_sdk::host;
use related_items_sdk::prelude::*;

use crate::allow_list::{ModuleAllowList, OVERRIDE_VARIABLE, ResolvedModules};
use crate::host_services::{HostQuery, HostRelations};

/// Plugin machine name, as in `related_items.info.toml`.
pub const PLUGIN_NAME: &str = "related_items";

/// Plugins that must be enabled for the taps to run.
pub const REQUIRED_PLUGINS: [&str; 2] = ["trovato_page_builder", "trovato_relation_fields"];

static MODULES: ResolvedModules = ResolvedModules::new();

/// Eligible modules, resolved against the site override on first use.
fn modules() -> &'static ModuleAllowList {
    MODULES.get_or_resolve(|defaults| {
        let raw = host::variable_get(OVERRIDE_VARIABLE, "");
        ModuleAllowList::with_override(defaults, &raw)
    })
}

/// Add the "Related items" tab to eligible listing module forms.
#[plugin_tap]
pub fn tap_module_settings_form_alter(input: ModuleFormInput) -> SettingsForm {
    settings_form::build_settings_form(input.form, &input.module_type, modules())
}

/// Merge relation field items into a listing module's loop query.
#[plugin_tap_result]
pub fn tap_loop_query_alter(args: LoopQueryArgs) -> Result<LoopQueryArgs, HostError> {
    rewrite::rewrite_query_args(args, &HostRelations, &HostQuery).inspect_err(|e| {
        host::log(
            LogLevel::Error,
            PLUGIN_NAME,
            &format!("loop query rewrite failed: {e}"),
        );
    })
}
