//! Loop query rewriting.
//!
//! When a module has related items enabled, its query is run twice. The
//! first pass collects the IDs the module would show on its own, minus the
//! related items. The second pass, executed by the kernel, is pinned to the
//! merged ID list and ordered by it.

use related_items_sdk::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::join::join;
use crate::settings::RelatedSettings;

/// Merge relation field items into a listing module's loop query.
///
/// Returns `args` untouched when the module has no settings, the feature is
/// off, the field key is blank, or the relation field is empty. Failures of
/// the relation source or the query engine are returned as-is.
pub fn rewrite_query_args<R, Q>(
    mut args: LoopQueryArgs,
    relations: &R,
    query: &Q,
) -> Result<LoopQueryArgs, HostError>
where
    R: RelationSource + ?Sized,
    Q: ContentQuery + ?Sized,
{
    let Some(module_settings) = args.settings.as_ref() else {
        return Ok(args);
    };
    let Some(related) = RelatedSettings::from_module(module_settings) else {
        return Ok(args);
    };

    let related_ids = relations.related_ids(&related.field_key, FieldFormat::Raw)?;
    if related_ids.is_empty() {
        return Ok(args);
    }

    let organic_ids = query.query_ids(&organic_query(&args, &related_ids))?;
    let merged = join(&related_ids, &organic_ids, related.appends());

    debug!(
        field = %related.field_key,
        placement = related.placement.as_str(),
        related = related_ids.len(),
        organic = organic_ids.len(),
        merged = merged.len(),
        "merged related items into loop query"
    );

    args.item_in = Some(merged);
    args.item_type = Some(ItemTypeFilter::any());
    args.orderby = Some(OrderBy::ItemIn);
    args.fields = None;
    args.nopaging = None;
    args.item_not_in = None;
    args.author_not_in = None;
    args.tax_query = None;
    args.order = None;

    Ok(args)
}

/// The module's own query, unpaged, IDs only, with related items excluded.
fn organic_query(args: &LoopQueryArgs, related_ids: &[ItemId]) -> LoopQueryArgs {
    let mut organic = args.clone();
    organic.fields = Some(ResultFields::Ids);
    organic.nopaging = Some(Value::Bool(true));
    organic.item_in = None;

    let excluded = organic.item_not_in.get_or_insert_with(Vec::new);
    for id in related_ids {
        if !excluded.contains(id) {
            excluded.push(*id);
        }
    }

    organic
}
