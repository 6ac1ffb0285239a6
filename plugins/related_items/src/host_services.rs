//! Kernel-backed implementations of the SDK service traits.

use related_items_sdk::host;
use related_items_sdk::prelude::*;
use serde_json::Value;

/// Relation fields of the item the kernel is currently rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostRelations;

impl RelationSource for HostRelations {
    fn related_ids(&self, field_key: &str, format: FieldFormat) -> Result<Vec<ItemId>, HostError> {
        let raw = host::get_field(field_key, format == FieldFormat::Formatted)?;
        let value: Value = serde_json::from_str(&raw)?;
        Ok(ids_from_value(&value))
    }
}

/// The kernel's loop query engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostQuery;

impl ContentQuery for HostQuery {
    fn query_ids(&self, args: &LoopQueryArgs) -> Result<Vec<ItemId>, HostError> {
        let args_json =
            serde_json::to_string(args).map_err(|e| HostError::Serialize(e.to_string()))?;
        let rows = host::execute_loop_query(&args_json)?;
        row_ids(&rows)
    }
}

/// Item IDs from a loop query result: either bare IDs or item records.
fn row_ids(rows_json: &str) -> Result<Vec<ItemId>, HostError> {
    let rows: Vec<Value> = serde_json::from_str(rows_json)?;
    Ok(ids_from_value(&Value::Array(rows)))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use related_items_test_utils::item_id;
    use serde_json::json;

    #[test]
    fn row_ids_accepts_ids_and_records() {
        let (a, b) = (item_id(1), item_id(2));
        let rows = json!([a.to_string(), {"id": b.to_string(), "title": "B"}]).to_string();
        assert_eq!(row_ids(&rows).unwrap(), vec![a, b]);
    }

    #[test]
    fn row_ids_rejects_non_array() {
        assert!(matches!(
            row_ids("{\"oops\": true}"),
            Err(HostError::Deserialize(_))
        ));
    }

    #[test]
    fn native_stubs_yield_nothing() {
        assert!(
            HostRelations
                .related_ids("field_related", FieldFormat::Raw)
                .unwrap()
                .is_empty()
        );
        assert!(HostQuery.query_ids(&LoopQueryArgs::default()).unwrap().is_empty());
    }
}
