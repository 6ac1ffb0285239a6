//! Kernel services a listing plugin consults while altering a loop query.
//!
//! Taps receive their collaborators through these traits so the alteration
//! logic runs the same against the WASM host imports and against in-memory
//! fakes in tests.

use crate::host_errors::HostError;
use crate::query::LoopQueryArgs;
use crate::types::ItemId;

/// How a field value should be returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// The stored value (e.g., referenced IDs), unformatted.
    Raw,
    /// The display value.
    Formatted,
}

/// Reads relation fields of the item being rendered.
pub trait RelationSource {
    /// IDs referenced by `field_key`, in stored order. Empty when unset.
    fn related_ids(&self, field_key: &str, format: FieldFormat) -> Result<Vec<ItemId>, HostError>;
}

/// Executes loop queries.
pub trait ContentQuery {
    /// Run the query and return the matching item IDs in result order.
    fn query_ids(&self, args: &LoopQueryArgs) -> Result<Vec<ItemId>, HostError>;
}

impl<T: RelationSource + ?Sized> RelationSource for &T {
    fn related_ids(&self, field_key: &str, format: FieldFormat) -> Result<Vec<ItemId>, HostError> {
        (**self).related_ids(field_key, format)
    }
}

impl<T: ContentQuery + ?Sized> ContentQuery for &T {
    fn query_ids(&self, args: &LoopQueryArgs) -> Result<Vec<ItemId>, HostError> {
        (**self).query_ids(args)
    }
}
