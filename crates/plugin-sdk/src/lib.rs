//! Related Items plugin SDK
//!
//! Types, service traits, and host function bindings shared by WASM plugins
//! that extend the page builder's listing modules. Plugins depend on this
//! crate and use its proc macros to export taps across the WASM boundary.

#[doc(hidden)]
pub mod abi;
pub mod form;
pub mod host;
pub mod host_errors;
pub mod query;
pub mod services;
pub mod types;

// Re-export proc macros
pub use related_items_sdk_macros::{plugin_tap, plugin_tap_result};

// Re-export serde_json for use in macro-generated code
#[doc(hidden)]
pub use serde_json;

pub mod prelude {
    pub use crate::form::*;
    pub use crate::host_errors::HostError;
    pub use crate::query::*;
    pub use crate::services::{ContentQuery, FieldFormat, RelationSource};
    pub use crate::types::*;
    pub use crate::{plugin_tap, plugin_tap_result};
}
