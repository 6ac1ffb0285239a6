//! WASM Host Function Error Codes
//!
//! All kernel host functions used by this SDK follow the standard error code
//! convention for their `i32` return values. Negative values indicate
//! errors; non-negative values indicate success.
//!
//! # Standard Error Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `-1` | Memory export not found — the WASM module does not export `"memory"` |
//! | `-2` | First parameter read failed — UTF-8 error or out-of-bounds slice |
//! | `-3` | Second parameter or output write failed — buffer too small or OOB |
//! | `-4` | Third parameter read failed |
//! | `≥ 0` | Success — value is bytes written |
//!
//! Codes at or below `-100` are produced on the plugin side when a value
//! cannot cross the boundary (serialization, UTF-8, decoding).
//!
//! # Per-API Details
//!
//! ## Fields (`trovato:kernel/fields`)
//!
//! - **`get-field(key_ptr, key_len, format, out_ptr, out_max_len) → i32`**
//!   - Reads a field of the item the current request is rendering.
//!   - `format = 0` returns the stored (raw) value; `1` the display value.
//!   - `-1`: memory missing, `-2`: key read failed, `-3`: output write failed
//!   - `≥ 0`: bytes written (JSON value, `null` when the field is unset)
//!
//! ## Loop query (`trovato:kernel/loop-query`)
//!
//! - **`execute(args_ptr, args_len, out_ptr, out_max_len) → i32`**
//!   - `-1`: memory missing, `-2`: args JSON read failed, `-3`: output write failed
//!   - `≥ 0`: bytes written (JSON array of IDs or item records)
//!
//! ## Variables (`trovato:kernel/variables`)
//!
//! - **`get(name_ptr, name_len, default_ptr, default_len, out_ptr, out_max_len) → i32`**
//!   - `0`: memory missing (returns default length otherwise)
//!   - `> 0`: bytes written
//!
//! ## Logging (`trovato:kernel/logging`)
//!
//! - **`log(level_ptr, level_len, plugin_ptr, plugin_len, msg_ptr, msg_len) → void`**
//!   - No return value. Falls back to `info` level on parse failure.

use thiserror::Error;

/// Failure reported by (or while talking to) a kernel host function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("plugin memory export not found")]
    MemoryMissing,

    #[error("host failed to read the first parameter")]
    FirstParam,

    #[error("host failed to read the second parameter or write output")]
    SecondParam,

    #[error("host failed to read the third parameter")]
    ThirdParam,

    #[error("serialize: {0}")]
    Serialize(String),

    #[error("invalid UTF-8 in host output")]
    Utf8,

    #[error("deserialize: {0}")]
    Deserialize(String),

    #[error("host error code {0}")]
    Other(i32),
}

impl HostError {
    /// Map a negative host return code to an error.
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => HostError::MemoryMissing,
            -2 => HostError::FirstParam,
            -3 => HostError::SecondParam,
            -4 => HostError::ThirdParam,
            -101 => HostError::Utf8,
            other => HostError::Other(other),
        }
    }

    /// Numeric code for this error.
    pub fn code(&self) -> i32 {
        match self {
            HostError::MemoryMissing => -1,
            HostError::FirstParam => -2,
            HostError::SecondParam => -3,
            HostError::ThirdParam => -4,
            HostError::Serialize(_) => -100,
            HostError::Utf8 => -101,
            HostError::Deserialize(_) => -102,
            HostError::Other(code) => *code,
        }
    }
}

impl From<serde_json::Error> for HostError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            HostError::Serialize(e.to_string())
        } else {
            HostError::Deserialize(e.to_string())
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_codes_round_trip() {
        for code in [-1, -2, -3, -4, -101, -7] {
            assert_eq!(HostError::from_code(code).code(), code);
        }
    }

    #[test]
    fn json_errors_become_deserialize() {
        let err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        assert!(matches!(HostError::from(err), HostError::Deserialize(_)));
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(HostError::Other(-9).to_string(), "host error code -9");
        assert_eq!(
            HostError::MemoryMissing.to_string(),
            "plugin memory export not found"
        );
    }
}
