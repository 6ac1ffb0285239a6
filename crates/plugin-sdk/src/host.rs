//! Host function bindings for calling kernel services from WASM plugins.
//!
//! These functions are only usable when compiled for `wasm32` targets.
//! On native targets, stub implementations are provided for testing.

use crate::types::LogLevel;

#[cfg(target_arch = "wasm32")]
use crate::host_errors::HostError;

/// Maximum output buffer size for host results (256KB).
#[cfg(target_arch = "wasm32")]
const MAX_OUTPUT_BUFFER: usize = 256 * 1024;

/// Maximum size of a variable value (64KB).
#[cfg(target_arch = "wasm32")]
const MAX_VARIABLE_BUFFER: usize = 64 * 1024;

// --------------------------------------------------------------------------
// WASM extern declarations — available only when compiling for wasm32
// --------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "trovato:kernel/fields")]
unsafe extern "C" {
    #[link_name = "get-field"]
    fn __fields_get(key_ptr: i32, key_len: i32, format: i32, out_ptr: i32, out_max_len: i32)
    -> i32;
}

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "trovato:kernel/loop-query")]
unsafe extern "C" {
    #[link_name = "execute"]
    fn __loop_query_execute(args_ptr: i32, args_len: i32, out_ptr: i32, out_max_len: i32) -> i32;
}

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "trovato:kernel/variables")]
unsafe extern "C" {
    #[link_name = "get"]
    fn __variables_get(
        name_ptr: i32,
        name_len: i32,
        default_ptr: i32,
        default_len: i32,
        out_ptr: i32,
        out_max_len: i32,
    ) -> i32;
}

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "trovato:kernel/logging")]
unsafe extern "C" {
    #[link_name = "log"]
    fn __logging_log(
        level_ptr: i32,
        level_len: i32,
        plugin_ptr: i32,
        plugin_len: i32,
        msg_ptr: i32,
        msg_len: i32,
    );
}

// --------------------------------------------------------------------------
// Ergonomic wrappers
// --------------------------------------------------------------------------

/// Read a field of the item the current request is rendering.
///
/// With `formatted = false` the stored value is returned untouched (for a
/// relation field: the referenced IDs). Returns the JSON-encoded value,
/// `null` when the field is unset.
///
/// # Errors
///
/// Returns the mapped host error code on failure.
#[cfg(target_arch = "wasm32")]
pub fn get_field(key: &str, formatted: bool) -> Result<String, HostError> {
    let mut buf = vec![0u8; MAX_OUTPUT_BUFFER];
    let result = unsafe {
        __fields_get(
            key.as_ptr() as i32,
            key.len() as i32,
            i32::from(formatted),
            buf.as_mut_ptr() as i32,
            buf.len() as i32,
        )
    };
    read_output(buf, result)
}

/// Execute a loop query, return the JSON result rows.
///
/// # Errors
///
/// Returns the mapped host error code on failure.
#[cfg(target_arch = "wasm32")]
pub fn execute_loop_query(args_json: &str) -> Result<String, HostError> {
    let mut buf = vec![0u8; MAX_OUTPUT_BUFFER];
    let result = unsafe {
        __loop_query_execute(
            args_json.as_ptr() as i32,
            args_json.len() as i32,
            buf.as_mut_ptr() as i32,
            buf.len() as i32,
        )
    };
    read_output(buf, result)
}

/// Read a site variable, falling back to `default`.
#[cfg(target_arch = "wasm32")]
pub fn variable_get(name: &str, default: &str) -> String {
    let mut buf = vec![0u8; MAX_VARIABLE_BUFFER];
    let result = unsafe {
        __variables_get(
            name.as_ptr() as i32,
            name.len() as i32,
            default.as_ptr() as i32,
            default.len() as i32,
            buf.as_mut_ptr() as i32,
            buf.len() as i32,
        )
    };
    if result <= 0 {
        return default.to_string();
    }
    buf.truncate(result as usize);
    String::from_utf8(buf).unwrap_or_else(|_| default.to_string())
}

/// Send a log line to the kernel's tracing pipeline.
#[cfg(target_arch = "wasm32")]
pub fn log(level: LogLevel, plugin: &str, message: &str) {
    let level = level.as_str();
    unsafe {
        __logging_log(
            level.as_ptr() as i32,
            level.len() as i32,
            plugin.as_ptr() as i32,
            plugin.len() as i32,
            message.as_ptr() as i32,
            message.len() as i32,
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn read_output(mut buf: Vec<u8>, result: i32) -> Result<String, HostError> {
    if result < 0 {
        return Err(HostError::from_code(result));
    }
    buf.truncate(result as usize);
    String::from_utf8(buf).map_err(|_| HostError::Utf8)
}

// --------------------------------------------------------------------------
// Native stubs for testing — no kernel behind them
// --------------------------------------------------------------------------

/// Read a field (stub for native testing, always unset).
#[cfg(not(target_arch = "wasm32"))]
pub fn get_field(_key: &str, _formatted: bool) -> Result<String, crate::host_errors::HostError> {
    Ok("null".to_string())
}

/// Execute a loop query (stub for native testing, always returns no rows).
#[cfg(not(target_arch = "wasm32"))]
pub fn execute_loop_query(_args_json: &str) -> Result<String, crate::host_errors::HostError> {
    Ok("[]".to_string())
}

/// Read a site variable (stub for native testing, always the default).
#[cfg(not(target_arch = "wasm32"))]
pub fn variable_get(_name: &str, default: &str) -> String {
    default.to_string()
}

/// Log through `tracing` directly when running natively.
#[cfg(not(target_arch = "wasm32"))]
pub fn log(level: LogLevel, plugin: &str, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(plugin = %plugin, "{}", message),
        LogLevel::Info => tracing::info!(plugin = %plugin, "{}", message),
        LogLevel::Warning => tracing::warn!(plugin = %plugin, "{}", message),
        LogLevel::Error => tracing::error!(plugin = %plugin, "{}", message),
    }
}
