//! Tap return values as seen by the kernel.
//!
//! A tap export returns `ptr << 32 | len`. The kernel reads `len` bytes of
//! UTF-8 JSON at `ptr`; a negative `len` marks an `{"error": ...}` payload.
//! The bytes stay in a per-instance buffer until the next tap call, so the
//! buffer grows to fit whatever the tap returns.

use std::cell::RefCell;
use std::fmt::Display;

/// Longest payload whose length fits the low half of the return value.
pub const MAX_OUTPUT_LEN: usize = i32::MAX as usize;

thread_local! {
    static OUTPUT: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
}

/// Store `s` as the tap's output and encode its location.
pub fn write_output(s: &str, is_error: bool) -> i64 {
    write_limited(s, is_error, MAX_OUTPUT_LEN)
}

fn write_limited(s: &str, is_error: bool, limit: usize) -> i64 {
    let oversized;
    let (payload, is_error) = if s.len() > limit {
        oversized = error_json(
            "output too large",
            &format!("{} bytes, limit {limit}", s.len()),
        );
        (oversized.as_str(), true)
    } else {
        (s, is_error)
    };

    OUTPUT.with(|cell| {
        let mut buf = cell.borrow_mut();
        buf.clear();
        buf.extend_from_slice(payload.as_bytes());
        let ptr = buf.as_ptr() as usize as i64;
        let len = buf.len() as i64;
        let len = if is_error { -len } else { len };
        (ptr << 32) | (len & 0xFFFF_FFFF)
    })
}

/// `{"error": "<context>: <e>"}`, or just `<e>` without a context.
pub fn error_json(context: &str, e: &dyn Display) -> String {
    let message = if context.is_empty() {
        e.to_string()
    } else {
        format!("{context}: {e}")
    };
    serde_json::json!({ "error": message }).to_string()
}
