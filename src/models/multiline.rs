//! Line-ending conversion for multiline text fields.
//!
//! The service joins lines with `\n`. Locally, multiline fields use the
//! platform's native separator. Conversion happens when a model is decoded
//! from or encoded to the wire, never inside the request gateway.

/// The platform's native line separator.
#[cfg(windows)]
pub const NATIVE_NEWLINE: &str = "\r\n";

/// The platform's native line separator.
#[cfg(not(windows))]
pub const NATIVE_NEWLINE: &str = "\n";

/// Converts `\n`-joined wire text to native line endings.
pub fn wire_to_native(text: &str) -> String {
    if NATIVE_NEWLINE == "\n" {
        return text.to_string();
    }
    text.replace('\n', NATIVE_NEWLINE)
}

/// Converts native line endings to `\n`-joined wire text.
pub fn native_to_wire(text: &str) -> String {
    if NATIVE_NEWLINE == "\n" {
        return text.to_string();
    }
    text.replace(NATIVE_NEWLINE, "\n")
}
