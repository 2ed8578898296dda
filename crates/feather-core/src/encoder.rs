//! JSON encoder -- renders a [`JsonValue`] tree as text.
//!
//! Output is ASCII only: every character outside the printable range
//! (code points 32..=126) is written as a `\uXXXX` escape with lowercase hex
//! digits, using a UTF-16 surrogate pair for characters beyond the BMP.
//!
//! Compact mode emits no insignificant whitespace. Pretty mode puts every
//! object entry and array element on its own line, indented two spaces per
//! nesting level, with `": "` between key and value:
//!
//! ```
//! use feather_core::{encode, parse, CodecOptions};
//!
//! let tree = parse(r#"{"a":[1,2],"b":"x"}"#).unwrap().unwrap();
//! assert_eq!(encode(&tree, &CodecOptions::compact()).unwrap(), r#"{"a":[1,2],"b":"x"}"#);
//! assert_eq!(
//!     encode(&tree, &CodecOptions::pretty()).unwrap(),
//!     "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": \"x\"\n}"
//! );
//! ```

use std::fmt::Write as _;

use crate::error::{FeatherError, Result};
use crate::options::CodecOptions;
use crate::types::{JsonValue, Map};

/// Encode a value tree into JSON text.
///
/// Fails when the tree holds a number that JSON cannot express (NaN or an
/// infinity); nothing is returned in that case.
pub fn encode(value: &JsonValue, options: &CodecOptions) -> Result<String> {
    let mut out = String::new();
    if let Err(err) = encode_value(value, options.pretty_print, 0, &mut out) {
        tracing::debug!(error = %err, "JSON encode failed");
        return Err(err);
    }
    Ok(out)
}

/// Dispatch on the value variant.
fn encode_value(value: &JsonValue, pretty: bool, depth: usize, out: &mut String) -> Result<()> {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsonValue::Number(n) => out.push_str(&format_number(*n)?),
        JsonValue::String(s) => encode_string(s, out),
        JsonValue::Array(items) => encode_array(items, pretty, depth, out)?,
        JsonValue::Object(map) => encode_object(map, pretty, depth, out)?,
    }
    Ok(())
}

fn encode_object(map: &Map, pretty: bool, depth: usize, out: &mut String) -> Result<()> {
    if map.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        separator(i, pretty, depth + 1, out);
        encode_string(key, out);
        out.push_str(if pretty { ": " } else { ":" });
        encode_value(value, pretty, depth + 1, out)?;
    }
    close(pretty, depth, out);
    out.push('}');
    Ok(())
}

fn encode_array(items: &[JsonValue], pretty: bool, depth: usize, out: &mut String) -> Result<()> {
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        separator(i, pretty, depth + 1, out);
        encode_value(item, pretty, depth + 1, out)?;
    }
    close(pretty, depth, out);
    out.push(']');
    Ok(())
}

/// Emit what goes before the `i`th entry of a container: a comma for all but
/// the first, then in pretty mode a newline and the entry's indentation.
fn separator(i: usize, pretty: bool, depth: usize, out: &mut String) {
    if i > 0 {
        out.push(',');
    }
    if pretty {
        out.push('\n');
        out.push_str(&make_indent(depth));
    }
}

/// In pretty mode the closing bracket sits on its own line at the parent's
/// indentation.
fn close(pretty: bool, depth: usize, out: &mut String) {
    if pretty {
        out.push('\n');
        out.push_str(&make_indent(depth));
    }
}

/// Emit a quoted, escaped string.
fn encode_string(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
    }
    out.push('"');
}

/// Format a number with the shortest text that parses back to the same
/// `f64`:
///
/// - integral values have no fraction (`4`, not `4.0`)
/// - magnitudes in `1e-7..1e21` use plain decimal notation, others use an
///   exponent (`1e21`, `1.5e-10`)
/// - negative zero is written as `0`
fn format_number(n: f64) -> Result<String> {
    if !n.is_finite() {
        return Err(FeatherError::Encode(format!(
            "{n} cannot be represented as a JSON number"
        )));
    }
    if n == 0.0 {
        return Ok("0".to_string());
    }
    let magnitude = n.abs();
    if (1e-7..1e21).contains(&magnitude) {
        Ok(format!("{n}"))
    } else {
        Ok(format!("{n:e}"))
    }
}

/// Generate a 2-space-per-level indentation string.
fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}
