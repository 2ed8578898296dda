//! Scalar codecs: primitives, text, base64 byte buffers and date/time values.

use std::ops::Deref;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat, Utc};

use super::{mismatch, Bind, Binder};
use crate::error::{FeatherError, Result};
use crate::options::CodecOptions;
use crate::types::JsonValue;

/// Largest integer magnitude an `f64` represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i128 = (1 << 53) - 1;

fn expect_number(tree: &JsonValue) -> Result<f64> {
    tree.as_f64().ok_or_else(|| mismatch("number", tree))
}

fn expect_str(tree: &JsonValue) -> Result<&str> {
    tree.as_str().ok_or_else(|| mismatch("string", tree))
}

/// Accept only integral numbers inside the safe range.
fn integral(n: f64) -> Result<i128> {
    if n.fract() != 0.0 {
        return Err(FeatherError::scalar("integer", format!("{n} is not integral")));
    }
    if n.abs() > MAX_SAFE_INTEGER as f64 {
        return Err(FeatherError::scalar(
            "integer",
            format!("{n} is outside the safe integer range"),
        ));
    }
    Ok(n as i128)
}

macro_rules! bind_integer {
    ($($t:ty),* $(,)?) => {$(
        impl Bind for $t {
            fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
                match i128::try_from(*self) {
                    Ok(wide) if wide.unsigned_abs() <= MAX_SAFE_INTEGER as u128 => {
                        Ok(JsonValue::Number(wide as f64))
                    }
                    _ => Err(FeatherError::Encode(format!(
                        "integer {} exceeds the safe range of a JSON number",
                        self
                    ))),
                }
            }

            fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
                let wide = integral(expect_number(tree)?)?;
                <$t>::try_from(wide).map_err(|_| {
                    FeatherError::scalar(
                        "integer",
                        format!("{} does not fit in {}", wide, stringify!($t)),
                    )
                })
            }

            fn empty() -> Result<Self> {
                Ok(0)
            }
        }
    )*};
}

bind_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Bind for f64 {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::Number(*self))
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        expect_number(tree)
    }

    fn empty() -> Result<Self> {
        Ok(0.0)
    }
}

impl Bind for f32 {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::Number(f64::from(*self)))
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        let n = expect_number(tree)?;
        let narrowed = n as f32;
        if !narrowed.is_finite() {
            return Err(FeatherError::scalar("float", format!("{n} is outside the range of f32")));
        }
        Ok(narrowed)
    }

    fn empty() -> Result<Self> {
        Ok(0.0)
    }
}

impl Bind for bool {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::Bool(*self))
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        tree.as_bool().ok_or_else(|| mismatch("boolean", tree))
    }

    fn empty() -> Result<Self> {
        Ok(false)
    }
}

impl Bind for String {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::String(self.clone()))
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        expect_str(tree).map(str::to_string)
    }

    fn empty() -> Result<Self> {
        Ok(String::new())
    }
}

/// Encode only: there is nowhere to borrow decoded text from.
impl Bind for &'static str {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::from(*self))
    }

    fn empty() -> Result<Self> {
        Ok("")
    }
}

impl Bind for char {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::String(self.to_string()))
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        let text = expect_str(tree)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(FeatherError::scalar(
                "char",
                format!("expected exactly one character, got {text:?}"),
            )),
        }
    }

    fn empty() -> Result<Self> {
        Ok('\0')
    }
}

/// A byte buffer, carried as standard-alphabet base64 text.
///
/// ```
/// use feather_core::{to_string, Bytes, CodecOptions};
///
/// let text = to_string(&Bytes(vec![0x41, 0x42]), &CodecOptions::compact()).unwrap();
/// assert_eq!(text, r#""QUI=""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Bind for Bytes {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        Ok(JsonValue::String(STANDARD.encode(&self.0)))
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        STANDARD
            .decode(expect_str(tree)?)
            .map(Bytes)
            .map_err(|e| FeatherError::scalar("base64", e.to_string()))
    }

    fn empty() -> Result<Self> {
        Ok(Bytes::default())
    }
}

/// Render the round-trip date format: RFC 3339, nine fraction digits,
/// numeric offset. RFC 3339 has four-digit years only, so local years
/// outside 0..=9999 cannot be written.
fn render_date(date: &DateTime<FixedOffset>) -> Result<String> {
    if !(0..=9999).contains(&date.year()) {
        return Err(FeatherError::Encode(format!(
            "date {date} has a year outside 0000..=9999"
        )));
    }
    Ok(date.to_rfc3339_opts(SecondsFormat::Nanos, false))
}

/// Parse the round-trip format. Any other valid RFC 3339 spelling (no
/// fraction, `Z` suffix, lowercase `t`) is rejected so that decode accepts
/// exactly what encode produces.
fn parse_date(tree: &JsonValue) -> Result<DateTime<FixedOffset>> {
    let text = expect_str(tree)?;
    let date = DateTime::parse_from_rfc3339(text)
        .map_err(|e| FeatherError::scalar("date", format!("{text:?}: {e}")))?;
    if render_date(&date)? != text {
        return Err(FeatherError::scalar(
            "date",
            format!("{text:?} is not in YYYY-MM-DDTHH:MM:SS.fffffffff+HH:MM form"),
        ));
    }
    Ok(date)
}

impl Bind for DateTime<FixedOffset> {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        render_date(self).map(JsonValue::String)
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        parse_date(tree)
    }

    fn empty() -> Result<Self> {
        Ok(DateTime::default())
    }
}

impl Bind for DateTime<Utc> {
    fn to_tree(&self, _binder: &mut Binder) -> Result<JsonValue> {
        render_date(&self.fixed_offset()).map(JsonValue::String)
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        parse_date(tree).map(|date| date.with_timezone(&Utc))
    }

    fn empty() -> Result<Self> {
        Ok(DateTime::default())
    }
}
