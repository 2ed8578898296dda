//! String-level entry points: typed value <-> JSON text in one call.

use crate::binder::{self, Bind};
use crate::encoder::encode;
use crate::error::{FeatherError, Result};
use crate::options::CodecOptions;
use crate::parser::parse;

/// Serialize a value to JSON text.
///
/// ```
/// use feather_core::{to_string, CodecOptions};
///
/// assert_eq!(to_string(&4, &CodecOptions::compact()).unwrap(), "4");
/// assert_eq!(to_string(&vec![true], &CodecOptions::pretty()).unwrap(), "[\n  true\n]");
/// ```
pub fn to_string<T: Bind>(value: &T, options: &CodecOptions) -> Result<String> {
    let tree = binder::to_tree(value, options)?;
    encode(&tree, options)
}

/// Deserialize a value from JSON text.
///
/// Blank input fails with [`FeatherError::EmptyDocument`]; malformed input
/// fails with the parser's syntax error. No partially built value is ever
/// returned.
pub fn from_str<T: Bind>(text: &str, options: &CodecOptions) -> Result<T> {
    let tree = parse(text)?.ok_or(FeatherError::EmptyDocument)?;
    binder::from_tree(&tree, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let options = CodecOptions::compact();
        assert_eq!(to_string(&4_i64, &options).unwrap(), "4");
        assert_eq!(from_str::<i64>("4", &options).unwrap(), 4);
        assert_eq!(to_string(&true, &options).unwrap(), "true");
        assert!(from_str::<bool>(" true ", &options).unwrap());
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(
            from_str::<i32>(" \n\t", &CodecOptions::default()),
            Err(FeatherError::EmptyDocument)
        );
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let err = to_string(&f64::NAN, &CodecOptions::default()).unwrap_err();
        assert!(matches!(err, FeatherError::Encode(_)));
    }
}
