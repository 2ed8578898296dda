//! Codec configuration.

use serde::{Deserialize, Serialize};

/// Immutable switches threaded through every encode/decode call.
///
/// There is no process-wide default instance: callers pass the options they
/// want explicitly. The type derives serde so host applications can embed
/// it in their own configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Drop record members whose value is absent (or the strings `"null"` /
    /// `"undefined"`) instead of writing them as `null`. On decode, such
    /// document values leave the member untouched.
    pub omit_null_or_undefined: bool,
    /// Insert newlines and a two-space indent per nesting level.
    pub pretty_print: bool,
}

impl CodecOptions {
    /// Compact output, nulls written out.
    pub const fn compact() -> Self {
        Self {
            omit_null_or_undefined: false,
            pretty_print: false,
        }
    }

    /// Pretty-printed output, nulls written out.
    pub const fn pretty() -> Self {
        Self {
            omit_null_or_undefined: false,
            pretty_print: true,
        }
    }

    pub const fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    pub const fn with_omit_null_or_undefined(mut self, omit: bool) -> Self {
        self.omit_null_or_undefined = omit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_compact() {
        assert_eq!(CodecOptions::default(), CodecOptions::compact());
    }

    #[test]
    fn test_builders() {
        let options = CodecOptions::compact()
            .with_pretty_print(true)
            .with_omit_null_or_undefined(true);
        assert!(options.pretty_print);
        assert!(options.omit_null_or_undefined);
        assert_eq!(CodecOptions::pretty().with_pretty_print(false), CodecOptions::compact());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let options: CodecOptions = serde_json::from_str(r#"{"pretty_print":true}"#).unwrap();
        assert!(options.pretty_print);
        assert!(!options.omit_null_or_undefined);
    }
}
