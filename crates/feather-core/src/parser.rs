//! Recursive-descent JSON parser.
//!
//! Consumes the [`Lexer`] and builds a [`JsonValue`] tree. Every rule returns
//! a `Result`, so the first failure short-circuits all enclosing rules and
//! no partial tree escapes.
//!
//! Two leniencies are kept deliberately:
//!
//! - commas inside objects and arrays are consumed and ignored, so leading,
//!   doubled and trailing commas are accepted;
//! - anything after the first complete top-level value is not inspected.

use crate::error::{FeatherError, Result};
use crate::lexer::{Lexer, Token};
use crate::types::{JsonValue, Map};

/// Nesting depth at which the parser gives up instead of recursing further.
pub const MAX_DEPTH: usize = 512;

/// Characters that may appear in a number literal.
const NUMBER_CHARS: &[u8] = b"0123456789+-.eE";

/// Parse a JSON document.
///
/// Returns `Ok(None)` when the input is empty or whitespace only, and
/// `Ok(Some(value))` for the first complete value in the text. A literal
/// `null` document is `Ok(Some(JsonValue::Null))`.
pub fn parse(text: &str) -> Result<Option<JsonValue>> {
    let mut parser = Parser::new(text);
    parser.lexer.skip_whitespace();
    if parser.lexer.remaining() == 0 {
        return Ok(None);
    }
    match parser.parse_value() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::debug!(error = %err, "JSON parse failed");
            Err(err)
        }
    }
}

/// Parser state: a lexer cursor plus the current nesting depth.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text),
            depth: 0,
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.lexer.position()
    }

    fn error(&self, message: impl Into<String>) -> FeatherError {
        FeatherError::syntax(self.lexer.position(), message)
    }

    /// Parse a single value starting at the cursor.
    pub fn parse_value(&mut self) -> Result<JsonValue> {
        match self.lexer.look_ahead() {
            Token::Quote => self.parse_string().map(JsonValue::String),
            Token::Number => self.parse_number().map(JsonValue::Number),
            Token::LeftBrace => self.parse_object(),
            Token::LeftBracket => self.parse_array(),
            Token::True => {
                self.lexer.next_token();
                Ok(JsonValue::Bool(true))
            }
            Token::False => {
                self.lexer.next_token();
                Ok(JsonValue::Bool(false))
            }
            Token::Null => {
                self.lexer.next_token();
                Ok(JsonValue::Null)
            }
            Token::End => {
                self.lexer.skip_whitespace();
                Err(self.error("expected a value"))
            }
            other => {
                self.lexer.skip_whitespace();
                Err(self.error(format!("unexpected {other:?} where a value was expected")))
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {MAX_DEPTH} levels")));
        }
        Ok(())
    }

    /// Parse an object. Keys keep their first position; a repeated key
    /// overwrites the earlier value.
    fn parse_object(&mut self) -> Result<JsonValue> {
        self.enter()?;
        // Consume `{`
        self.lexer.next_token();

        let mut map = Map::new();
        loop {
            match self.lexer.look_ahead() {
                Token::End => return Err(self.error("unterminated object")),
                Token::Comma => {
                    self.lexer.next_token();
                }
                Token::RightBrace => {
                    self.lexer.next_token();
                    break;
                }
                _ => {
                    let key = self.parse_string()?;
                    if self.lexer.next_token() != Token::Colon {
                        return Err(self.error(format!("expected ':' after key {key:?}")));
                    }
                    let value = self.parse_value()?;
                    map.insert(key, value);
                }
            }
        }

        self.depth -= 1;
        Ok(JsonValue::Object(map))
    }

    fn parse_array(&mut self) -> Result<JsonValue> {
        self.enter()?;
        // Consume `[`
        self.lexer.next_token();

        let mut items = Vec::new();
        loop {
            match self.lexer.look_ahead() {
                Token::End => return Err(self.error("unterminated array")),
                Token::Comma => {
                    self.lexer.next_token();
                }
                Token::RightBracket => {
                    self.lexer.next_token();
                    break;
                }
                _ => items.push(self.parse_value()?),
            }
        }

        self.depth -= 1;
        Ok(JsonValue::Array(items))
    }

    /// Parse a quoted string, decoding escape sequences.
    pub fn parse_string(&mut self) -> Result<String> {
        self.lexer.skip_whitespace();
        if self.lexer.advance() != Some(b'"') {
            return Err(self.error("expected '\"'"));
        }

        let mut out = String::new();
        let mut run = self.lexer.position();
        loop {
            let here = self.lexer.position();
            match self.lexer.advance() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => {
                    out.push_str(self.lexer.slice(run, here));
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(self.lexer.slice(run, here));
                    out.push(self.parse_escape()?);
                    run = self.lexer.position();
                }
                Some(_) => {}
            }
        }
    }

    /// Decode the escape sequence following a backslash.
    fn parse_escape(&mut self) -> Result<char> {
        match self.lexer.advance() {
            None => Err(self.error("unterminated escape sequence")),
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\u{08}'),
            Some(b'f') => Ok('\u{0C}'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => self.parse_unicode_escape(),
            Some(other) => Err(self.error(format!("invalid escape '\\{}'", other as char))),
        }
    }

    /// Decode `\uXXXX`, combining a UTF-16 surrogate pair when the first unit
    /// is a high surrogate.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let unit = self.read_hex4()?;

        let code_point = match unit {
            0xD800..=0xDBFF => {
                if self.lexer.advance() != Some(b'\\') || self.lexer.advance() != Some(b'u') {
                    return Err(self.error("unpaired high surrogate"));
                }
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error("high surrogate not followed by a low surrogate"));
                }
                0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error("unpaired low surrogate")),
            _ => u32::from(unit),
        };

        char::from_u32(code_point).ok_or_else(|| self.error("invalid code point"))
    }

    /// Read exactly four hex digits as one UTF-16 code unit.
    fn read_hex4(&mut self) -> Result<u16> {
        if self.lexer.remaining() < 4 {
            return Err(self.error("truncated \\u escape"));
        }
        let mut value: u16 = 0;
        for _ in 0..4 {
            let digit = match self.lexer.advance() {
                Some(b @ b'0'..=b'9') => b - b'0',
                Some(b @ b'a'..=b'f') => b - b'a' + 10,
                Some(b @ b'A'..=b'F') => b - b'A' + 10,
                _ => return Err(self.error("invalid hex digit in \\u escape")),
            };
            value = (value << 4) | u16::from(digit);
        }
        Ok(value)
    }

    /// Parse the maximal run of number characters as an `f64`.
    pub fn parse_number(&mut self) -> Result<f64> {
        self.lexer.skip_whitespace();
        let start = self.lexer.position();
        while let Some(b) = self.lexer.peek() {
            if !NUMBER_CHARS.contains(&b) {
                break;
            }
            self.lexer.advance();
        }
        let literal = self.lexer.slice(start, self.lexer.position());

        match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            Ok(_) => Err(FeatherError::syntax(start, format!("number {literal} is out of range"))),
            Err(_) => Err(FeatherError::syntax(start, format!("invalid number {literal:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> JsonValue {
        parse(input).unwrap().unwrap()
    }

    #[test]
    fn test_blank_input_is_absent() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse(" \t\r\n").unwrap(), None);
    }

    #[test]
    fn test_null_document_is_a_value() {
        assert_eq!(parse("null").unwrap(), Some(JsonValue::Null));
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_ok("4"), JsonValue::Number(4.0));
        assert_eq!(parse_ok("-1.5e3"), JsonValue::Number(-1500.0));
        assert_eq!(parse_ok("true"), JsonValue::Bool(true));
        assert_eq!(parse_ok(r#""hi""#), JsonValue::from("hi"));
    }

    #[test]
    fn test_parse_escapes() {
        assert_eq!(
            parse_ok(r#""a\"b\\c\/d\b\f\n\r\t""#),
            JsonValue::from("a\"b\\c/d\u{8}\u{c}\n\r\t")
        );
        assert_eq!(parse_ok(r#""\u0041\u00e9""#), JsonValue::from("Aé"));
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(parse_ok(r#""\ud83d\ude00""#), JsonValue::from("😀"));
        assert!(parse(r#""\ud83d""#).is_err());
        assert!(parse(r#""\ude00""#).is_err());
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(parse_ok("\"héllo wörld\""), JsonValue::from("héllo wörld"));
    }

    #[test]
    fn test_truncated_unicode_escape() {
        assert!(parse(r#""\u00"#).is_err());
        assert!(parse(r#""\u00zz""#).is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse(r#""abc"#).unwrap_err();
        assert!(matches!(err, FeatherError::Syntax { .. }));
    }

    #[test]
    fn test_object_missing_value() {
        assert!(parse(r#"{"a":}"#).is_err());
    }

    #[test]
    fn test_object_missing_colon() {
        assert!(parse(r#"{"a" 1}"#).is_err());
    }

    #[test]
    fn test_unterminated_containers() {
        assert!(parse("[1, 2").is_err());
        assert!(parse(r#"{"a": 1"#).is_err());
    }

    #[test]
    fn test_comma_leniency() {
        assert_eq!(
            parse_ok("[,1,,2,]"),
            JsonValue::Array(vec![JsonValue::Number(1.0), JsonValue::Number(2.0)])
        );
        assert_eq!(parse_ok(r#"{,"a":1,}"#).get("a"), Some(&JsonValue::Number(1.0)));
    }

    #[test]
    fn test_trailing_content_ignored() {
        assert_eq!(parse_ok("[1] trailing"), JsonValue::Array(vec![JsonValue::Number(1.0)]));
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        let value = parse_ok(r#"{"a":1,"b":2,"a":3}"#);
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&JsonValue::Number(3.0)));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(parse("-").is_err());
        assert!(parse("1-2").is_err());
        assert!(parse("1e999").is_err());
    }

    #[test]
    fn test_error_offset() {
        match parse(r#"{"a": @}"#).unwrap_err() {
            FeatherError::Syntax { offset, .. } => assert_eq!(offset, 6),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1);
        assert!(parse(&deep).is_err());
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&ok).is_ok());
    }
}
