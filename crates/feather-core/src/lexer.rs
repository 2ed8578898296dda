//! JSON lexer -- classifies the next token in a character buffer.
//!
//! The lexer only recognises token *kinds*. For strings and numbers it
//! reports where one starts ([`Token::Quote`], [`Token::Number`]) and leaves
//! the body to the parser, which reads it straight from the cursor.
//!
//! Whitespace (space, tab, `\n`, `\r` and NUL) is skipped before every token.
//! [`Token::End`] is returned both at end of input and for any character
//! that cannot start a token; callers treat it as the terminal failure
//! signal.

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `"` -- start of a string
    Quote,
    /// A digit or `-` -- start of a number
    Number,
    True,
    False,
    Null,
    /// End of input, an unrecognised character, or a truncated/misspelled keyword
    End,
}

/// Cursor over a JSON document.
///
/// Cloning a lexer copies the cursor, which is how [`Lexer::look_ahead`]
/// inspects the next token without consuming it.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Peek at the current byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consume and return the current byte.
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Borrow `start..end` of the input as text.
    ///
    /// Both bounds must sit next to ASCII bytes the lexer has already
    /// inspected, which keeps them on character boundaries.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.src[start..end]
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r' | b'\0') = self.peek() {
            self.pos += 1;
        }
    }

    /// Return the next token kind without moving the cursor.
    pub fn look_ahead(&self) -> Token {
        self.clone().next_token()
    }

    /// Consume and return the next token.
    ///
    /// Punctuation, the opening quote of a string and the first character of
    /// a number are consumed; keywords are consumed whole. On [`Token::End`]
    /// the cursor stays on the offending character.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let token = match self.peek() {
            None => return Token::End,
            Some(b'{') => Token::LeftBrace,
            Some(b'}') => Token::RightBrace,
            Some(b'[') => Token::LeftBracket,
            Some(b']') => Token::RightBracket,
            Some(b',') => Token::Comma,
            Some(b':') => Token::Colon,
            Some(b'"') => Token::Quote,
            Some(b'-' | b'0'..=b'9') => Token::Number,
            Some(_) => return self.keyword(),
        };
        self.pos += 1;
        token
    }

    /// Match `true`, `false` or `null` at the cursor. The full keyword must
    /// be present; anything shorter or misspelled yields `End`.
    fn keyword(&mut self) -> Token {
        const KEYWORDS: [(&[u8], Token); 3] = [
            (b"false", Token::False),
            (b"true", Token::True),
            (b"null", Token::Null),
        ];
        let rest = &self.bytes[self.pos..];
        for (word, token) in KEYWORDS {
            if rest.starts_with(word) {
                self.pos += word.len();
                return token;
            }
        }
        Token::End
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::End {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            lex("{}[],:"),
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            lex("null true\tfalse"),
            vec![Token::Null, Token::True, Token::False]
        );
    }

    #[test]
    fn test_whitespace_includes_nul() {
        let mut lexer = Lexer::new("\0\r\n \t[");
        assert_eq!(lexer.next_token(), Token::LeftBracket);
        assert_eq!(lexer.position(), 6);
    }

    #[test]
    fn test_string_and_number_starts() {
        let mut lexer = Lexer::new(r#" "a" -1"#);
        assert_eq!(lexer.next_token(), Token::Quote);
        assert_eq!(lexer.position(), 2);

        let mut lexer = Lexer::new("-12");
        assert_eq!(lexer.next_token(), Token::Number);
        assert_eq!(lexer.position(), 1);
    }

    #[test]
    fn test_truncated_keyword_is_end() {
        assert_eq!(Lexer::new("tru").next_token(), Token::End);
        assert_eq!(Lexer::new("nul").next_token(), Token::End);
        assert_eq!(Lexer::new("fals").next_token(), Token::End);
        assert_eq!(Lexer::new("nope").next_token(), Token::End);
    }

    #[test]
    fn test_unrecognised_character_is_end() {
        let mut lexer = Lexer::new("  @");
        assert_eq!(lexer.next_token(), Token::End);
        assert_eq!(lexer.position(), 2);
    }

    #[test]
    fn test_look_ahead_does_not_advance() {
        let lexer = Lexer::new("  true");
        assert_eq!(lexer.look_ahead(), Token::True);
        assert_eq!(lexer.position(), 0);
    }
}
