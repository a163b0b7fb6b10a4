//! Lexer for JSON text.
//!
//! Tokens carry byte spans into the source instead of decoded payloads;
//! string and number decoding happens in the parser so that diagnostics can
//! point at the whole lexeme. The lexer itself never fails: anything it
//! cannot recognize becomes an `Error` token for the grammar to report.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    Colon,
    Comma,
    /// Quoted string, span includes the quotes.
    String,
    /// Numeric literal, undecoded.
    Number,
    True,
    False,
    Null,
    /// `NaN` (only produced when special floats are allowed).
    NaN,
    /// `Infinity` or `+Infinity`.
    PosInfinity,
    /// `-Infinity`.
    NegInfinity,
    /// `//…` or `/*…*/` (only produced when comments are allowed).
    Comment,
    /// Unrecognized input.
    Error,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub limit: usize,
}

/// The lexical subset of the parser options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    pub allow_comments: bool,
    pub allow_single_quotes: bool,
    pub allow_special_floats: bool,
}

pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    opts: LexOptions,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, opts: LexOptions) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            opts,
        }
    }

    /// Tokenize the whole input; the last token is always `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return self.token(TokenKind::Eof, start),
        };

        let simple = match c {
            b'{' => Some(TokenKind::ObjectBegin),
            b'}' => Some(TokenKind::ObjectEnd),
            b'[' => Some(TokenKind::ArrayBegin),
            b']' => Some(TokenKind::ArrayEnd),
            b':' => Some(TokenKind::Colon),
            b',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = simple {
            self.pos += 1;
            return self.token(kind, start);
        }

        match c {
            b'"' => self.read_string(start, b'"'),
            b'\'' if self.opts.allow_single_quotes => self.read_string(start, b'\''),
            b'/' if self.opts.allow_comments => self.read_comment(start),
            b'0'..=b'9' => {
                self.read_number();
                self.token(TokenKind::Number, start)
            }
            b'-' => {
                if self.opts.allow_special_floats && self.rest_starts_with(1, b"Infinity") {
                    self.pos += 1 + b"Infinity".len();
                    self.token(TokenKind::NegInfinity, start)
                } else {
                    self.read_number();
                    self.token(TokenKind::Number, start)
                }
            }
            b'+' if self.opts.allow_special_floats && self.rest_starts_with(1, b"Infinity") => {
                self.pos += 1 + b"Infinity".len();
                self.token(TokenKind::PosInfinity, start)
            }
            b'I' if self.opts.allow_special_floats => {
                self.keyword(start, b"Infinity", TokenKind::PosInfinity)
            }
            b'N' if self.opts.allow_special_floats => {
                self.keyword(start, b"NaN", TokenKind::NaN)
            }
            b't' => self.keyword(start, b"true", TokenKind::True),
            b'f' => self.keyword(start, b"false", TokenKind::False),
            b'n' => self.keyword(start, b"null", TokenKind::Null),
            _ => {
                self.pos += 1;
                self.token(TokenKind::Error, start)
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            limit: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn rest_starts_with(&self, offset: usize, pattern: &[u8]) -> bool {
        self.input[self.pos..]
            .get(offset..offset + pattern.len())
            .is_some_and(|s| s == pattern)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Consume an exact keyword or produce a one-byte error token.
    fn keyword(&mut self, start: usize, word: &[u8], kind: TokenKind) -> Token {
        if self.rest_starts_with(0, word) {
            self.pos += word.len();
            self.token(kind, start)
        } else {
            self.pos += 1;
            self.token(TokenKind::Error, start)
        }
    }

    /// Span a quoted string without decoding escapes. Multi-byte UTF-8 passes
    /// through untouched (no continuation byte collides with the delimiters).
    fn read_string(&mut self, start: usize, quote: u8) -> Token {
        self.pos += 1;
        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.pos += if self.peek_at(1).is_some() { 2 } else { 1 };
            } else if c == quote {
                self.pos += 1;
                return self.token(TokenKind::String, start);
            } else {
                self.pos += 1;
            }
        }
        // Unterminated: the grammar reports it.
        self.token(TokenKind::Error, start)
    }

    /// integral [ '.' digits ] [ ('e'|'E') ['+'|'-'] digits ]
    fn read_number(&mut self) {
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        self.digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.digits();
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            self.digits();
        }
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    /// `//` to end of line (newline excluded) or `/* … */` (non-nesting).
    fn read_comment(&mut self, start: usize) -> Token {
        match self.peek_at(1) {
            Some(b'/') => {
                self.pos += 2;
                while let Some(c) = self.peek() {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
                self.token(TokenKind::Comment, start)
            }
            Some(b'*') => {
                self.pos += 2;
                while self.pos < self.input.len() {
                    if self.rest_starts_with(0, b"*/") {
                        self.pos += 2;
                        return self.token(TokenKind::Comment, start);
                    }
                    self.pos += 1;
                }
                self.token(TokenKind::Error, start)
            }
            _ => {
                self.pos += 1;
                self.token(TokenKind::Error, start)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str, opts: LexOptions) -> Vec<TokenKind> {
        Lexer::new(input, opts)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn default_kinds(input: &str) -> Vec<TokenKind> {
        kinds(
            input,
            LexOptions {
                allow_comments: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_punctuation_and_literals() {
        use TokenKind::*;
        assert_eq!(
            default_kinds("{ \"a\" : [1, true, false, null] }"),
            vec![
                ObjectBegin,
                String,
                Colon,
                ArrayBegin,
                Number,
                Comma,
                True,
                Comma,
                False,
                Comma,
                Null,
                ArrayEnd,
                ObjectEnd,
                Eof
            ]
        );
    }

    #[test]
    fn test_string_spans_include_quotes() {
        let tokens = Lexer::new(r#" "hi" "#, LexOptions::default()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!((tokens[0].start, tokens[0].limit), (1, 5));
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        let tokens = Lexer::new(r#""a\"b""#, LexOptions::default()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].limit, 6);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let tokens = Lexer::new(r#""abc"#, LexOptions::default()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn test_number_shapes() {
        for input in ["0", "-12", "3.25", "-6.2e+15", "1E-5", "12.01"] {
            let tokens = Lexer::new(input, LexOptions::default()).tokenize();
            assert_eq!(tokens[0].kind, TokenKind::Number, "{}", input);
            assert_eq!(tokens[0].limit, input.len(), "{}", input);
        }
    }

    #[test]
    fn test_lone_minus_is_a_number_token() {
        // Classification is the decoder's job; the span is the lexer's.
        let tokens = Lexer::new("-", LexOptions::default()).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Number);
    }

    #[test]
    fn test_single_quotes_gated() {
        assert_eq!(
            kinds("'a'", LexOptions::default())[0],
            TokenKind::Error
        );
        let opts = LexOptions {
            allow_single_quotes: true,
            ..Default::default()
        };
        assert_eq!(kinds("'a'", opts)[0], TokenKind::String);
    }

    #[test]
    fn test_comments_gated() {
        assert_eq!(kinds("// x", LexOptions::default())[0], TokenKind::Error);
        assert_eq!(default_kinds("// x")[0], TokenKind::Comment);
        assert_eq!(default_kinds("/* x */ 1"), vec![
            TokenKind::Comment,
            TokenKind::Number,
            TokenKind::Eof
        ]);
    }

    #[test]
    fn test_line_comment_excludes_newline() {
        let tokens = Lexer::new(
            "//c\n1",
            LexOptions {
                allow_comments: true,
                ..Default::default()
            },
        )
        .tokenize();
        assert_eq!((tokens[0].start, tokens[0].limit), (0, 3));
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn test_unterminated_block_comment_is_error() {
        assert_eq!(default_kinds("/* open")[0], TokenKind::Error);
    }

    #[test]
    fn test_special_floats_gated() {
        use TokenKind::*;
        let opts = LexOptions {
            allow_special_floats: true,
            ..Default::default()
        };
        assert_eq!(kinds("NaN", opts)[0], NaN);
        assert_eq!(kinds("Infinity", opts)[0], PosInfinity);
        assert_eq!(kinds("+Infinity", opts)[0], PosInfinity);
        assert_eq!(kinds("-Infinity", opts)[0], NegInfinity);
        // Off by default.
        assert_eq!(kinds("NaN", LexOptions::default())[0], Error);
        assert_eq!(kinds("Infinity", LexOptions::default())[0], Error);
    }

    #[test]
    fn test_partial_keywords_become_errors() {
        assert_eq!(default_kinds("tru")[0], TokenKind::Error);
        assert_eq!(default_kinds("nul")[0], TokenKind::Error);
        let opts = LexOptions {
            allow_special_floats: true,
            ..Default::default()
        };
        assert_eq!(kinds("nfinity", opts)[0], TokenKind::Error);
    }

    #[test]
    fn test_number_then_garbage_splits() {
        // "0Infinity" must not lex as one token; the grammar rejects the pair.
        let opts = LexOptions {
            allow_special_floats: true,
            ..Default::default()
        };
        let got = kinds("0Infinity", opts);
        assert_eq!(
            got,
            vec![TokenKind::Number, TokenKind::PosInfinity, TokenKind::Eof]
        );
    }
}
