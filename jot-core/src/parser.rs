//! Recursive-descent JSON parser.
//!
//! The parser consumes a token stream from [`crate::lexer::Lexer`], builds a
//! [`Value`] tree carrying byte offsets, collects structured errors instead
//! of failing fast, and attaches comments to the values they belong to.

use std::collections::HashMap;
use std::fmt;

use crate::lexer::{LexOptions, Lexer, Token, TokenKind};
use crate::types::{CommentPlacement, Value, ValueKind};

// =============================================================================
// Options
// =============================================================================

/// Dialect switches for the parser. The defaults accept comments and
/// trailing commas; [`ParserOptions::strict`] turns all leniency off.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub collect_comments: bool,
    pub allow_comments: bool,
    pub allow_trailing_commas: bool,
    pub strict_root: bool,
    pub allow_dropped_null_placeholders: bool,
    pub allow_numeric_keys: bool,
    pub allow_single_quotes: bool,
    pub stack_limit: usize,
    pub fail_if_extra: bool,
    pub reject_dup_keys: bool,
    pub allow_special_floats: bool,
    pub skip_bom: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            collect_comments: true,
            allow_comments: true,
            allow_trailing_commas: true,
            strict_root: false,
            allow_dropped_null_placeholders: false,
            allow_numeric_keys: false,
            allow_single_quotes: false,
            stack_limit: 1000,
            fail_if_extra: false,
            reject_dup_keys: false,
            allow_special_floats: false,
            skip_bom: true,
        }
    }
}

impl ParserOptions {
    /// The strict preset: plain JSON only, array or object root, no extra
    /// content, duplicate keys rejected. Special float literals stay enabled.
    pub fn strict() -> Self {
        Self {
            allow_comments: false,
            allow_trailing_commas: false,
            strict_root: true,
            allow_dropped_null_placeholders: false,
            allow_numeric_keys: false,
            allow_single_quotes: false,
            fail_if_extra: true,
            reject_dup_keys: true,
            allow_special_floats: true,
            ..Self::default()
        }
    }

    fn lex_options(&self) -> LexOptions {
        LexOptions {
            allow_comments: self.allow_comments,
            allow_single_quotes: self.allow_single_quotes,
            allow_special_floats: self.allow_special_floats,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// One structured parse error. Offsets index the input byte stream; `extra`
/// points at a detail position inside the offending lexeme when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub offset_start: usize,
    pub offset_limit: usize,
    pub extra: Option<usize>,
}

/// A failed parse: every recorded error plus whatever partial tree was built
/// before the failure.
#[derive(Debug)]
pub struct ParseFailure {
    pub root: Value,
    pub errors: Vec<ParseError>,
    document: String,
}

impl ParseFailure {
    /// The human-readable `* Line L, Column C` rendering of every error.
    pub fn formatted_errors(&self) -> String {
        format_errors(&self.document, &self.errors)
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_errors())
    }
}

impl std::error::Error for ParseFailure {}

fn format_errors(document: &str, errors: &[ParseError]) -> String {
    let mut out = String::new();
    for error in errors {
        let (line, column) = line_and_column(document, error.offset_start);
        out.push_str(&format!(
            "* Line {}, Column {}\n  {}\n",
            line, column, error.message
        ));
        if let Some(extra) = error.extra {
            let (line, column) = line_and_column(document, extra);
            out.push_str(&format!("See Line {}, Column {} for detail.\n", line, column));
        }
    }
    out
}

/// 1-based line and column for a byte offset. Columns count bytes, so
/// multi-byte characters widen the reported column.
fn line_and_column(document: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(document.len());
    let bytes = document.as_bytes();
    let mut line = 1;
    let mut line_start = 0;
    let mut i = 0;
    while i < offset {
        match bytes[i] {
            b'\n' => {
                line += 1;
                line_start = i + 1;
            }
            b'\r' => {
                if bytes.get(i + 1) != Some(&b'\n') {
                    line += 1;
                    line_start = i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    (line, offset - line_start + 1)
}

// =============================================================================
// Parser
// =============================================================================

/// Reusable parser instance. Errors from the last `parse` call stay
/// available for [`Parser::formatted_errors`] and can be extended with
/// semantic errors through [`Parser::push_error`].
pub struct Parser {
    opts: ParserOptions,
    document: String,
    errors: Vec<ParseError>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(opts: ParserOptions) -> Self {
        Self {
            opts,
            document: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.opts
    }

    /// Parse a complete document. On failure the returned [`ParseFailure`]
    /// still holds the partial tree built up to the error.
    pub fn parse(&mut self, document: &str) -> Result<Value, ParseFailure> {
        let doc = if self.opts.skip_bom {
            document.strip_prefix('\u{feff}').unwrap_or(document)
        } else {
            document
        };
        self.document = doc.to_string();

        let tokens = Lexer::new(doc, self.opts.lex_options()).tokenize();
        let mut run = Run {
            doc,
            opts: &self.opts,
            tokens,
            pos: 0,
            errors: Vec::new(),
            comments: Vec::new(),
        };
        let (mut root, _ok) = run.parse_document();
        if self.opts.collect_comments && self.opts.allow_comments {
            attach_comments(&mut root, &run.comments, doc);
        }
        self.errors = run.errors;

        if self.errors.is_empty() {
            Ok(root)
        } else {
            Err(ParseFailure {
                root,
                errors: self.errors.clone(),
                document: doc.to_string(),
            })
        }
    }

    pub fn structured_errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn formatted_errors(&self) -> String {
        format_errors(&self.document, &self.errors)
    }

    /// Record a semantic error anchored at a parsed value's offsets. Returns
    /// false when the value does not point into the last parsed document.
    pub fn push_error(&mut self, node: &Value, message: impl Into<String>) -> bool {
        self.push_error_inner(node, message.into(), None)
    }

    /// Like [`Parser::push_error`], with a second value marking the detail
    /// position reported in the `See Line …` trailer.
    pub fn push_error_with_detail(
        &mut self,
        node: &Value,
        message: impl Into<String>,
        detail: &Value,
    ) -> bool {
        self.push_error_inner(node, message.into(), Some(detail.offset_start()))
    }

    fn push_error_inner(&mut self, node: &Value, message: String, extra: Option<usize>) -> bool {
        let len = self.document.len();
        if node.offset_start() > len || node.offset_limit() > len {
            return false;
        }
        if extra.is_some_and(|offset| offset > len) {
            return false;
        }
        self.errors.push(ParseError {
            message,
            offset_start: node.offset_start(),
            offset_limit: node.offset_limit(),
            extra,
        });
        true
    }
}

// =============================================================================
// One parse run
// =============================================================================

struct Run<'a> {
    doc: &'a str,
    opts: &'a ParserOptions,
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
    /// Comment token spans, in input order.
    comments: Vec<(usize, usize)>,
}

impl<'a> Run<'a> {
    fn parse_document(&mut self) -> (Value, bool) {
        let (root, mut ok) = self.read_value(0);
        // Trailing comments are consumed (and collected) before deciding
        // whether anything follows the root.
        let tok = self.next_non_comment();
        if ok && self.opts.strict_root && !(root.is_array() || root.is_object()) {
            // Root-shape enforcement wins over the extra-content check; when
            // it fires it is the only error reported.
            self.errors.push(ParseError {
                message: "A valid JSON document must be either an array or an object value."
                    .to_string(),
                offset_start: 0,
                offset_limit: self.doc.len(),
                extra: None,
            });
            ok = false;
        } else if self.opts.fail_if_extra
            && tok.kind != TokenKind::Eof
            && tok.kind != TokenKind::Error
        {
            self.add_error("Extra non-whitespace after JSON value.", tok);
            ok = false;
        }
        (root, ok)
    }

    // -------------------------------------------------------------------------
    // Token plumbing
    // -------------------------------------------------------------------------

    fn raw_next(&mut self) -> Token {
        let tok = self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Next non-comment token, collecting any comments passed over.
    fn next_non_comment(&mut self) -> Token {
        loop {
            let tok = self.raw_next();
            if tok.kind == TokenKind::Comment {
                if self.opts.collect_comments {
                    self.comments.push((tok.start, tok.limit));
                }
                continue;
            }
            return tok;
        }
    }

    /// Next non-comment token without consuming anything.
    fn peek_non_comment(&self) -> Token {
        let mut i = self.pos;
        while self.tokens[i].kind == TokenKind::Comment {
            i += 1;
        }
        self.tokens[i]
    }

    fn add_error(&mut self, message: &str, tok: Token) {
        self.add_error_extra(message, tok, None);
    }

    fn add_error_extra(&mut self, message: &str, tok: Token, extra: Option<usize>) {
        self.errors.push(ParseError {
            message: message.to_string(),
            offset_start: tok.start,
            offset_limit: tok.limit,
            extra,
        });
    }

    /// Skip raw tokens until the given closer (or end of input); returns the
    /// byte offset just past the token that stopped the skip.
    fn recover(&mut self, skip_until: TokenKind) -> usize {
        loop {
            let tok = self.raw_next();
            if tok.kind == skip_until || tok.kind == TokenKind::Eof {
                return tok.limit;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Grammar
    // -------------------------------------------------------------------------

    fn read_value(&mut self, depth: usize) -> (Value, bool) {
        if depth >= self.opts.stack_limit {
            let tok = self.peek_non_comment();
            self.add_error("Exceeded maximum nesting depth.", tok);
            // Nothing sensible can follow; fast-forward to the end.
            self.pos = self.tokens.len() - 1;
            return (Value::null(), false);
        }

        let ahead = self.peek_non_comment();
        if self.opts.allow_dropped_null_placeholders
            && matches!(
                ahead.kind,
                TokenKind::Comma | TokenKind::ObjectEnd | TokenKind::ArrayEnd
            )
        {
            // A separator where a value belongs: leave it unconsumed and
            // materialize the hole as a zero-width Null.
            let mut value = Value::null();
            value.set_offsets(ahead.start, ahead.start);
            return (value, true);
        }

        let tok = self.next_non_comment();
        match tok.kind {
            TokenKind::ObjectBegin => self.read_object(tok, depth),
            TokenKind::ArrayBegin => self.read_array(tok, depth),
            TokenKind::String => self.decode_string_value(tok),
            TokenKind::Number => self.decode_number(tok),
            TokenKind::True | TokenKind::False => {
                let mut value = Value::from(tok.kind == TokenKind::True);
                value.set_offsets(tok.start, tok.limit);
                (value, true)
            }
            TokenKind::Null => {
                let mut value = Value::null();
                value.set_offsets(tok.start, tok.limit);
                (value, true)
            }
            TokenKind::NaN => self.real_token(tok, f64::NAN),
            TokenKind::PosInfinity => self.real_token(tok, f64::INFINITY),
            TokenKind::NegInfinity => self.real_token(tok, f64::NEG_INFINITY),
            _ => {
                self.add_error("Syntax error: value, object or array expected.", tok);
                let mut value = Value::null();
                value.set_offsets(tok.start, tok.limit);
                (value, false)
            }
        }
    }

    fn real_token(&mut self, tok: Token, value: f64) -> (Value, bool) {
        let mut v = Value::from(value);
        v.set_offsets(tok.start, tok.limit);
        (v, true)
    }

    fn read_object(&mut self, open: Token, depth: usize) -> (Value, bool) {
        let mut object = Value::new(ValueKind::Object);
        object.set_offsets(open.start, open.limit);
        let mut first = true;
        loop {
            let tok = self.next_non_comment();
            if tok.kind == TokenKind::ObjectEnd && (first || self.opts.allow_trailing_commas) {
                object.set_offsets(open.start, tok.limit);
                return (object, true);
            }
            first = false;

            let key = match tok.kind {
                TokenKind::String => match self.decode_string(tok) {
                    Ok(key) => key,
                    Err(()) => {
                        let limit = self.recover(TokenKind::ObjectEnd);
                        object.set_offsets(open.start, limit);
                        return (object, false);
                    }
                },
                TokenKind::Number if self.opts.allow_numeric_keys => {
                    self.doc[tok.start..tok.limit].to_string()
                }
                _ => {
                    self.add_error("Missing '}' or object member name", tok);
                    let limit = self.recover(TokenKind::ObjectEnd);
                    object.set_offsets(open.start, limit);
                    return (object, false);
                }
            };

            let colon = self.next_non_comment();
            if colon.kind != TokenKind::Colon {
                self.add_error("Missing ':' after object member name", colon);
                let limit = self.recover(TokenKind::ObjectEnd);
                object.set_offsets(open.start, limit);
                return (object, false);
            }

            if self.opts.reject_dup_keys && object.contains(&key) {
                self.add_error(&format!("Duplicate key: '{}'", key), tok);
                let limit = self.recover(TokenKind::ObjectEnd);
                object.set_offsets(open.start, limit);
                return (object, false);
            }

            let (value, ok) = self.read_value(depth + 1);
            *object.demand(&key) = value;
            if !ok {
                let limit = self.recover(TokenKind::ObjectEnd);
                object.set_offsets(open.start, limit);
                return (object, false);
            }

            let sep = self.next_non_comment();
            match sep.kind {
                TokenKind::Comma => continue,
                TokenKind::ObjectEnd => {
                    object.set_offsets(open.start, sep.limit);
                    return (object, true);
                }
                _ => {
                    self.add_error("Missing ',' or '}' in object declaration", sep);
                    let limit = self.recover(TokenKind::ObjectEnd);
                    object.set_offsets(open.start, limit);
                    return (object, false);
                }
            }
        }
    }

    fn read_array(&mut self, open: Token, depth: usize) -> (Value, bool) {
        let mut array = Value::new(ValueKind::Array);
        array.set_offsets(open.start, open.limit);
        if self.peek_non_comment().kind == TokenKind::ArrayEnd {
            let close = self.next_non_comment();
            array.set_offsets(open.start, close.limit);
            return (array, true);
        }
        loop {
            // A trailing comma ends the array, except when dropped-null
            // placeholders claim it as one more hole.
            if array.len() > 0
                && self.opts.allow_trailing_commas
                && !self.opts.allow_dropped_null_placeholders
                && self.peek_non_comment().kind == TokenKind::ArrayEnd
            {
                let close = self.next_non_comment();
                array.set_offsets(open.start, close.limit);
                return (array, true);
            }

            let (value, ok) = self.read_value(depth + 1);
            array.push(value);
            if !ok {
                let limit = self.recover(TokenKind::ArrayEnd);
                array.set_offsets(open.start, limit);
                return (array, false);
            }

            let sep = self.next_non_comment();
            match sep.kind {
                TokenKind::Comma => continue,
                TokenKind::ArrayEnd => {
                    array.set_offsets(open.start, sep.limit);
                    return (array, true);
                }
                _ => {
                    self.add_error("Missing ',' or ']' in array declaration", sep);
                    let limit = self.recover(TokenKind::ArrayEnd);
                    array.set_offsets(open.start, limit);
                    return (array, false);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lexeme decoding
    // -------------------------------------------------------------------------

    fn decode_string_value(&mut self, tok: Token) -> (Value, bool) {
        match self.decode_string(tok) {
            Ok(s) => {
                let mut value = Value::from(s);
                value.set_offsets(tok.start, tok.limit);
                (value, true)
            }
            Err(()) => {
                let mut value = Value::null();
                value.set_offsets(tok.start, tok.limit);
                (value, false)
            }
        }
    }

    /// Decode the escapes of a string token. Errors span the whole token and
    /// carry the detail position of the offending escape.
    fn decode_string(&mut self, tok: Token) -> Result<String, ()> {
        let raw = &self.doc[tok.start + 1..tok.limit - 1];
        let base = tok.start + 1;
        let mut out = String::with_capacity(raw.len());
        let mut cursor = 0;
        while let Some(found) = raw[cursor..].find('\\') {
            out.push_str(&raw[cursor..cursor + found]);
            let mut i = cursor + found + 1;
            let bytes = raw.as_bytes();
            let Some(&escape) = bytes.get(i) else {
                self.add_error_extra("Bad escape sequence in string", tok, Some(base + i));
                return Err(());
            };
            i += 1;
            match escape {
                b'"' => out.push('"'),
                b'\'' => out.push('\''),
                b'/' => out.push('/'),
                b'\\' => out.push('\\'),
                b'b' => out.push('\u{0008}'),
                b'f' => out.push('\u{000C}'),
                b'n' => out.push('\n'),
                b'r' => out.push('\r'),
                b't' => out.push('\t'),
                b'u' => {
                    let code = self.decode_unicode(tok, raw, base, &mut i)?;
                    out.push(code);
                }
                _ => {
                    self.add_error_extra("Bad escape sequence in string", tok, Some(base + i));
                    return Err(());
                }
            }
            cursor = i;
        }
        out.push_str(&raw[cursor..]);
        Ok(out)
    }

    /// Decode `\uXXXX` (the leading `\u` already consumed), recombining
    /// UTF-16 surrogate pairs into a single code point.
    fn decode_unicode(
        &mut self,
        tok: Token,
        raw: &str,
        base: usize,
        i: &mut usize,
    ) -> Result<char, ()> {
        let unit = self.decode_hex_quad(tok, raw, base, i)?;
        if (0xDC00..=0xDFFF).contains(&unit) {
            self.add_error_extra("invalid unicode surrogate pair", tok, Some(base + *i));
            return Err(());
        }
        let code = if (0xD800..=0xDBFF).contains(&unit) {
            if raw.len() < *i + 6 {
                self.add_error_extra(
                    "additional six characters expected to parse unicode surrogate pair.",
                    tok,
                    Some(base + *i),
                );
                return Err(());
            }
            if &raw.as_bytes()[*i..*i + 2] != b"\\u" {
                self.add_error_extra(
                    "expecting another \\u token to begin the second half of a unicode surrogate pair",
                    tok,
                    Some(base + *i),
                );
                return Err(());
            }
            *i += 2;
            let low = self.decode_hex_quad(tok, raw, base, i)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                self.add_error_extra("invalid unicode surrogate pair", tok, Some(base + *i));
                return Err(());
            }
            0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
        } else {
            unit
        };
        // Surrogates were filtered above, so the code point is valid.
        Ok(char::from_u32(code).expect("validated code point"))
    }

    fn decode_hex_quad(
        &mut self,
        tok: Token,
        raw: &str,
        base: usize,
        i: &mut usize,
    ) -> Result<u32, ()> {
        let bytes = raw.as_bytes();
        if bytes.len() < *i + 4 {
            self.add_error_extra(
                "Bad unicode escape sequence in string: four digits expected.",
                tok,
                Some(base + *i),
            );
            return Err(());
        }
        let quad = &bytes[*i..*i + 4];
        if !quad.iter().all(|b| b.is_ascii_hexdigit()) {
            self.add_error_extra(
                "Bad unicode escape sequence in string: hexadecimal digit expected.",
                tok,
                Some(base + *i),
            );
            return Err(());
        }
        let mut value = 0u32;
        for &b in quad {
            value = value * 16 + (b as char).to_digit(16).expect("hex digit");
        }
        *i += 4;
        Ok(value)
    }

    /// Classify a numeric token: Int when it fits i64 and has no fraction or
    /// exponent, then UInt when it fits u64, otherwise Real.
    fn decode_number(&mut self, tok: Token) -> (Value, bool) {
        let raw = &self.doc[tok.start..tok.limit];
        let integral = !raw.contains(['.', 'e', 'E']);
        let mut value = if integral {
            if let Some(rest) = raw.strip_prefix('-') {
                match rest.parse::<u64>() {
                    Ok(_) => match raw.parse::<i64>() {
                        Ok(i) => Value::from(i),
                        Err(_) => return self.decode_real(tok, raw),
                    },
                    Err(_) => return self.decode_real(tok, raw),
                }
            } else {
                match raw.parse::<u64>() {
                    Ok(u) if u <= i64::MAX as u64 => Value::from(u as i64),
                    Ok(u) => Value::from(u),
                    Err(_) => return self.decode_real(tok, raw),
                }
            }
        } else {
            return self.decode_real(tok, raw);
        };
        value.set_offsets(tok.start, tok.limit);
        (value, true)
    }

    fn decode_real(&mut self, tok: Token, raw: &str) -> (Value, bool) {
        match raw.parse::<f64>() {
            Ok(d) => {
                let mut value = Value::from(d);
                value.set_offsets(tok.start, tok.limit);
                (value, true)
            }
            Err(_) => {
                self.add_error(&format!("'{}' is not a number.", raw), tok);
                let mut value = Value::null();
                value.set_offsets(tok.start, tok.limit);
                (value, false)
            }
        }
    }
}

// =============================================================================
// Comment attachment
// =============================================================================

/// Decide where every collected comment belongs, by offsets:
/// - directly after a value on the same line → attached after-same-line;
/// - otherwise, before the next value that starts later → attached before it;
/// - with no following value → attached after the root.
fn attach_comments(root: &mut Value, comments: &[(usize, usize)], doc: &str) {
    if comments.is_empty() {
        return;
    }
    let mut spans = Vec::new();
    collect_spans(root, &mut spans);
    let mut limits: Vec<(usize, usize)> = spans.iter().map(|&(s, l)| (l, s)).collect();
    limits.sort_unstable();
    let mut starts: Vec<(usize, usize)> = spans;
    starts.sort_unstable();

    let mut before: HashMap<(usize, usize), Vec<String>> = HashMap::new();
    let mut same_line: HashMap<(usize, usize), String> = HashMap::new();
    let mut root_after: Vec<String> = Vec::new();

    for &(cs, ce) in comments {
        let text = normalize_eol(&doc[cs..ce]);
        let prev = limits
            .partition_point(|&(limit, _)| limit <= cs)
            .checked_sub(1)
            .map(|i| limits[i]);
        let attaches_same_line = !text.contains('\n')
            && prev.is_some_and(|(limit, _)| !doc[limit..cs].contains('\n'));
        if attaches_same_line {
            let (limit, start) = prev.expect("checked above");
            same_line.insert((start, limit), text);
        } else {
            let idx = starts.partition_point(|&(start, _)| start < cs);
            match starts.get(idx) {
                Some(&key) => before.entry(key).or_default().push(text),
                None => root_after.push(text),
            }
        }
    }

    if !root_after.is_empty() {
        root.set_comment(root_after.join("\n"), CommentPlacement::After);
    }
    apply_comments(root, &mut before, &mut same_line);
}

fn collect_spans(value: &Value, out: &mut Vec<(usize, usize)>) {
    out.push((value.offset_start(), value.offset_limit()));
    for entry in value.entries() {
        collect_spans(entry.value(), out);
    }
}

fn apply_comments(
    value: &mut Value,
    before: &mut HashMap<(usize, usize), Vec<String>>,
    same_line: &mut HashMap<(usize, usize), String>,
) {
    let key = (value.offset_start(), value.offset_limit());
    if let Some(texts) = before.remove(&key) {
        value.set_comment(texts.join("\n"), CommentPlacement::Before);
    }
    if let Some(text) = same_line.remove(&key) {
        value.set_comment(text, CommentPlacement::AfterOnSameLine);
    }
    for entry in value.entries_mut() {
        apply_comments(entry.value, before, same_line);
    }
}

fn normalize_eol(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// =============================================================================
// Tests
// =============================================================================
