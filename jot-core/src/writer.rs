//! Writers: a compact writer, two styled writers, and the builder-driven
//! stream writer, all sharing one scalar-formatting core.

use std::fmt;
use std::io;

use crate::types::{CommentPlacement, Value, ValueKind};

/// Inline arrays must fit under this many columns.
const RIGHT_MARGIN: usize = 74;
/// Inline arrays may hold at most this many elements.
const MAX_INLINE_ELEMENTS: usize = 20;

// =============================================================================
// Scalar formatting
// =============================================================================

/// How `precision` counts digits when rendering Reals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecisionType {
    /// Significant digits across the whole number.
    #[default]
    Significant,
    /// Digits after the decimal point.
    Decimal,
}

pub(crate) const DEFAULT_PRECISION: usize = 17;

/// Shortest decimal that round-trips, with `.0` appended when nothing else
/// marks the result as a Real.
pub(crate) fn shortest_real(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let name = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return name.to_string();
    }
    let mut s = value.to_string();
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}

/// Render a Real under the chosen precision mode. Trailing zeros are
/// stripped, exponents keep a sign and lose leading zeros, and integral
/// results gain a `.0` so they re-parse as Reals.
pub(crate) fn format_real(
    value: f64,
    use_special_floats: bool,
    precision: usize,
    precision_type: PrecisionType,
) -> String {
    if value.is_nan() {
        let name = if use_special_floats { "NaN" } else { "null" };
        return name.to_string();
    }
    if value.is_infinite() {
        let name = if !use_special_floats {
            "null"
        } else if value > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        return name.to_string();
    }

    let precision = precision.min(DEFAULT_PRECISION);
    let mut out = match precision_type {
        PrecisionType::Decimal => {
            let mut s = format!("{:.*}", precision, value);
            strip_trailing_zeros(&mut s);
            s
        }
        PrecisionType::Significant => {
            let digits = precision.max(1);
            let sci = format!("{:.*e}", digits - 1, value);
            let e = sci.find('e').expect("exponent marker");
            let exponent: i32 = sci[e + 1..].parse().expect("exponent digits");
            if exponent < -4 || exponent >= digits as i32 {
                let mut mantissa = sci[..e].to_string();
                strip_trailing_zeros(&mut mantissa);
                let sign = if exponent < 0 { "" } else { "+" };
                format!("{}e{}{}", mantissa, sign, exponent)
            } else {
                let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
                let mut s = format!("{:.*}", decimals, value);
                strip_trailing_zeros(&mut s);
                s
            }
        }
    };
    if !out.contains('.') && !out.contains('e') {
        out.push_str(".0");
    }
    out
}

/// Drop trailing zeros after a decimal point, and the point itself when
/// nothing is left behind it.
fn strip_trailing_zeros(s: &mut String) {
    if !s.contains('.') {
        return;
    }
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
}

/// Quote and escape a string for JSON output. Control characters always
/// escape; non-ASCII either passes through as UTF-8 or becomes UTF-16
/// escapes, splitting supplementary code points into surrogate pairs.
pub(crate) fn quote_string(s: &str, emit_utf8: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            _ if c.is_ascii() => out.push(c),
            _ if emit_utf8 => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
    out
}

// =============================================================================
// Fast writer
// =============================================================================

/// Compact writer: no insignificant whitespace, one terminating newline.
#[derive(Debug, Default)]
pub struct FastWriter {
    yaml_compatibility: bool,
    drop_null_placeholders: bool,
    omit_ending_newline: bool,
}

impl FastWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a space after `:` so the output doubles as YAML.
    pub fn enable_yaml_compatibility(&mut self) {
        self.yaml_compatibility = true;
    }

    /// Emit nothing for Null values, pairing with the parser's
    /// dropped-null-placeholder option.
    pub fn drop_null_placeholders(&mut self) {
        self.drop_null_placeholders = true;
    }

    pub fn omit_ending_newline(&mut self) {
        self.omit_ending_newline = true;
    }

    pub fn write(&self, root: &Value) -> String {
        let mut out = String::new();
        self.write_value(&mut out, root);
        if !self.omit_ending_newline {
            out.push('\n');
        }
        out
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value.kind() {
            ValueKind::Null => {
                if !self.drop_null_placeholders {
                    out.push_str("null");
                }
            }
            ValueKind::Bool => out.push_str(if value.as_bool().unwrap() { "true" } else { "false" }),
            ValueKind::Int => out.push_str(&value.as_int64().unwrap().to_string()),
            ValueKind::UInt => out.push_str(&value.as_uint64().unwrap().to_string()),
            ValueKind::Real => out.push_str(&format_real(
                value.as_double().unwrap(),
                false,
                DEFAULT_PRECISION,
                PrecisionType::Significant,
            )),
            ValueKind::String => out.push_str(&quote_string(value.as_str().unwrap(), false)),
            ValueKind::Array => {
                out.push('[');
                for (i, entry) in value.entries().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_value(out, entry.value());
                }
                out.push(']');
            }
            ValueKind::Object => {
                out.push('{');
                for (i, entry) in value.entries().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&quote_string(entry.name().unwrap_or(""), false));
                    out.push(':');
                    if self.yaml_compatibility {
                        out.push(' ');
                    }
                    self.write_value(out, entry.value());
                }
                out.push('}');
            }
        }
    }
}

// =============================================================================
// Styled core
// =============================================================================

/// The two comment/indent dialects of the styled writers. `Document` is the
/// string-building flavor (blank line before comments, content-aware
/// indenting); `Stream` is the flavor shared by the stream writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StyleFlavor {
    Document,
    Stream,
}

#[derive(Debug, Clone)]
pub(crate) struct StyledSettings {
    pub indentation: String,
    pub colon: String,
    pub emit_comments: bool,
    pub drop_null_placeholders: bool,
    pub use_special_floats: bool,
    pub emit_utf8: bool,
    pub precision: usize,
    pub precision_type: PrecisionType,
    pub ending_newline: bool,
    pub(crate) flavor: StyleFlavor,
}

impl StyledSettings {
    /// The stream-writer builder defaults: tab indent, comments on, no
    /// trailing newline.
    pub(crate) fn default_built() -> Self {
        Self {
            indentation: "\t".to_string(),
            colon: " : ".to_string(),
            emit_comments: true,
            drop_null_placeholders: false,
            use_special_floats: false,
            emit_utf8: false,
            precision: DEFAULT_PRECISION,
            precision_type: PrecisionType::Significant,
            ending_newline: false,
            flavor: StyleFlavor::Stream,
        }
    }
}

struct StyledPrinter<'a> {
    settings: &'a StyledSettings,
    out: String,
    indent: String,
    indented: bool,
}

impl<'a> StyledPrinter<'a> {
    fn new(settings: &'a StyledSettings) -> Self {
        Self {
            settings,
            out: String::new(),
            indent: String::new(),
            indented: true,
        }
    }

    fn write_root(mut self, root: &Value) -> String {
        self.write_comment_before(root);
        if !self.indented {
            self.write_indent();
        }
        self.indented = true;
        self.write_value(root);
        self.write_comments_after(root);
        if self.settings.ending_newline {
            self.out.push('\n');
        }
        self.out
    }

    // -------------------------------------------------------------------------
    // Layout plumbing
    // -------------------------------------------------------------------------

    fn write_indent(&mut self) {
        match self.settings.flavor {
            StyleFlavor::Document => {
                if let Some(&last) = self.out.as_bytes().last() {
                    if last == b' ' {
                        return;
                    }
                    if last != b'\n' {
                        self.out.push('\n');
                    }
                }
                self.out.push_str(&self.indent);
            }
            StyleFlavor::Stream => {
                if self.settings.indentation.is_empty() {
                    return;
                }
                self.out.push('\n');
                self.out.push_str(&self.indent);
            }
        }
    }

    fn write_with_indent(&mut self, text: &str) {
        match self.settings.flavor {
            StyleFlavor::Document => self.write_indent(),
            StyleFlavor::Stream => {
                if !self.indented {
                    self.write_indent();
                }
            }
        }
        self.out.push_str(text);
        self.indented = false;
    }

    fn indent_push(&mut self) {
        self.indent.push_str(&self.settings.indentation);
    }

    fn indent_pop(&mut self) {
        let keep = self.indent.len() - self.settings.indentation.len();
        self.indent.truncate(keep);
    }

    /// Append comment text, re-indenting its interior line breaks.
    fn push_comment_text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.out.push('\n');
                self.out.push_str(&self.indent);
            }
            self.out.push_str(line);
        }
    }

    fn write_comment_before(&mut self, value: &Value) {
        if !self.settings.emit_comments {
            return;
        }
        let Some(text) = value.comment(CommentPlacement::Before) else {
            return;
        };
        match self.settings.flavor {
            StyleFlavor::Document => {
                self.out.push('\n');
                self.write_indent();
                self.push_comment_text(text);
                self.out.push('\n');
            }
            StyleFlavor::Stream => {
                if !self.indented {
                    self.write_indent();
                }
                self.push_comment_text(text);
                self.indented = false;
            }
        }
    }

    fn write_comments_after(&mut self, value: &Value) {
        if !self.settings.emit_comments {
            return;
        }
        if let Some(text) = value.comment(CommentPlacement::AfterOnSameLine) {
            self.out.push(' ');
            self.out.push_str(text);
        }
        if let Some(text) = value.comment(CommentPlacement::After) {
            match self.settings.flavor {
                StyleFlavor::Document => {
                    self.out.push('\n');
                    self.push_comment_text(text);
                    self.out.push('\n');
                }
                StyleFlavor::Stream => {
                    self.write_indent();
                    self.push_comment_text(text);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    fn render_scalar(&self, value: &Value) -> String {
        match value.kind() {
            ValueKind::Null => {
                if self.settings.drop_null_placeholders {
                    String::new()
                } else {
                    "null".to_string()
                }
            }
            ValueKind::Bool => {
                let text = if value.as_bool().unwrap() { "true" } else { "false" };
                text.to_string()
            }
            ValueKind::Int => value.as_int64().unwrap().to_string(),
            ValueKind::UInt => value.as_uint64().unwrap().to_string(),
            ValueKind::Real => format_real(
                value.as_double().unwrap(),
                self.settings.use_special_floats,
                self.settings.precision,
                self.settings.precision_type,
            ),
            ValueKind::String => quote_string(value.as_str().unwrap(), self.settings.emit_utf8),
            ValueKind::Array => "[]".to_string(),
            ValueKind::Object => "{}".to_string(),
        }
    }

    fn write_value(&mut self, value: &Value) {
        match value.kind() {
            ValueKind::Array if value.len() > 0 => self.write_array(value),
            ValueKind::Object if value.len() > 0 => self.write_object(value),
            _ => {
                let rendered = self.render_scalar(value);
                self.out.push_str(&rendered);
            }
        }
    }

    fn write_object(&mut self, value: &Value) {
        self.write_with_indent("{");
        self.indent_push();
        let count = value.len();
        for (i, entry) in value.entries().enumerate() {
            let child = entry.value();
            self.write_comment_before(child);
            let key = quote_string(entry.name().unwrap_or(""), self.settings.emit_utf8);
            self.write_with_indent(&key);
            let colon = self.settings.colon.clone();
            self.out.push_str(&colon);
            self.write_value(child);
            if i + 1 < count {
                self.out.push(',');
            }
            self.write_comments_after(child);
        }
        self.indent_pop();
        self.write_with_indent("}");
    }

    fn write_array(&mut self, value: &Value) {
        if let Some(rendered) = self.inline_children(value) {
            let pad = if self.settings.indentation.is_empty() { "" } else { " " };
            let sep = if self.settings.indentation.is_empty() { "," } else { ", " };
            self.out.push('[');
            self.out.push_str(pad);
            self.out.push_str(&rendered.join(sep));
            self.out.push_str(pad);
            self.out.push(']');
            self.indented = false;
        } else {
            self.write_with_indent("[");
            self.indent_push();
            let count = value.len();
            for (i, entry) in value.entries().enumerate() {
                let child = entry.value();
                self.write_comment_before(child);
                match self.settings.flavor {
                    StyleFlavor::Document => self.write_indent(),
                    StyleFlavor::Stream => {
                        if !self.indented {
                            self.write_indent();
                        }
                        self.indented = true;
                    }
                }
                self.write_value(child);
                self.indented = false;
                if i + 1 < count {
                    self.out.push(',');
                }
                self.write_comments_after(child);
            }
            self.indent_pop();
            self.write_with_indent("]");
        }
    }

    /// Render every element for single-line output, or None when the array
    /// must span multiple lines: too many elements, a non-empty composite or
    /// commented child, or a line over the column budget.
    fn inline_children(&self, value: &Value) -> Option<Vec<String>> {
        let count = value.len();
        if count > MAX_INLINE_ELEMENTS {
            return None;
        }
        let mut rendered = Vec::with_capacity(count);
        let mut line_length = 4 + 2 * count.saturating_sub(1);
        for entry in value.entries() {
            let child = entry.value();
            if (child.is_array() || child.is_object()) && child.len() > 0 {
                return None;
            }
            if child.has_comment(CommentPlacement::Before)
                || child.has_comment(CommentPlacement::AfterOnSameLine)
                || child.has_comment(CommentPlacement::After)
            {
                return None;
            }
            let text = self.render_scalar(child);
            line_length += text.len();
            rendered.push(text);
        }
        if line_length >= RIGHT_MARGIN {
            return None;
        }
        Some(rendered)
    }
}

// =============================================================================
// Styled writers
// =============================================================================

/// String-producing styled writer: three-space indent, inline short arrays,
/// terminating newline.
#[derive(Debug, Default)]
pub struct StyledWriter;

impl StyledWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, root: &Value) -> String {
        let settings = StyledSettings {
            indentation: "   ".to_string(),
            colon: " : ".to_string(),
            ending_newline: true,
            flavor: StyleFlavor::Document,
            ..StyledSettings::default_built()
        };
        StyledPrinter::new(&settings).write_root(root)
    }
}

/// Stream-producing styled writer with a configurable indent string.
#[derive(Debug)]
pub struct StyledStreamWriter {
    indentation: String,
}

impl Default for StyledStreamWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StyledStreamWriter {
    pub fn new() -> Self {
        Self::with_indentation("\t")
    }

    pub fn with_indentation(indentation: impl Into<String>) -> Self {
        Self {
            indentation: indentation.into(),
        }
    }

    pub fn write<W: io::Write>(&self, root: &Value, sink: &mut W) -> io::Result<()> {
        let settings = StyledSettings {
            indentation: self.indentation.clone(),
            ending_newline: true,
            ..StyledSettings::default_built()
        };
        let out = StyledPrinter::new(&settings).write_root(root);
        sink.write_all(out.as_bytes())
    }
}

/// Writer produced by [`crate::WriterBuilder`]; every knob comes from the
/// builder's configuration.
#[derive(Debug)]
pub struct StreamWriter {
    pub(crate) settings: StyledSettings,
}

impl StreamWriter {
    pub fn write<W: io::Write>(&self, root: &Value, sink: &mut W) -> io::Result<()> {
        sink.write_all(self.write_to_string(root).as_bytes())
    }

    pub(crate) fn write_to_string(&self, root: &Value) -> String {
        StyledPrinter::new(&self.settings).write_root(root)
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Value {
    /// The builder-default styled form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = StyledSettings::default_built();
        f.write_str(&StyledPrinter::new(&settings).write_root(self))
    }
}

impl Value {
    /// The builder-default styled form wrapped in newlines, with a leading
    /// blank line when a before-comment is attached.
    pub fn to_styled_string(&self) -> String {
        let mut out = String::new();
        if self.has_comment(CommentPlacement::Before) {
            out.push('\n');
        }
        out.push_str(&self.to_string());
        out.push('\n');
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
