//! Configuration-driven builders for parsers and writers.
//!
//! A [`Config`] is an ordered name→value map. Builders start from their
//! defaults, take overrides through [`ParserBuilder::set`] /
//! [`WriterBuilder::set`] or the public `settings` map, report unknown names
//! through `validate`, and produce ready-to-use instances with `build`.

use std::io::Read;

use indexmap::IndexMap;

use crate::parser::{Parser, ParserOptions};
use crate::types::{Error, Result, Value};
use crate::writer::{PrecisionType, StreamWriter, StyledSettings, DEFAULT_PRECISION};

/// Ordered mapping from option name to a scalar [`Value`].
pub type Config = IndexMap<String, Value>;

// =============================================================================
// Parser builder
// =============================================================================

const PARSER_KEYS: &[&str] = &[
    "collectComments",
    "allowComments",
    "allowTrailingCommas",
    "strictRoot",
    "allowDroppedNullPlaceholders",
    "allowNumericKeys",
    "allowSingleQuotes",
    "stackLimit",
    "failIfExtra",
    "rejectDupKeys",
    "allowSpecialFloats",
    "skipBom",
];

/// Builds [`Parser`] instances from a [`Config`].
#[derive(Debug, Clone)]
pub struct ParserBuilder {
    pub settings: Config,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBuilder {
    pub fn new() -> Self {
        let mut settings = Config::new();
        Self::set_defaults(&mut settings);
        Self { settings }
    }

    /// Reset `settings` to the lenient defaults.
    pub fn set_defaults(settings: &mut Config) {
        settings.insert("collectComments".to_string(), Value::from(true));
        settings.insert("allowComments".to_string(), Value::from(true));
        settings.insert("allowTrailingCommas".to_string(), Value::from(true));
        settings.insert("strictRoot".to_string(), Value::from(false));
        settings.insert(
            "allowDroppedNullPlaceholders".to_string(),
            Value::from(false),
        );
        settings.insert("allowNumericKeys".to_string(), Value::from(false));
        settings.insert("allowSingleQuotes".to_string(), Value::from(false));
        settings.insert("stackLimit".to_string(), Value::from(1000u32));
        settings.insert("failIfExtra".to_string(), Value::from(false));
        settings.insert("rejectDupKeys".to_string(), Value::from(false));
        settings.insert("allowSpecialFloats".to_string(), Value::from(false));
        settings.insert("skipBom".to_string(), Value::from(true));
    }

    /// Flip `settings` to the strict preset: plain JSON, array/object root,
    /// no extra content, duplicate keys rejected, special float literals on.
    pub fn strict_mode(settings: &mut Config) {
        settings.insert("allowComments".to_string(), Value::from(false));
        settings.insert("allowTrailingCommas".to_string(), Value::from(false));
        settings.insert("strictRoot".to_string(), Value::from(true));
        settings.insert(
            "allowDroppedNullPlaceholders".to_string(),
            Value::from(false),
        );
        settings.insert("allowNumericKeys".to_string(), Value::from(false));
        settings.insert("allowSingleQuotes".to_string(), Value::from(false));
        settings.insert("failIfExtra".to_string(), Value::from(true));
        settings.insert("rejectDupKeys".to_string(), Value::from(true));
        settings.insert("allowSpecialFloats".to_string(), Value::from(true));
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    /// Ok when every setting name is recognized, otherwise the unknown names.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        validate_keys(&self.settings, PARSER_KEYS)
    }

    pub fn build(&self) -> Parser {
        Parser::with_options(self.options())
    }

    fn options(&self) -> ParserOptions {
        let defaults = ParserOptions::default();
        ParserOptions {
            collect_comments: self.flag("collectComments", defaults.collect_comments),
            allow_comments: self.flag("allowComments", defaults.allow_comments),
            allow_trailing_commas: self.flag("allowTrailingCommas", defaults.allow_trailing_commas),
            strict_root: self.flag("strictRoot", defaults.strict_root),
            allow_dropped_null_placeholders: self.flag(
                "allowDroppedNullPlaceholders",
                defaults.allow_dropped_null_placeholders,
            ),
            allow_numeric_keys: self.flag("allowNumericKeys", defaults.allow_numeric_keys),
            allow_single_quotes: self.flag("allowSingleQuotes", defaults.allow_single_quotes),
            stack_limit: self
                .settings
                .get("stackLimit")
                .and_then(|v| v.as_uint64().ok())
                .map(|v| v as usize)
                .unwrap_or(defaults.stack_limit),
            fail_if_extra: self.flag("failIfExtra", defaults.fail_if_extra),
            reject_dup_keys: self.flag("rejectDupKeys", defaults.reject_dup_keys),
            allow_special_floats: self.flag("allowSpecialFloats", defaults.allow_special_floats),
            skip_bom: self.flag("skipBom", defaults.skip_bom),
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.settings
            .get(key)
            .and_then(|v| v.as_bool().ok())
            .unwrap_or(default)
    }
}

// =============================================================================
// Writer builder
// =============================================================================

const WRITER_KEYS: &[&str] = &[
    "indentation",
    "commentStyle",
    "enableYAMLCompatibility",
    "dropNullPlaceholders",
    "useSpecialFloats",
    "emitUTF8",
    "precision",
    "precisionType",
];

/// Builds [`StreamWriter`] instances from a [`Config`].
#[derive(Debug, Clone)]
pub struct WriterBuilder {
    pub settings: Config,
}

impl Default for WriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterBuilder {
    pub fn new() -> Self {
        let mut settings = Config::new();
        Self::set_defaults(&mut settings);
        Self { settings }
    }

    pub fn set_defaults(settings: &mut Config) {
        settings.insert("indentation".to_string(), Value::from("\t"));
        settings.insert("commentStyle".to_string(), Value::from("All"));
        settings.insert("enableYAMLCompatibility".to_string(), Value::from(false));
        settings.insert("dropNullPlaceholders".to_string(), Value::from(false));
        settings.insert("useSpecialFloats".to_string(), Value::from(false));
        settings.insert("emitUTF8".to_string(), Value::from(false));
        settings.insert(
            "precision".to_string(),
            Value::from(DEFAULT_PRECISION as u32),
        );
        settings.insert("precisionType".to_string(), Value::from("significant"));
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }

    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        validate_keys(&self.settings, WRITER_KEYS)
    }

    pub fn build(&self) -> StreamWriter {
        let indentation = self
            .settings
            .get("indentation")
            .and_then(|v| v.as_str().ok())
            .unwrap_or("\t")
            .to_string();
        let yaml = self.flag("enableYAMLCompatibility", false);
        let colon = if yaml {
            ": "
        } else if indentation.is_empty() {
            ":"
        } else {
            " : "
        };
        let emit_comments = self
            .settings
            .get("commentStyle")
            .and_then(|v| v.as_str().ok())
            .map(|style| style != "None")
            .unwrap_or(true);
        let precision_type = match self
            .settings
            .get("precisionType")
            .and_then(|v| v.as_str().ok())
        {
            Some("decimal") => PrecisionType::Decimal,
            _ => PrecisionType::Significant,
        };
        let precision = self
            .settings
            .get("precision")
            .and_then(|v| v.as_uint64().ok())
            .map(|v| (v as usize).min(DEFAULT_PRECISION))
            .unwrap_or(DEFAULT_PRECISION);

        StreamWriter {
            settings: StyledSettings {
                indentation,
                colon: colon.to_string(),
                emit_comments,
                drop_null_placeholders: self.flag("dropNullPlaceholders", false),
                use_special_floats: self.flag("useSpecialFloats", false),
                emit_utf8: self.flag("emitUTF8", false),
                precision,
                precision_type,
                ..StyledSettings::default_built()
            },
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.settings
            .get(key)
            .and_then(|v| v.as_bool().ok())
            .unwrap_or(default)
    }
}

fn validate_keys(settings: &Config, known: &[&str]) -> std::result::Result<(), Vec<String>> {
    let unknown: Vec<String> = settings
        .keys()
        .filter(|key| !known.contains(&key.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(unknown)
    }
}

// =============================================================================
// Convenience entry points
// =============================================================================

/// Buffer a whole stream, then parse it with the builder's options.
pub fn parse_from_read<R: Read>(builder: &ParserBuilder, mut reader: R) -> Result<Value> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let document = String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    let mut parser = builder.build();
    parser.parse(&document).map_err(Error::from)
}

/// Render a value with the builder's options.
pub fn write_string(builder: &WriterBuilder, root: &Value) -> String {
    builder.build().write_to_string(root)
}

// =============================================================================
// Tests
// =============================================================================
