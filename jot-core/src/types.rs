//! Core types for Jot: the polymorphic JSON `Value`, its error type, and
//! ordered iteration over composites.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::io;
use std::ops;

use indexmap::IndexMap;

/// Ordered map type for object members — preserves insertion order.
pub type ObjectMap = IndexMap<String, Value>;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("document is not valid UTF-8")]
    InvalidUtf8,
    #[error("{from:?} value is not convertible to {to:?}")]
    NotConvertible { from: ValueKind, to: ValueKind },
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error(transparent)]
    Parse(#[from] crate::parser::ParseFailure),
}

pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Value Kind
// =============================================================================

/// Tag selecting which payload variant a [`Value`] holds.
///
/// The declaration order doubles as the cross-kind ordering used by
/// [`Value::compare`], so `Null < Int < UInt < Real < String < Bool <
/// Array < Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Null,
    Int,
    UInt,
    Real,
    String,
    Bool,
    Array,
    Object,
}

/// Where a collected comment sits relative to its value when re-emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    /// On its own line(s) before the value.
    Before,
    /// On the same line, after the value.
    AfterOnSameLine,
    /// On the line(s) following the value.
    After,
}

const COMMENT_SLOTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
struct Comments {
    slots: [Option<String>; COMMENT_SLOTS],
}

// =============================================================================
// Value
// =============================================================================

#[derive(Debug, Clone)]
enum ValueData {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Real(f64),
    String(Cow<'static, str>),
    Array(Vec<Value>),
    Object(ObjectMap),
}

/// A JSON value: one of seven kinds, plus attached comments and the byte
/// span of the originating document.
///
/// Values are built from scalars via `From`, parsed with [`crate::Parser`],
/// and grown through [`ops::IndexMut`] the way the original API does it:
///
/// ```
/// use jot::Value;
///
/// let mut root = Value::default();
/// root["answer"] = Value::from(42);
/// root["tags"][0] = Value::from("json");
/// assert_eq!(root["answer"].as_int().unwrap(), 42);
/// assert!(root["missing"].is_null());
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    data: ValueData,
    comments: Option<Box<Comments>>,
    start: usize,
    limit: usize,
}

/// The canonical shared Null. Read-only lookups that miss resolve here, so
/// `&root["nope"]["deeper"]` is always a valid reference. Never mutated.
static NULL_VALUE: Value = Value::null();

impl Value {
    /// The Null value, usable in `const`/`static` position.
    pub const fn null() -> Value {
        Value {
            data: ValueData::Null,
            comments: None,
            start: 0,
            limit: 0,
        }
    }

    /// The process-wide shared Null returned by missing read-only lookups.
    pub fn null_ref() -> &'static Value {
        &NULL_VALUE
    }

    /// A zero value of the given kind: `false`, `0`, `0.0`, `""`, `[]`, `{}`.
    pub fn new(kind: ValueKind) -> Value {
        let data = match kind {
            ValueKind::Null => ValueData::Null,
            ValueKind::Bool => ValueData::Bool(false),
            ValueKind::Int => ValueData::Int(0),
            ValueKind::UInt => ValueData::UInt(0),
            ValueKind::Real => ValueData::Real(0.0),
            ValueKind::String => ValueData::String(Cow::Borrowed("")),
            ValueKind::Array => ValueData::Array(Vec::new()),
            ValueKind::Object => ValueData::Object(ObjectMap::new()),
        };
        Value::from_data(data)
    }

    /// A string value borrowing a `'static` literal instead of copying it.
    pub fn static_str(s: &'static str) -> Value {
        Value::from_data(ValueData::String(Cow::Borrowed(s)))
    }

    fn from_data(data: ValueData) -> Value {
        Value {
            data,
            comments: None,
            start: 0,
            limit: 0,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self.data {
            ValueData::Null => ValueKind::Null,
            ValueData::Bool(_) => ValueKind::Bool,
            ValueData::Int(_) => ValueKind::Int,
            ValueData::UInt(_) => ValueKind::UInt,
            ValueData::Real(_) => ValueKind::Real,
            ValueData::String(_) => ValueKind::String,
            ValueData::Array(_) => ValueKind::Array,
            ValueData::Object(_) => ValueKind::Object,
        }
    }

    // =========================================================================
    // Type queries
    // =========================================================================

    pub fn is_null(&self) -> bool {
        matches!(self.data, ValueData::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.data, ValueData::Bool(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.data, ValueData::String(_))
    }

    /// True when the string payload borrows a static literal.
    pub fn is_static_string(&self) -> bool {
        matches!(self.data, ValueData::String(Cow::Borrowed(_)))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.data, ValueData::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.data, ValueData::Object(_))
    }

    /// True when the payload fits signed 32-bit, whatever the kind.
    pub fn is_int(&self) -> bool {
        match self.data {
            ValueData::Int(i) => i >= i32::MIN as i64 && i <= i32::MAX as i64,
            ValueData::UInt(u) => u <= i32::MAX as u64,
            ValueData::Real(d) => {
                d >= i32::MIN as f64 && d <= i32::MAX as f64 && is_integral(d)
            }
            _ => false,
        }
    }

    /// True when the payload is non-negative and fits unsigned 32-bit.
    pub fn is_uint(&self) -> bool {
        match self.data {
            ValueData::Int(i) => i >= 0 && i <= u32::MAX as i64,
            ValueData::UInt(u) => u <= u32::MAX as u64,
            ValueData::Real(d) => d >= 0.0 && d <= u32::MAX as f64 && is_integral(d),
            _ => false,
        }
    }

    pub fn is_int64(&self) -> bool {
        match self.data {
            ValueData::Int(_) => true,
            ValueData::UInt(u) => u <= i64::MAX as u64,
            // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound.
            ValueData::Real(d) => {
                d >= i64::MIN as f64 && d < i64::MAX as f64 && is_integral(d)
            }
            _ => false,
        }
    }

    pub fn is_uint64(&self) -> bool {
        match self.data {
            ValueData::Int(i) => i >= 0,
            ValueData::UInt(_) => true,
            ValueData::Real(d) => d >= 0.0 && d < u64::MAX as f64 && is_integral(d),
            _ => false,
        }
    }

    /// Int, UInt, Bool, or a Real with no fractional part within 64-bit range.
    pub fn is_integral(&self) -> bool {
        match self.data {
            ValueData::Int(_) | ValueData::UInt(_) | ValueData::Bool(_) => true,
            ValueData::Real(d) => {
                d >= i64::MIN as f64 && d < u64::MAX as f64 && is_integral(d)
            }
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.data,
            ValueData::Int(_) | ValueData::UInt(_) | ValueData::Real(_)
        )
    }

    /// True for every numeric kind; `as_double` succeeds exactly when this does.
    pub fn is_double(&self) -> bool {
        self.is_numeric()
    }

    /// Whether a coercion to `target` would succeed.
    ///
    /// Null converts to everything (default-value semantics); anything
    /// empty-like converts to Null; numerics and Bool interconvert when the
    /// payload fits the target range.
    pub fn is_convertible_to(&self, target: ValueKind) -> bool {
        match target {
            ValueKind::Null => match &self.data {
                ValueData::Null => true,
                ValueData::Bool(b) => !b,
                ValueData::Int(i) => *i == 0,
                ValueData::UInt(u) => *u == 0,
                ValueData::Real(d) => *d == 0.0,
                ValueData::String(s) => s.is_empty(),
                ValueData::Array(a) => a.is_empty(),
                ValueData::Object(o) => o.is_empty(),
            },
            ValueKind::Int => match self.data {
                ValueData::Null | ValueData::Bool(_) => true,
                ValueData::Int(i) => i >= i32::MIN as i64 && i <= i32::MAX as i64,
                ValueData::UInt(u) => u <= i32::MAX as u64,
                // Range check only: a fractional Real in range converts (and
                // truncates); it just is not classified by `is_int`.
                ValueData::Real(d) => d >= i32::MIN as f64 && d <= i32::MAX as f64,
                _ => false,
            },
            ValueKind::UInt => match self.data {
                ValueData::Null | ValueData::Bool(_) => true,
                ValueData::Int(i) => i >= 0 && i <= u32::MAX as i64,
                ValueData::UInt(u) => u <= u32::MAX as u64,
                ValueData::Real(d) => d >= 0.0 && d <= u32::MAX as f64,
                _ => false,
            },
            ValueKind::Real | ValueKind::Bool => {
                self.is_null() || self.is_bool() || self.is_numeric()
            }
            ValueKind::String => {
                self.is_null() || self.is_bool() || self.is_numeric() || self.is_string()
            }
            ValueKind::Array => self.is_null() || self.is_array(),
            ValueKind::Object => self.is_null() || self.is_object(),
        }
    }

    // =========================================================================
    // Coercion accessors
    // =========================================================================

    pub fn as_bool(&self) -> Result<bool> {
        match self.data {
            ValueData::Null => Ok(false),
            ValueData::Bool(b) => Ok(b),
            ValueData::Int(i) => Ok(i != 0),
            ValueData::UInt(u) => Ok(u != 0),
            ValueData::Real(d) => Ok(d != 0.0),
            _ => Err(self.not_convertible(ValueKind::Bool)),
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        match self.data {
            ValueData::Null => Ok(0),
            ValueData::Bool(b) => Ok(b as i32),
            ValueData::Int(i) => {
                i32::try_from(i).map_err(|_| out_of_range(i, "Int"))
            }
            ValueData::UInt(u) => {
                i32::try_from(u).map_err(|_| out_of_range(u, "Int"))
            }
            ValueData::Real(d) => {
                if d >= i32::MIN as f64 && d <= i32::MAX as f64 {
                    Ok(d as i32)
                } else {
                    Err(out_of_range(d, "Int"))
                }
            }
            _ => Err(self.not_convertible(ValueKind::Int)),
        }
    }

    pub fn as_uint(&self) -> Result<u32> {
        match self.data {
            ValueData::Null => Ok(0),
            ValueData::Bool(b) => Ok(b as u32),
            ValueData::Int(i) => {
                u32::try_from(i).map_err(|_| out_of_range(i, "UInt"))
            }
            ValueData::UInt(u) => {
                u32::try_from(u).map_err(|_| out_of_range(u, "UInt"))
            }
            ValueData::Real(d) => {
                if d >= 0.0 && d <= u32::MAX as f64 {
                    Ok(d as u32)
                } else {
                    Err(out_of_range(d, "UInt"))
                }
            }
            _ => Err(self.not_convertible(ValueKind::UInt)),
        }
    }

    pub fn as_int64(&self) -> Result<i64> {
        match self.data {
            ValueData::Null => Ok(0),
            ValueData::Bool(b) => Ok(b as i64),
            ValueData::Int(i) => Ok(i),
            ValueData::UInt(u) => {
                i64::try_from(u).map_err(|_| out_of_range(u, "Int64"))
            }
            ValueData::Real(d) => {
                if d >= i64::MIN as f64 && d < i64::MAX as f64 {
                    Ok(d as i64)
                } else {
                    Err(out_of_range(d, "Int64"))
                }
            }
            _ => Err(self.not_convertible(ValueKind::Int)),
        }
    }

    pub fn as_uint64(&self) -> Result<u64> {
        match self.data {
            ValueData::Null => Ok(0),
            ValueData::Bool(b) => Ok(b as u64),
            ValueData::Int(i) => {
                u64::try_from(i).map_err(|_| out_of_range(i, "UInt64"))
            }
            ValueData::UInt(u) => Ok(u),
            ValueData::Real(d) => {
                if d >= 0.0 && d < u64::MAX as f64 {
                    Ok(d as u64)
                } else {
                    Err(out_of_range(d, "UInt64"))
                }
            }
            _ => Err(self.not_convertible(ValueKind::UInt)),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self.data {
            ValueData::Null => Ok(0.0),
            ValueData::Bool(b) => Ok(b as u8 as f64),
            ValueData::Int(i) => Ok(i as f64),
            ValueData::UInt(u) => Ok(u as f64),
            ValueData::Real(d) => Ok(d),
            _ => Err(self.not_convertible(ValueKind::Real)),
        }
    }

    pub fn as_float(&self) -> Result<f32> {
        self.as_double().map(|d| d as f32)
    }

    /// Coerce to a string: Null is empty, Bool is `true`/`false`, integers
    /// print in decimal, Reals in shortest round-trip form with a trailing
    /// `.0` when nothing else marks them as Real.
    pub fn as_string(&self) -> Result<String> {
        match &self.data {
            ValueData::Null => Ok(String::new()),
            ValueData::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            ValueData::Int(i) => Ok(i.to_string()),
            ValueData::UInt(u) => Ok(u.to_string()),
            ValueData::Real(d) => Ok(crate::writer::shortest_real(*d)),
            ValueData::String(s) => Ok(s.clone().into_owned()),
            _ => Err(self.not_convertible(ValueKind::String)),
        }
    }

    /// Borrow the string payload. Unlike [`Value::as_string`] this never
    /// coerces; only String kind succeeds.
    pub fn as_str(&self) -> Result<&str> {
        match &self.data {
            ValueData::String(s) => Ok(s),
            _ => Err(self.not_convertible(ValueKind::String)),
        }
    }

    fn not_convertible(&self, to: ValueKind) -> Error {
        Error::NotConvertible {
            from: self.kind(),
            to,
        }
    }

    // =========================================================================
    // Composite access
    // =========================================================================

    /// Number of children; 0 for every scalar.
    pub fn len(&self) -> usize {
        match &self.data {
            ValueData::Array(a) => a.len(),
            ValueData::Object(o) => o.len(),
            _ => 0,
        }
    }

    /// True for Null and for empty composites; scalars are never empty.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ValueData::Null => true,
            ValueData::Array(a) => a.is_empty(),
            ValueData::Object(o) => o.is_empty(),
            _ => false,
        }
    }

    /// Remove all children.
    ///
    /// # Panics
    /// On scalar kinds other than Null.
    pub fn clear(&mut self) {
        match &mut self.data {
            ValueData::Null => {}
            ValueData::Array(a) => a.clear(),
            ValueData::Object(o) => o.clear(),
            _ => panic!("cannot clear a {:?} value", self.kind()),
        }
    }

    /// Grow or shrink an array; new positions are Null. Null becomes an array.
    ///
    /// # Panics
    /// On kinds other than Null and Array.
    pub fn resize(&mut self, new_len: usize) {
        self.ensure_array("resize");
        if let ValueData::Array(a) = &mut self.data {
            a.resize(new_len, Value::null());
        }
    }

    /// Append to an array. Null becomes a one-element array.
    ///
    /// # Panics
    /// On kinds other than Null and Array.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.ensure_array("push");
        if let ValueData::Array(a) = &mut self.data {
            a.push(value.into());
        }
    }

    /// Insert before `index`, shifting the tail. Returns false (and leaves
    /// the array untouched) when `index > len`.
    ///
    /// # Panics
    /// On kinds other than Null and Array.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> bool {
        self.ensure_array("insert");
        if let ValueData::Array(a) = &mut self.data {
            if index > a.len() {
                return false;
            }
            a.insert(index, value.into());
        }
        true
    }

    /// Remove and return the element at `index`, or None when out of range.
    pub fn remove_index(&mut self, index: usize) -> Option<Value> {
        match &mut self.data {
            ValueData::Array(a) if index < a.len() => Some(a.remove(index)),
            _ => None,
        }
    }

    fn ensure_array(&mut self, op: &str) {
        match self.data {
            ValueData::Null => self.data = ValueData::Array(Vec::new()),
            ValueData::Array(_) => {}
            _ => panic!("cannot {} on a {:?} value", op, self.kind()),
        }
    }

    /// Array element by index, None when out of range or not an array.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match &self.data {
            ValueData::Array(a) => a.get(index),
            _ => None,
        }
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Value> {
        match &mut self.data {
            ValueData::Array(a) => a.get_mut(index),
            _ => None,
        }
    }

    /// Object member by key, None on miss or when not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.data {
            ValueData::Object(o) => o.get(key),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match &mut self.data {
            ValueData::Object(o) => o.get_mut(key),
            _ => None,
        }
    }

    /// Member reference, inserting Null on miss. Null becomes an object.
    ///
    /// # Panics
    /// On kinds other than Null and Object.
    pub fn demand(&mut self, key: &str) -> &mut Value {
        if self.is_null() {
            self.data = ValueData::Object(ObjectMap::new());
        }
        let kind = self.kind();
        match &mut self.data {
            ValueData::Object(o) => o.entry(key.to_string()).or_insert_with(Value::null),
            _ => panic!("cannot demand a member of a {:?} value", kind),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        match &self.data {
            ValueData::Object(o) => o.contains_key(key),
            _ => false,
        }
    }

    /// Remove and return a member; the remaining members keep their order.
    pub fn remove_member(&mut self, key: &str) -> Option<Value> {
        match &mut self.data {
            ValueData::Object(o) => o.shift_remove(key),
            _ => None,
        }
    }

    /// Member names in insertion order; empty for Null.
    ///
    /// # Panics
    /// On kinds other than Null and Object.
    pub fn member_names(&self) -> Vec<&str> {
        match &self.data {
            ValueData::Null => Vec::new(),
            ValueData::Object(o) => o.keys().map(String::as_str).collect(),
            _ => panic!("cannot list members of a {:?} value", self.kind()),
        }
    }

    /// Exchange everything with `other`, comments and offsets included.
    pub fn swap(&mut self, other: &mut Value) {
        std::mem::swap(self, other);
    }

    /// Exchange payloads only; comments and offsets stay where they are.
    pub fn swap_payload(&mut self, other: &mut Value) {
        std::mem::swap(&mut self.data, &mut other.data);
    }

    // =========================================================================
    // Comments and offsets
    // =========================================================================

    /// Attach a comment; any existing comment in that slot is replaced.
    /// `text` must begin with `/`; a trailing newline is trimmed.
    ///
    /// # Panics
    /// When `text` does not start with `/`.
    pub fn set_comment(&mut self, text: impl Into<String>, placement: CommentPlacement) {
        let mut text = text.into();
        assert!(
            text.starts_with('/'),
            "comments must start with '/'"
        );
        while text.ends_with('\n') {
            text.pop();
        }
        self.comments.get_or_insert_with(Default::default).slots[placement as usize] =
            Some(text);
    }

    pub fn has_comment(&self, placement: CommentPlacement) -> bool {
        self.comment(placement).is_some()
    }

    pub fn comment(&self, placement: CommentPlacement) -> Option<&str> {
        self.comments.as_ref()?.slots[placement as usize].as_deref()
    }

    /// Byte offset of the first character of this value in the source
    /// document, delimiters included; 0 when not parsed.
    pub fn offset_start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character; 0 when not parsed.
    pub fn offset_limit(&self) -> usize {
        self.limit
    }

    pub fn set_offsets(&mut self, start: usize, limit: usize) {
        debug_assert!(start <= limit);
        self.start = start;
        self.limit = limit;
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Three-way comparison: kind rank first, then payload. Reals use the
    /// IEEE total order so the result is total even with NaN involved.
    pub fn compare(&self, other: &Value) -> Ordering {
        let (ka, kb) = (self.kind(), other.kind());
        if ka != kb {
            return ka.cmp(&kb);
        }
        match (&self.data, &other.data) {
            (ValueData::Null, ValueData::Null) => Ordering::Equal,
            (ValueData::Bool(a), ValueData::Bool(b)) => a.cmp(b),
            (ValueData::Int(a), ValueData::Int(b)) => a.cmp(b),
            (ValueData::UInt(a), ValueData::UInt(b)) => a.cmp(b),
            (ValueData::Real(a), ValueData::Real(b)) => a.total_cmp(b),
            (ValueData::String(a), ValueData::String(b)) => {
                a.as_bytes().cmp(b.as_bytes())
            }
            (ValueData::Array(a), ValueData::Array(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| {
                    for (x, y) in a.iter().zip(b) {
                        let ord = x.compare(y);
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }
                    Ordering::Equal
                }),
            (ValueData::Object(a), ValueData::Object(b)) => {
                a.len().cmp(&b.len()).then_with(|| compare_objects(a, b))
            }
            _ => unreachable!("kinds already matched"),
        }
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Iterate children in insertion order. Scalars iterate as empty.
    pub fn entries(&self) -> Entries<'_> {
        let inner = match &self.data {
            ValueData::Array(a) => EntriesInner::Array(a.iter().enumerate()),
            ValueData::Object(o) => EntriesInner::Object(o.iter()),
            _ => EntriesInner::Empty,
        };
        Entries { inner }
    }

    /// Mutable variant of [`Value::entries`].
    pub fn entries_mut(&mut self) -> EntriesMut<'_> {
        let inner = match &mut self.data {
            ValueData::Array(a) => EntriesMutInner::Array(a.iter_mut().enumerate()),
            ValueData::Object(o) => EntriesMutInner::Object(o.iter_mut()),
            _ => EntriesMutInner::Empty,
        };
        EntriesMut { inner }
    }
}

/// Sorted key/value comparison; sizes are already known equal.
fn compare_objects(a: &ObjectMap, b: &ObjectMap) -> Ordering {
    let mut keys_a: Vec<&String> = a.keys().collect();
    let mut keys_b: Vec<&String> = b.keys().collect();
    keys_a.sort_unstable();
    keys_b.sort_unstable();
    for (ka, kb) in keys_a.iter().zip(&keys_b) {
        let ord = ka.as_bytes().cmp(kb.as_bytes());
        if ord != Ordering::Equal {
            return ord;
        }
        let ord = a[*ka].compare(&b[*kb]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn is_integral(d: f64) -> bool {
    d.fract() == 0.0
}

fn out_of_range(value: impl ToString, target: &'static str) -> Error {
    Error::OutOfRange {
        value: value.to_string(),
        target,
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

/// Equality over payloads; comments and offsets do not participate.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

// =============================================================================
// Indexing
// =============================================================================

impl ops::Index<usize> for Value {
    type Output = Value;

    /// Out-of-range reads resolve to the canonical Null.
    ///
    /// # Panics
    /// On kinds other than Null and Array.
    fn index(&self, index: usize) -> &Value {
        match &self.data {
            ValueData::Null => &NULL_VALUE,
            ValueData::Array(a) => a.get(index).unwrap_or(&NULL_VALUE),
            _ => panic!("cannot index a {:?} value with an integer", self.kind()),
        }
    }
}

impl ops::IndexMut<usize> for Value {
    /// Writing past the end fills the gap with Null; Null becomes an array.
    fn index_mut(&mut self, index: usize) -> &mut Value {
        self.ensure_array("index");
        if let ValueData::Array(a) = &mut self.data {
            if index >= a.len() {
                a.resize(index + 1, Value::null());
            }
            &mut a[index]
        } else {
            unreachable!()
        }
    }
}

impl ops::Index<&str> for Value {
    type Output = Value;

    /// Missing members resolve to the canonical Null.
    ///
    /// # Panics
    /// On kinds other than Null and Object.
    fn index(&self, key: &str) -> &Value {
        match &self.data {
            ValueData::Null => &NULL_VALUE,
            ValueData::Object(o) => o.get(key).unwrap_or(&NULL_VALUE),
            _ => panic!("cannot index a {:?} value with a key", self.kind()),
        }
    }
}

impl ops::IndexMut<&str> for Value {
    /// Missing members are created as Null; Null becomes an object.
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.demand(key)
    }
}

// =============================================================================
// Conversions into Value
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_data(ValueData::Bool(b))
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(i: $t) -> Self {
                Value::from_data(ValueData::Int(i as i64))
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(u: $t) -> Self {
                Value::from_data(ValueData::UInt(u as u64))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::from_data(ValueData::Real(f as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::from_data(ValueData::Real(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_data(ValueData::String(Cow::Owned(s.to_string())))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from_data(ValueData::String(Cow::Owned(s)))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::from_data(ValueData::Array(v.into_iter().map(Into::into).collect()))
    }
}

impl From<ObjectMap> for Value {
    fn from(m: ObjectMap) -> Self {
        Value::from_data(ValueData::Object(m))
    }
}

// =============================================================================
// Iterators
// =============================================================================

enum EntriesInner<'a> {
    Empty,
    Array(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Object(indexmap::map::Iter<'a, String, Value>),
}

/// Insertion-ordered iterator over the children of a composite.
pub struct Entries<'a> {
    inner: EntriesInner<'a>,
}

/// One child of a composite, with its key.
pub struct Entry<'a> {
    index: Option<usize>,
    name: Option<&'a str>,
    value: &'a Value,
}

impl<'a> Entry<'a> {
    /// The key as a Value: the numeric index for arrays, the string key for
    /// objects.
    pub fn key(&self) -> Value {
        match (self.index, self.name) {
            (Some(i), _) => Value::from(i as u64),
            (_, Some(n)) => Value::from(n),
            _ => Value::null(),
        }
    }

    /// Element index for arrays, None for objects.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Member name for objects, None for arrays.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Entry<'a>> {
        match &mut self.inner {
            EntriesInner::Empty => None,
            EntriesInner::Array(it) => it.next().map(|(i, v)| Entry {
                index: Some(i),
                name: None,
                value: v,
            }),
            EntriesInner::Object(it) => it.next().map(|(k, v)| Entry {
                index: None,
                name: Some(k.as_str()),
                value: v,
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            EntriesInner::Empty => (0, Some(0)),
            EntriesInner::Array(it) => it.size_hint(),
            EntriesInner::Object(it) => it.size_hint(),
        }
    }
}

impl<'a> ExactSizeIterator for Entries<'a> {}

impl<'a> IntoIterator for &'a Value {
    type Item = Entry<'a>;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Entries<'a> {
        self.entries()
    }
}

enum EntriesMutInner<'a> {
    Empty,
    Array(std::iter::Enumerate<std::slice::IterMut<'a, Value>>),
    Object(indexmap::map::IterMut<'a, String, Value>),
}

/// Mutable insertion-ordered iterator over the children of a composite.
pub struct EntriesMut<'a> {
    inner: EntriesMutInner<'a>,
}

/// One mutable child of a composite.
pub struct EntryMut<'a> {
    pub index: Option<usize>,
    pub name: Option<&'a str>,
    pub value: &'a mut Value,
}

impl<'a> Iterator for EntriesMut<'a> {
    type Item = EntryMut<'a>;

    fn next(&mut self) -> Option<EntryMut<'a>> {
        match &mut self.inner {
            EntriesMutInner::Empty => None,
            EntriesMutInner::Array(it) => it.next().map(|(i, v)| EntryMut {
                index: Some(i),
                name: None,
                value: v,
            }),
            EntriesMutInner::Object(it) => it.next().map(|(k, v)| EntryMut {
                index: None,
                name: Some(k.as_str()),
                value: v,
            }),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Construction and kinds
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_zero_values() {
        assert!(Value::new(ValueKind::Null).is_null());
        assert_eq!(Value::new(ValueKind::Bool), Value::from(false));
        assert_eq!(Value::new(ValueKind::Int), Value::from(0));
        assert_eq!(Value::new(ValueKind::UInt), Value::from(0u32));
        assert_eq!(Value::new(ValueKind::Real), Value::from(0.0));
        assert_eq!(Value::new(ValueKind::String), Value::from(""));
        assert_eq!(Value::new(ValueKind::Array).len(), 0);
        assert_eq!(Value::new(ValueKind::Object).len(), 0);
    }

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
        assert_eq!(Value::default(), *Value::null_ref());
    }

    #[test]
    fn test_static_str_borrows() {
        let v = Value::static_str("literal");
        assert!(v.is_static_string());
        assert_eq!(v.as_str().unwrap(), "literal");
        // An owned construction is not static.
        assert!(!Value::from("literal").is_static_string());
        // Copies may keep sharing the pointer.
        assert!(v.clone().is_static_string());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(-3i8).kind(), ValueKind::Int);
        assert_eq!(Value::from(3u16).kind(), ValueKind::UInt);
        assert_eq!(Value::from(1.5f32).kind(), ValueKind::Real);
        assert_eq!(Value::from(vec![1, 2]).len(), 2);
        let mut m = ObjectMap::new();
        m.insert("k".to_string(), Value::from(1));
        assert_eq!(Value::from(m).kind(), ValueKind::Object);
    }

    // -------------------------------------------------------------------------
    // Integer classification at the boundaries
    // -------------------------------------------------------------------------

    #[test]
    fn test_is_int_boundaries() {
        assert!(Value::from(i32::MAX).is_int());
        assert!(Value::from(i32::MIN).is_int());
        assert!(!Value::from(i32::MAX as i64 + 1).is_int());
        assert!(!Value::from(i32::MIN as i64 - 1).is_int());
        assert!(Value::from(i32::MAX as u64).is_int());
        assert!(!Value::from(i32::MAX as u64 + 1).is_int());
        // An integral double in range qualifies regardless of kind.
        assert!(Value::from(1048576.0).is_int());
        assert!(!Value::from(0.5).is_int());
    }

    #[test]
    fn test_is_uint_boundaries() {
        assert!(Value::from(u32::MAX).is_uint());
        assert!(!Value::from(u32::MAX as u64 + 1).is_uint());
        assert!(Value::from(0).is_uint());
        assert!(!Value::from(-1).is_uint());
        assert!(Value::from(4294967295.0).is_uint());
    }

    #[test]
    fn test_is_int64_boundaries() {
        assert!(Value::from(i64::MAX).is_int64());
        assert!(Value::from(i64::MIN).is_int64());
        assert!(Value::from(i64::MAX as u64).is_int64());
        assert!(!Value::from(i64::MAX as u64 + 1).is_int64());
        // 2^63 as a double is exactly one past i64::MAX.
        assert!(!Value::from(9.223372036854776e18).is_int64());
        assert!(Value::from(-9.223372036854776e18).is_int64());
    }

    #[test]
    fn test_is_uint64_boundaries() {
        assert!(Value::from(u64::MAX).is_uint64());
        assert!(!Value::from(-1).is_uint64());
        assert!(Value::from(0).is_uint64());
        assert!(!Value::from(1.8446744073709552e19).is_uint64());
    }

    #[test]
    fn test_is_integral_and_numeric() {
        assert!(Value::from(7).is_integral());
        assert!(Value::from(7u8).is_integral());
        assert!(Value::from(true).is_integral());
        assert!(Value::from(2097152.0).is_integral());
        assert!(!Value::from(0.25).is_integral());
        assert!(!Value::from("7").is_integral());

        for v in [Value::from(1), Value::from(1u32), Value::from(1.0)] {
            assert!(v.is_numeric());
            assert!(v.is_double());
        }
        assert!(!Value::from(true).is_numeric());
    }

    #[test]
    fn test_fraction_below_int32_max_is_uint_convertible_only() {
        let v = Value::from(2147483647.5);
        assert_eq!(v.kind(), ValueKind::Real);
        assert!(!v.is_convertible_to(ValueKind::Int));
        assert!(v.is_convertible_to(ValueKind::UInt));
        assert!(v.as_int().is_err());
        assert_eq!(v.as_uint().unwrap(), 2147483647);
    }

    // -------------------------------------------------------------------------
    // Convertibility
    // -------------------------------------------------------------------------

    #[test]
    fn test_convertible_to_null_means_empty_like() {
        assert!(Value::null().is_convertible_to(ValueKind::Null));
        assert!(Value::from(false).is_convertible_to(ValueKind::Null));
        assert!(Value::from(0).is_convertible_to(ValueKind::Null));
        assert!(Value::from("").is_convertible_to(ValueKind::Null));
        assert!(Value::new(ValueKind::Array).is_convertible_to(ValueKind::Null));
        assert!(!Value::from(true).is_convertible_to(ValueKind::Null));
        assert!(!Value::from("x").is_convertible_to(ValueKind::Null));
    }

    #[test]
    fn test_null_converts_to_everything() {
        for kind in [
            ValueKind::Null,
            ValueKind::Int,
            ValueKind::UInt,
            ValueKind::Real,
            ValueKind::String,
            ValueKind::Bool,
            ValueKind::Array,
            ValueKind::Object,
        ] {
            assert!(Value::null().is_convertible_to(kind), "{:?}", kind);
        }
    }

    #[test]
    fn test_composites_convert_only_to_themselves() {
        let arr = Value::from(vec![1]);
        assert!(arr.is_convertible_to(ValueKind::Array));
        assert!(!arr.is_convertible_to(ValueKind::Object));
        assert!(!arr.is_convertible_to(ValueKind::String));
        let mut obj = Value::default();
        obj["k"] = Value::from(1);
        assert!(obj.is_convertible_to(ValueKind::Object));
        assert!(!obj.is_convertible_to(ValueKind::Array));
    }

    // -------------------------------------------------------------------------
    // Coercions
    // -------------------------------------------------------------------------

    #[test]
    fn test_as_bool() {
        assert!(!Value::null().as_bool().unwrap());
        assert!(Value::from(true).as_bool().unwrap());
        assert!(Value::from(-1).as_bool().unwrap());
        assert!(!Value::from(0u32).as_bool().unwrap());
        assert!(Value::from(0.5).as_bool().unwrap());
        assert!(Value::from("true").as_bool().is_err());
    }

    #[test]
    fn test_as_int_range_errors() {
        assert_eq!(Value::from(i32::MAX).as_int().unwrap(), i32::MAX);
        assert!(Value::from(i32::MAX as i64 + 1).as_int().is_err());
        assert!(Value::from(u64::MAX).as_int().is_err());
        assert!(matches!(
            Value::from(u64::MAX).as_int().unwrap_err(),
            Error::OutOfRange { .. }
        ));
        assert!(matches!(
            Value::from("5").as_int().unwrap_err(),
            Error::NotConvertible { .. }
        ));
    }

    #[test]
    fn test_as_int_truncates_in_range_reals() {
        assert_eq!(Value::from(2.5).as_int().unwrap(), 2);
        assert_eq!(Value::from(-2.5).as_int().unwrap(), -2);
    }

    #[test]
    fn test_as_uint64_rejects_negatives() {
        assert!(Value::from(-1).as_uint64().is_err());
        assert_eq!(Value::from(i64::MAX).as_uint64().unwrap(), i64::MAX as u64);
        assert_eq!(Value::from(u64::MAX).as_uint64().unwrap(), u64::MAX);
    }

    #[test]
    fn test_as_double_and_float() {
        assert_eq!(Value::null().as_double().unwrap(), 0.0);
        assert_eq!(Value::from(true).as_double().unwrap(), 1.0);
        assert_eq!(Value::from(7).as_double().unwrap(), 7.0);
        assert_eq!(Value::from(0.25).as_float().unwrap(), 0.25f32);
        assert!(Value::from("x").as_double().is_err());
    }

    #[test]
    fn test_as_string_coercions() {
        assert_eq!(Value::null().as_string().unwrap(), "");
        assert_eq!(Value::from(true).as_string().unwrap(), "true");
        assert_eq!(Value::from(-42).as_string().unwrap(), "-42");
        assert_eq!(Value::from(17u32).as_string().unwrap(), "17");
        // Integral reals keep a mark of their kind.
        assert_eq!(Value::from(1048576.0).as_string().unwrap(), "1048576.0");
        assert_eq!(Value::from(0.25).as_string().unwrap(), "0.25");
        assert!(Value::from(vec![1]).as_string().is_err());
    }

    #[test]
    fn test_as_str_does_not_coerce() {
        assert_eq!(Value::from("hi").as_str().unwrap(), "hi");
        assert!(Value::from(1).as_str().is_err());
        assert!(Value::null().as_str().is_err());
    }

    #[test]
    fn test_strings_with_embedded_nul() {
        let binary = "h\0i\0";
        let v = Value::from(binary);
        assert_eq!(v.as_str().unwrap().len(), 4);
        assert_eq!(v.as_string().unwrap(), binary);
    }

    // -------------------------------------------------------------------------
    // Arrays
    // -------------------------------------------------------------------------

    #[test]
    fn test_array_growth_through_index() {
        let mut v = Value::default();
        v[2] = Value::from("c");
        assert_eq!(v.len(), 3);
        assert!(v[0].is_null());
        assert!(v[1].is_null());
        assert_eq!(v[2].as_str().unwrap(), "c");
        // Reads past the end hit the canonical Null.
        assert!(v[99].is_null());
    }

    #[test]
    fn test_array_insert_past_end_is_rejected() {
        let mut v = Value::default();
        v.push(0);
        v.push(1);
        assert!(!v.insert(3, 99));
        assert_eq!(v.len(), 2);
        assert!(v.insert(2, 2));
        assert!(v.insert(0, -1));
        let got: Vec<i32> = (0..v.len()).map(|i| v[i].as_int().unwrap()).collect();
        assert_eq!(got, vec![-1, 0, 1, 2]);
    }

    #[test]
    fn test_array_remove_index() {
        let mut v = Value::from(vec![10, 20, 30]);
        assert_eq!(v.remove_index(1).unwrap().as_int().unwrap(), 20);
        assert_eq!(v.len(), 2);
        assert!(v.remove_index(5).is_none());
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_array_resize() {
        let mut v = Value::default();
        v.resize(3);
        assert_eq!(v.len(), 3);
        assert!(v[2].is_null());
        v.resize(1);
        assert_eq!(v.len(), 1);
    }

    // -------------------------------------------------------------------------
    // Objects
    // -------------------------------------------------------------------------

    #[test]
    fn test_object_insertion_order_is_preserved() {
        let mut v = Value::default();
        v["zebra"] = Value::from(1);
        v["alpha"] = Value::from(2);
        v["mid"] = Value::from(3);
        assert_eq!(v.member_names(), vec!["zebra", "alpha", "mid"]);
        // Re-assignment updates the value, not the position.
        v["zebra"] = Value::from(9);
        assert_eq!(v.member_names(), vec!["zebra", "alpha", "mid"]);
        assert_eq!(v["zebra"].as_int().unwrap(), 9);
    }

    #[test]
    fn test_object_missing_reads_are_canonical_null() {
        let mut v = Value::default();
        v["present"] = Value::from(1);
        assert!(v["absent"].is_null());
        assert!(std::ptr::eq(&v["absent"], Value::null_ref()));
        // The read did not create a member.
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_object_remove_member_keeps_order() {
        let mut v = Value::default();
        v["a"] = Value::from(1);
        v["b"] = Value::from(2);
        v["c"] = Value::from(3);
        assert_eq!(v.remove_member("b").unwrap().as_int().unwrap(), 2);
        assert_eq!(v.member_names(), vec!["a", "c"]);
        assert!(v.remove_member("b").is_none());
    }

    #[test]
    fn test_object_keys_with_embedded_nul() {
        let mut v = Value::default();
        v["h\0i"] = Value::from(1);
        v["hi"] = Value::from(2);
        assert_eq!(v.len(), 2);
        assert_eq!(v["h\0i"].as_int().unwrap(), 1);
        assert!(v.contains("h\0i"));
    }

    #[test]
    fn test_demand_creates_null() {
        let mut v = Value::default();
        assert!(v.demand("fresh").is_null());
        assert!(v.contains("fresh"));
    }

    #[test]
    fn test_clear_composites() {
        let mut v = Value::from(vec![1, 2]);
        v.clear();
        assert_eq!(v.len(), 0);
        assert!(v.is_array());
    }

    #[test]
    #[should_panic(expected = "cannot clear")]
    fn test_clear_scalar_panics() {
        Value::from(1).clear();
    }

    #[test]
    #[should_panic(expected = "cannot index")]
    fn test_index_scalar_panics() {
        let _ = &Value::from(1)["key"];
    }

    // -------------------------------------------------------------------------
    // Swap and clone
    // -------------------------------------------------------------------------

    #[test]
    fn test_swap_payload_keeps_comments() {
        let mut a = Value::null();
        a.set_comment("// keep me", CommentPlacement::Before);
        let mut b = Value::from("hello");
        a.swap_payload(&mut b);
        assert_eq!(a.as_str().unwrap(), "hello");
        assert_eq!(a.comment(CommentPlacement::Before), Some("// keep me"));
        assert!(b.is_null());
        assert!(!b.has_comment(CommentPlacement::Before));
    }

    #[test]
    fn test_swap_moves_comments() {
        let mut a = Value::from(1);
        a.set_comment("// one", CommentPlacement::Before);
        let mut b = Value::from(2);
        a.swap(&mut b);
        assert_eq!(a.as_int().unwrap(), 2);
        assert_eq!(b.comment(CommentPlacement::Before), Some("// one"));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let mut v = Value::default();
        v["list"][0] = Value::from(1);
        v["list"][0].set_comment("// c", CommentPlacement::Before);
        v["list"][0].set_offsets(3, 4);
        let mut copy = v.clone();
        assert_eq!(copy, v);
        assert_eq!(
            copy["list"][0].comment(CommentPlacement::Before),
            Some("// c")
        );
        assert_eq!(copy["list"][0].offset_start(), 3);
        copy["list"][0] = Value::from(99);
        assert_eq!(v["list"][0].as_int().unwrap(), 1);
    }

    // -------------------------------------------------------------------------
    // Comments and offsets
    // -------------------------------------------------------------------------

    #[test]
    fn test_comment_slots() {
        let mut v = Value::from(1);
        v.set_comment("// before\n", CommentPlacement::Before);
        v.set_comment("// same line", CommentPlacement::AfterOnSameLine);
        v.set_comment("// after", CommentPlacement::After);
        assert_eq!(v.comment(CommentPlacement::Before), Some("// before"));
        assert_eq!(
            v.comment(CommentPlacement::AfterOnSameLine),
            Some("// same line")
        );
        assert_eq!(v.comment(CommentPlacement::After), Some("// after"));
        // Replacement, not accumulation.
        v.set_comment("// rewritten", CommentPlacement::Before);
        assert_eq!(v.comment(CommentPlacement::Before), Some("// rewritten"));
    }

    #[test]
    #[should_panic(expected = "start with '/'")]
    fn test_comment_must_start_with_slash() {
        Value::from(1).set_comment("not a comment", CommentPlacement::Before);
    }

    #[test]
    fn test_offsets_default_zero() {
        let v = Value::from(1);
        assert_eq!(v.offset_start(), 0);
        assert_eq!(v.offset_limit(), 0);
    }

    // -------------------------------------------------------------------------
    // Ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_compare_kind_rank() {
        let ranked = [
            Value::null(),
            Value::from(1),
            Value::from(1u32),
            Value::from(1.0),
            Value::from("a"),
            Value::from(true),
            Value::from(vec![1]),
            {
                let mut o = Value::default();
                o["k"] = Value::from(1);
                o
            },
        ];
        for pair in ranked.windows(2) {
            assert!(pair[0] < pair[1], "{:?} < {:?}", pair[0].kind(), pair[1].kind());
        }
    }

    #[test]
    fn test_compare_within_kinds() {
        assert!(Value::from(-10) < Value::from(0));
        assert!(Value::from(0u32) < Value::from(u32::MAX));
        assert!(Value::from(-10.0) < Value::from(0.0));
        assert!(Value::from("") < Value::from(" "));
        assert!(Value::from("abc") < Value::from("abcd"));
        assert!(Value::from("ABCD") < Value::from("abcd"));
        assert!(Value::from(false) < Value::from(true));
    }

    #[test]
    fn test_compare_arrays_length_then_elements() {
        let empty = Value::new(ValueKind::Array);
        let l1a = Value::from(vec![0]);
        let l1b = Value::from(vec![10]);
        let l2a = Value::from(vec![0, 0]);
        let l2b = Value::from(vec![0, 10]);
        assert!(empty < l1a);
        assert!(l1a < l1b);
        assert!(l1b < l2a);
        assert!(l2a < l2b);
        assert_eq!(l2b, l2b.clone());
    }

    #[test]
    fn test_compare_objects_size_then_sorted_pairs() {
        let mut a = Value::default();
        a["a"] = Value::from(10);
        let mut b = Value::default();
        b["b"] = Value::from(0);
        let mut c = Value::default();
        c["c"] = Value::from(20);
        c["f"] = Value::from(15);
        let mut d = Value::default();
        d["d"] = Value::from(-2);
        d["e"] = Value::from(10);
        assert!(a < b);
        assert!(b < c);
        assert!(c < d);
    }

    #[test]
    fn test_object_equality_ignores_insertion_order() {
        let mut a = Value::default();
        a["x"] = Value::from(1);
        a["y"] = Value::from(2);
        let mut b = Value::default();
        b["y"] = Value::from(2);
        b["x"] = Value::from(1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_ignores_comments_and_offsets() {
        let mut a = Value::from(5);
        a.set_comment("// noted", CommentPlacement::Before);
        a.set_offsets(10, 11);
        assert_eq!(a, Value::from(5));
    }

    // -------------------------------------------------------------------------
    // Iteration
    // -------------------------------------------------------------------------

    #[test]
    fn test_entries_over_object() {
        let mut v = Value::default();
        v["k1"] = Value::from("a");
        v["k2"] = Value::from("b");
        let entries: Vec<_> = v.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), Some("k1"));
        assert_eq!(entries[0].index(), None);
        assert_eq!(entries[0].key(), Value::from("k1"));
        assert_eq!(entries[1].value().as_str().unwrap(), "b");
        // distance
        let pos = v.entries().position(|e| e.name() == Some("k2"));
        assert_eq!(pos, Some(1));
    }

    #[test]
    fn test_entries_over_array() {
        let mut v = Value::default();
        v[0] = Value::from("a");
        v[1] = Value::from("b");
        let entries: Vec<_> = v.entries().collect();
        assert_eq!(entries[0].index(), Some(0));
        assert_eq!(entries[0].name(), None);
        assert_eq!(entries[0].key(), Value::from(0u64));
        assert_eq!(entries[1].key(), Value::from(1u64));
    }

    #[test]
    fn test_entries_over_scalars_are_empty() {
        assert_eq!(Value::from(1).entries().count(), 0);
        assert_eq!(Value::null().entries().count(), 0);
        assert_eq!(Value::from("s").entries().count(), 0);
    }

    #[test]
    fn test_entries_count_matches_len() {
        let mut v = Value::default();
        for i in 0..5 {
            v[i] = Value::from(i as i64);
        }
        assert_eq!(v.entries().count(), v.len());
    }

    #[test]
    fn test_entries_mut() {
        let mut v = Value::from(vec![1, 2, 3]);
        for entry in v.entries_mut() {
            *entry.value = Value::from(entry.value.as_int().unwrap() * 2);
        }
        assert_eq!(v, Value::from(vec![2, 4, 6]));
    }
}
