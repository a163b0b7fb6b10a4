//! Generic typed accessors over [`Value`].
//!
//! `value.as_of::<T>()` and `value.fits::<T>()` dispatch to the accessor and
//! predicate specific to `T`, so the generic surface can never drift from the
//! named one (`as_of::<i64>` is exactly `as_int64`, never a widening
//! fallback).

use crate::types::{Result, Value};

/// Types extractable from a [`Value`]. `from_value` mirrors the coercing
/// `as_*` accessor for the type; `fits` mirrors the matching `is_*`
/// predicate.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
    fn fits(value: &Value) -> bool;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_bool()
    }
    fn fits(value: &Value) -> bool {
        value.is_bool()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_int()
    }
    fn fits(value: &Value) -> bool {
        value.is_int()
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_uint()
    }
    fn fits(value: &Value) -> bool {
        value.is_uint()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_int64()
    }
    fn fits(value: &Value) -> bool {
        value.is_int64()
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_uint64()
    }
    fn fits(value: &Value) -> bool {
        value.is_uint64()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_float()
    }
    fn fits(value: &Value) -> bool {
        value.is_double()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_double()
    }
    fn fits(value: &Value) -> bool {
        value.is_double()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_string()
    }
    fn fits(value: &Value) -> bool {
        value.is_string()
    }
}

impl Value {
    /// Extract a `T`, coercing exactly like the `as_*` accessor for `T`.
    pub fn as_of<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    /// The `is_*` predicate for `T`.
    pub fn fits<T: FromValue>(&self) -> bool {
        T::fits(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_of_matches_named_accessors() {
        let v = Value::from(10i64);
        assert_eq!(v.as_of::<bool>().unwrap(), v.as_bool().unwrap());
        assert_eq!(v.as_of::<i32>().unwrap(), v.as_int().unwrap());
        assert_eq!(v.as_of::<u32>().unwrap(), v.as_uint().unwrap());
        assert_eq!(v.as_of::<i64>().unwrap(), v.as_int64().unwrap());
        assert_eq!(v.as_of::<u64>().unwrap(), v.as_uint64().unwrap());
        assert_eq!(v.as_of::<f32>().unwrap(), v.as_float().unwrap());
        assert_eq!(v.as_of::<f64>().unwrap(), v.as_double().unwrap());
        assert_eq!(v.as_of::<String>().unwrap(), v.as_string().unwrap());
    }

    #[test]
    fn test_fits_matches_named_predicates() {
        for v in [
            Value::null(),
            Value::from(true),
            Value::from(-5),
            Value::from(u64::MAX),
            Value::from(0.25),
            Value::from("s"),
        ] {
            assert_eq!(v.fits::<bool>(), v.is_bool());
            assert_eq!(v.fits::<i32>(), v.is_int());
            assert_eq!(v.fits::<u32>(), v.is_uint());
            assert_eq!(v.fits::<i64>(), v.is_int64());
            assert_eq!(v.fits::<u64>(), v.is_uint64());
            assert_eq!(v.fits::<f64>(), v.is_double());
            assert_eq!(v.fits::<String>(), v.is_string());
        }
    }

    #[test]
    fn test_no_widening_fallback() {
        // A u64 beyond i64 range extracts as u64 but must not extract as
        // i64 through the generic surface.
        let v = Value::from(u64::MAX);
        assert_eq!(v.as_of::<u64>().unwrap(), u64::MAX);
        assert!(v.as_of::<i64>().is_err());
    }

    #[test]
    fn test_successful_extraction_implies_fits_for_integrals() {
        for v in [
            Value::from(0),
            Value::from(i32::MAX),
            Value::from(i64::MIN),
            Value::from(u64::MAX),
            Value::from(1048576.0),
        ] {
            if v.as_of::<i32>().is_ok() && v.is_integral() {
                assert!(v.fits::<i32>(), "{:?}", v);
            }
            if v.as_of::<u64>().is_ok() && v.is_integral() {
                assert!(v.fits::<u64>(), "{:?}", v);
            }
        }
    }
}
