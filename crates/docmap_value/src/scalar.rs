use alloc::string::{String, ToString};
use alloc::vec::Vec;

use thiserror::Error;

use crate::{Document, Value, ValueKind};

// -----------------------------------------------------------------------------
// ShapeMismatch

/// A [`Value`] did not have the shape a Rust type requires.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {actual}")]
pub struct ShapeMismatch {
    /// Description of the accepted shape, e.g. `"string"` or `"u8"`.
    pub expected: &'static str,
    pub actual: ValueKind,
}

impl ShapeMismatch {
    #[inline]
    pub const fn new(expected: &'static str, actual: &Value) -> Self {
        Self {
            expected,
            actual: actual.kind(),
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

/// Builds a Rust value out of a borrowed [`Value`].
///
/// Types that accept `null` set [`NULLABLE`](FromValue::NULLABLE) and
/// return their null representation from [`from_null`](FromValue::from_null).
///
/// # Examples
///
/// ```
/// use docmap_value::{FromValue, Value};
///
/// assert_eq!(u8::from_value(&Value::Integer(7)), Ok(7));
/// assert!(u8::from_value(&Value::Integer(700)).is_err());
/// assert_eq!(Option::<String>::from_value(&Value::Null), Ok(None));
/// assert!(<Option<String> as FromValue>::NULLABLE);
/// ```
pub trait FromValue: Sized {
    /// Whether `null` is a valid input.
    const NULLABLE: bool = false;

    /// Converts a value, failing when its shape does not fit.
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch>;

    /// The value used for `null`, `None` unless [`NULLABLE`](Self::NULLABLE).
    #[inline]
    fn from_null() -> Option<Self> {
        None
    }
}

/// Produces a [`Value`] from a borrowed Rust value.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

// -----------------------------------------------------------------------------
// Pass-through

impl FromValue for Value {
    const NULLABLE: bool = true;

    #[inline]
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        Ok(value.clone())
    }

    #[inline]
    fn from_null() -> Option<Self> {
        Some(Value::Null)
    }
}

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Document {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        match value {
            Value::Document(doc) => Ok(doc.clone()),
            other => Err(ShapeMismatch::new("document", other)),
        }
    }
}

impl ToValue for Document {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Document(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Scalars

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        value.as_bool().ok_or_else(|| ShapeMismatch::new("bool", value))
    }
}

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(ShapeMismatch::new("string", other)),
        }
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        let mut chars = value.as_str().unwrap_or_default().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ShapeMismatch::new("single character string", value)),
        }
    }
}

impl ToValue for char {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

macro_rules! impl_integer {
    ($($ty:ident),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
                    match value {
                        Value::Integer(v) => $ty::try_from(*v)
                            .map_err(|_| ShapeMismatch::new(stringify!($ty), value)),
                        other => Err(ShapeMismatch::new(stringify!($ty), other)),
                    }
                }
            }

            impl ToValue for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::Integer(*self as i128)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        value.as_f64().ok_or_else(|| ShapeMismatch::new("f64", value))
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| ShapeMismatch::new("f32", value))
    }
}

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: FromValue> FromValue for Option<T> {
    const NULLABLE: bool = true;

    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    #[inline]
    fn from_null() -> Option<Self> {
        Some(None)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ShapeMismatch> {
        match value {
            Value::Sequence(items) => items.iter().map(T::from_value).collect(),
            other => Err(ShapeMismatch::new("sequence", other)),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(ToValue::to_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{FromValue, ShapeMismatch, ToValue};
    use crate::{Value, ValueKind};

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(i8::from_value(&Value::Integer(-128)), Ok(-128));
        assert_eq!(
            i8::from_value(&Value::Integer(128)),
            Err(ShapeMismatch {
                expected: "i8",
                actual: ValueKind::Integer
            })
        );
        assert!(u32::from_value(&Value::Integer(-1)).is_err());
        assert!(i64::from_value(&Value::Float(1.0)).is_err());
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_value(&Value::Integer(3)), Ok(3.0));
        assert_eq!(f32::from_value(&Value::Float(0.5)), Ok(0.5));
        assert!(f64::from_value(&Value::from("3")).is_err());
    }

    #[test]
    fn unsigned_extremes_round_trip() {
        let value = u64::MAX.to_value();
        assert_eq!(value, Value::Integer(u64::MAX as i128));
        assert_eq!(u64::from_value(&value), Ok(u64::MAX));
        assert_eq!(usize::from_value(&usize::MAX.to_value()), Ok(usize::MAX));
        assert_eq!(i64::from_value(&i64::MIN.to_value()), Ok(i64::MIN));

        assert!(i64::from_value(&value).is_err());
        assert!(u64::from_value(&Value::Integer(u64::MAX as i128 + 1)).is_err());
        assert_eq!(7_u64.to_value(), Value::Integer(7));
    }

    #[test]
    fn sequences_convert_elementwise() {
        let value = Value::from(vec!["a", "b"]);
        let out: Vec<String> = FromValue::from_value(&value).unwrap();
        assert_eq!(out, ["a", "b"]);
        assert_eq!(out.to_value(), value);

        let mixed = Value::Sequence(vec![Value::from("a"), Value::Integer(1)]);
        assert!(Vec::<String>::from_value(&mixed).is_err());
    }

    #[test]
    fn null_handling() {
        assert!(!String::NULLABLE);
        assert_eq!(String::from_null(), None);
        assert_eq!(Option::<i32>::from_null(), Some(None));
        assert_eq!(Value::from_null(), Some(Value::Null));
        assert_eq!(None::<i32>.to_value(), Value::Null);
    }

    #[test]
    fn char_requires_single_character() {
        assert_eq!(char::from_value(&Value::from("x")), Ok('x'));
        assert!(char::from_value(&Value::from("xy")).is_err());
        assert!(char::from_value(&Value::Integer(1)).is_err());
    }
}
