use crate::{Error, Result, Value, truncate_long};
use std::any;
use time::PrimitiveDateTime;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for statement parameters and row decoding.
///
/// Integer conversions accept any integer variant as long as the content fits
/// the target type, the range check happens before the value is returned.
///
/// # Examples
/// ```rust
/// use stow_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The `NULL` value of the variant that represents this type. The derive
    /// uses it as the semantic type prototype of a field.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Convert a dynamic [`Value`] back into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::Conversion(format!(
        "Cannot convert {} value {} into {}",
        value.type_name(),
        truncate_long!(value.to_string()),
        any::type_name::<T>(),
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self as _))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value.as_i64() {
                    Some(v) => <$source>::try_from(v).map_err(|_| {
                        Error::Conversion(format!(
                            "Value {v} is out of range for {}",
                            any::type_name::<$source>(),
                        ))
                    }),
                    None => Err(conversion_error::<$source>(&value)),
                }
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int16);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(u8, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(u16, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u32, Value::Int64);

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    _ => Err(conversion_error::<$source>(&value)),
                }
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean, Value::Int16(Some(v)) => Ok(v != 0), Value::Int32(Some(v)) => Ok(v != 0));
impl_as_value!(f64, Value::Float64, Value::Int32(Some(v)) => Ok(v as f64), Value::Int16(Some(v)) => Ok(v as f64));
impl_as_value!(String, Value::Varchar);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(Vec<u8>, Value::Blob);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Float64(None)
    }
    fn as_value(self) -> Value {
        Value::Float64(Some(self as f64))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(Some(v)) => Ok(v as f32),
            _ => Err(conversion_error::<f32>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

/// Converts `value` into the variant of `prototype`, with the same rules as
/// [`AsValue::try_from_value`]. `NULL` becomes the `NULL` of the prototype type.
pub fn convert_value(prototype: &Value, value: Value) -> Result<Value> {
    if value.is_null() {
        return Ok(prototype.as_null());
    }
    Ok(match prototype {
        Value::Null => value,
        Value::Boolean(..) => bool::try_from_value(value)?.as_value(),
        Value::Int16(..) => i16::try_from_value(value)?.as_value(),
        Value::Int32(..) => i32::try_from_value(value)?.as_value(),
        Value::Int64(..) => i64::try_from_value(value)?.as_value(),
        Value::Float64(..) => f64::try_from_value(value)?.as_value(),
        Value::Varchar(..) => String::try_from_value(value)?.as_value(),
        Value::Blob(..) => Box::<[u8]>::try_from_value(value)?.as_value(),
        Value::Timestamp(..) => PrimitiveDateTime::try_from_value(value)?.as_value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn integer_widening() {
        assert_eq!(i64::try_from_value(Value::Int16(Some(-4))).unwrap(), -4);
        assert_eq!(i32::try_from_value(Value::Int64(Some(77))).unwrap(), 77);
        assert!(matches!(
            i16::try_from_value(Value::Int64(Some(100_000))),
            Err(Error::Conversion(..))
        ));
        assert!(matches!(
            u32::try_from_value(Value::Int32(Some(-1))),
            Err(Error::Conversion(..))
        ));
    }

    #[test]
    fn mismatched_variant() {
        let result = String::try_from_value(Value::Int32(Some(1)));
        assert!(matches!(result, Err(Error::Conversion(..))));
        assert!(i32::try_from_value(Value::Int32(None)).is_err());
    }

    #[test]
    fn optional() {
        assert_eq!(Option::<i32>::as_empty_value(), Value::Int32(None));
        assert_eq!(None::<String>.as_value(), Value::Varchar(None));
        assert_eq!(
            Option::<String>::try_from_value(Value::Null).unwrap(),
            None
        );
        assert_eq!(
            Option::<i16>::try_from_value(Value::Int16(Some(3))).unwrap(),
            Some(3)
        );
    }

    #[test]
    fn convert_to_prototype() {
        assert_eq!(
            convert_value(&Value::Int16(None), Value::Int32(Some(12))).unwrap(),
            Value::Int16(Some(12))
        );
        assert_eq!(
            convert_value(&Value::Varchar(None), Value::Null).unwrap(),
            Value::Varchar(None)
        );
        assert!(convert_value(&Value::Int32(None), Value::Varchar(Some("x".into()))).is_err());
    }

    #[test]
    fn timestamp() {
        let ts = datetime!(2024-03-01 10:30:00);
        assert_eq!(ts.as_value(), Value::Timestamp(Some(ts)));
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Timestamp(Some(ts))).unwrap(),
            ts
        );
    }
}
