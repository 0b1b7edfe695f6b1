use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};
use time::PrimitiveDateTime;

/// Dynamically typed column value.
///
/// Every variant carries an `Option`: `None` is the SQL `NULL` of that
/// semantic type, which lets an empty value double as a type prototype (see
/// [`crate::AsValue::as_empty_value`]).
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    /// Untyped `NULL`.
    #[default]
    Null,
    Boolean(Option<bool>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Timestamp(Option<PrimitiveDateTime>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null
            | Value::Boolean(None)
            | Value::Int16(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::Float64(None)
            | Value::Varchar(None)
            | Value::Blob(None)
            | Value::Timestamp(None) => true,
            _ => false,
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// The `NULL` value of the same semantic type.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Timestamp(..) => Value::Timestamp(None),
        }
    }

    /// Name of the semantic type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(..) => "boolean",
            Value::Int16(..) => "short integer",
            Value::Int32(..) => "integer",
            Value::Int64(..) => "long integer",
            Value::Float64(..) => "double",
            Value::Varchar(..) => "text",
            Value::Blob(..) => "binary blob",
            Value::Timestamp(..) => "timestamp",
        }
    }

    /// Integer content widened to `i64`, if this is a non null integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int16(Some(v)) => Some(*v as i64),
            Value::Int32(Some(v)) => Some(*v as i64),
            Value::Int64(Some(v)) => Some(*v),
            _ => None,
        }
    }
}

impl PartialOrd for Value {
    /// Values of the same type compare naturally, integers of different widths
    /// are compared after widening. Anything involving `NULL` is unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(Some(l)), Value::Boolean(Some(r))) => l.partial_cmp(r),
            (Value::Float64(Some(l)), Value::Float64(Some(r))) => l.partial_cmp(r),
            (Value::Varchar(Some(l)), Value::Varchar(Some(r))) => l.partial_cmp(r),
            (Value::Blob(Some(l)), Value::Blob(Some(r))) => l.partial_cmp(r),
            (Value::Timestamp(Some(l)), Value::Timestamp(Some(r))) => l.partial_cmp(r),
            (l, r) => match (l.as_i64(), r.as_i64()) {
                (Some(l), Some(r)) => l.partial_cmp(&r),
                _ => None,
            },
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int16(Some(v)) => write!(f, "{v}"),
            Value::Int32(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) => write!(f, "'{v}'"),
            Value::Blob(Some(v)) => write!(f, "<{} bytes>", v.len()),
            Value::Timestamp(Some(v)) => write!(f, "'{v}'"),
            _ => unreachable!(),
        }
    }
}
