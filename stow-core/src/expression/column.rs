use crate::{AsValue, BinaryOpType, Expression, UnaryOpType, Value};
use std::{fmt, marker::PhantomData, ops::Not};

/// Typed handle on a field of `E` holding a `T`.
///
/// `#[derive(Entity)]` generates one as an associated constant named after
/// each field, `User::username.eq("rick")` builds a [`Predicate<User>`].
pub struct Column<E, T> {
    pub name: &'static str,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E, T> Column<E, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn expression(&self) -> Expression {
        Expression::Field(self.name)
    }
}

impl<E, T> Clone for Column<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Column<E, T> {}

impl<E, T> fmt::Debug for Column<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Column").field(&self.name).finish()
    }
}

/// Values a column of `T` is compared with.
///
/// Besides `T` itself this accepts the inner type of a nullable column and
/// string slices for text columns. A bare integer literal resolves to the
/// column type, `MatchResult::kills.ge(3)` works on an `i16` field.
pub trait ColumnOperand<T> {
    fn into_value(self) -> Value;
}

impl<T: AsValue> ColumnOperand<T> for T {
    fn into_value(self) -> Value {
        self.as_value()
    }
}

impl<T: AsValue> ColumnOperand<Option<T>> for T {
    fn into_value(self) -> Value {
        self.as_value()
    }
}

impl ColumnOperand<String> for &str {
    fn into_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
}

impl ColumnOperand<Option<String>> for &str {
    fn into_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
}

impl<E, T: AsValue> Column<E, T> {
    fn compare(&self, op: BinaryOpType, value: impl ColumnOperand<T>) -> Predicate<E> {
        Expression::binary(op, self.expression(), Expression::Value(value.into_value())).into()
    }

    pub fn eq(&self, value: impl ColumnOperand<T>) -> Predicate<E> {
        self.compare(BinaryOpType::Equal, value)
    }

    pub fn ne(&self, value: impl ColumnOperand<T>) -> Predicate<E> {
        self.compare(BinaryOpType::NotEqual, value)
    }

    pub fn gt(&self, value: impl ColumnOperand<T>) -> Predicate<E> {
        self.compare(BinaryOpType::Greater, value)
    }

    pub fn ge(&self, value: impl ColumnOperand<T>) -> Predicate<E> {
        self.compare(BinaryOpType::GreaterEqual, value)
    }

    pub fn lt(&self, value: impl ColumnOperand<T>) -> Predicate<E> {
        self.compare(BinaryOpType::Less, value)
    }

    pub fn le(&self, value: impl ColumnOperand<T>) -> Predicate<E> {
        self.compare(BinaryOpType::LessEqual, value)
    }
}

impl<E> Column<E, bool> {
    pub fn and(&self, value: bool) -> Predicate<E> {
        self.compare(BinaryOpType::And, value)
    }

    pub fn or(&self, value: bool) -> Predicate<E> {
        self.compare(BinaryOpType::Or, value)
    }

    pub fn is_true(&self) -> Predicate<E> {
        self.expression().into()
    }

    pub fn is_false(&self) -> Predicate<E> {
        !self.is_true()
    }
}

/// An [`Expression`] bound to the entity it filters.
pub struct Predicate<E> {
    pub expression: Expression,
    _marker: PhantomData<fn() -> E>,
}

impl<E> From<Expression> for Predicate<E> {
    fn from(expression: Expression) -> Self {
        Self {
            expression,
            _marker: PhantomData,
        }
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        self.expression.clone().into()
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.expression).finish()
    }
}

impl<E> Not for Predicate<E> {
    type Output = Predicate<E>;

    fn not(self) -> Self::Output {
        Expression::unary(UnaryOpType::Not, self.expression).into()
    }
}
