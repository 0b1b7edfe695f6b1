use crate::{
    BinaryOpType, EntityDescriptor, Error, Expression, FieldDescriptor, Result, UnaryOpType, Value,
    convert_value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    And,
    Or,
    /// The column itself is the condition.
    Boolean,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Boolean => "",
        }
    }
}

/// A single column condition, rendered as `<table>.<column> <op> @<column>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateCondition {
    pub column: &'static str,
    pub operator: Operator,
    /// Bound value, converted to the column type. `Null` for [`Operator::Boolean`].
    pub value: Value,
    pub negate: bool,
}

/// Translates a predicate tree into a single [`PredicateCondition`] over the
/// fields of `descriptor`.
///
/// Accepts one comparison or combinator with a declared field on the left and
/// a value on the right, or a bare boolean field, either optionally negated.
pub fn translate(
    descriptor: &EntityDescriptor,
    expression: &Expression,
) -> Result<PredicateCondition> {
    let unsupported = |message: String| {
        Error::UnsupportedExpression(format!(
            "{message} in `{expression}` (entity `{}`)",
            descriptor.type_name
        ))
    };
    match expression {
        Expression::Unary {
            op: UnaryOpType::Not,
            arg,
        } => translate(descriptor, arg).map(|mut condition| {
            condition.negate = !condition.negate;
            condition
        }),
        Expression::Field(name) => {
            let field = field(descriptor, name).ok_or_else(|| unsupported(format!("unknown field `{name}`")))?;
            if !matches!(field.value, Value::Boolean(..)) {
                return Err(unsupported(format!(
                    "field `{name}` is not a boolean and cannot be used alone"
                )));
            }
            Ok(PredicateCondition {
                column: field.column,
                operator: Operator::Boolean,
                value: Value::Null,
                negate: false,
            })
        }
        Expression::Binary { op, lhs, rhs } => {
            let (operator, negate) = match op {
                BinaryOpType::Equal => (Operator::Equal, false),
                BinaryOpType::NotEqual => (Operator::Equal, true),
                BinaryOpType::Greater => (Operator::GreaterThan, false),
                BinaryOpType::GreaterEqual => (Operator::GreaterOrEqual, false),
                BinaryOpType::Less => (Operator::LessThan, false),
                BinaryOpType::LessEqual => (Operator::LessOrEqual, false),
                BinaryOpType::And => (Operator::And, false),
                BinaryOpType::Or => (Operator::Or, false),
                op => {
                    return Err(unsupported(format!(
                        "operator `{}` is not supported",
                        op.symbol()
                    )));
                }
            };
            let field = match lhs.as_ref() {
                Expression::Field(name) => field(descriptor, name)
                    .ok_or_else(|| unsupported(format!("unknown field `{name}`")))?,
                Expression::Value(..) => {
                    return Err(unsupported("the left operand must be a field, not a value".into()));
                }
                other => {
                    return Err(unsupported(format!(
                        "the left operand `{other}` must be a single field"
                    )));
                }
            };
            let value = match rhs.as_ref() {
                Expression::Value(value) => value.clone(),
                Expression::Field(name) => {
                    return Err(unsupported(format!(
                        "comparing with the field `{name}` is not supported, the right operand must be a value"
                    )));
                }
                other => {
                    return Err(unsupported(format!(
                        "the right operand `{other}` must be a single value"
                    )));
                }
            };
            if matches!(operator, Operator::And | Operator::Or)
                && !matches!(field.value, Value::Boolean(..))
            {
                return Err(unsupported(format!(
                    "logical operators need a boolean field, `{}` is a {}",
                    field.name,
                    field.value.type_name()
                )));
            }
            let value = convert_value(&field.value, value).map_err(|e| unsupported(e.to_string()))?;
            Ok(PredicateCondition {
                column: field.column,
                operator,
                value,
                negate,
            })
        }
        Expression::Unary {
            op: UnaryOpType::Negative,
            ..
        } => Err(unsupported("arithmetic is not supported".into())),
        Expression::Value(..) => Err(unsupported("a constant is not a condition".into())),
        Expression::Call(call) => Err(unsupported(format!("call `{call}` is not supported"))),
        Expression::Unsupported(source) => Err(unsupported(format!("`{source}` is not supported"))),
    }
}

fn field<'d>(descriptor: &'d EntityDescriptor, name: &str) -> Option<&'d FieldDescriptor> {
    descriptor
        .field(name)
        .or_else(|| descriptor.field_by_column(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDeclaration, TableDeclaration, describe};

    fn descriptor() -> EntityDescriptor {
        let field = |name, value| FieldDeclaration {
            name,
            value,
            ..Default::default()
        };
        describe(
            "Player",
            TableDeclaration {
                name: Some("player"),
                primary_key: None,
            },
            &[
                FieldDeclaration {
                    primary_key: true,
                    ..field("id", Value::Int32(None))
                },
                FieldDeclaration {
                    column: Some("nickname"),
                    ..field("name", Value::Varchar(None))
                },
                field("score", Value::Int16(None)),
                field("active", Value::Boolean(None)),
            ],
        )
        .unwrap()
    }

    fn compare(field: &'static str, op: BinaryOpType, value: Value) -> Expression {
        Expression::binary(op, Expression::Field(field), Expression::Value(value))
    }

    #[test]
    fn operators() {
        let descriptor = descriptor();
        let cases = [
            (BinaryOpType::Equal, Operator::Equal, false),
            (BinaryOpType::NotEqual, Operator::Equal, true),
            (BinaryOpType::Greater, Operator::GreaterThan, false),
            (BinaryOpType::GreaterEqual, Operator::GreaterOrEqual, false),
            (BinaryOpType::Less, Operator::LessThan, false),
            (BinaryOpType::LessEqual, Operator::LessOrEqual, false),
        ];
        for (op, operator, negate) in cases {
            let condition =
                translate(&descriptor, &compare("score", op, Value::Int32(Some(10)))).unwrap();
            assert_eq!(
                condition,
                PredicateCondition {
                    column: "score",
                    operator,
                    value: Value::Int16(Some(10)),
                    negate,
                }
            );
        }
    }

    #[test]
    fn column_name_and_negation() {
        let descriptor = descriptor();
        let expression = Expression::unary(
            UnaryOpType::Not,
            compare("name", BinaryOpType::Equal, Value::Varchar(Some("rick".into()))),
        );
        let condition = translate(&descriptor, &expression).unwrap();
        assert_eq!(condition.column, "nickname");
        assert!(condition.negate);
    }

    #[test]
    fn boolean_checks() {
        let descriptor = descriptor();
        let condition = translate(&descriptor, &Expression::Field("active")).unwrap();
        assert_eq!(condition.operator, Operator::Boolean);
        assert!(!condition.negate);
        let condition = translate(
            &descriptor,
            &Expression::unary(UnaryOpType::Not, Expression::Field("active")),
        )
        .unwrap();
        assert!(condition.negate);
        let condition = translate(
            &descriptor,
            &compare("active", BinaryOpType::Or, Value::Boolean(Some(true))),
        )
        .unwrap();
        assert_eq!(condition.operator, Operator::Or);
    }

    #[test]
    fn rejected() {
        let descriptor = descriptor();
        let rejected = [
            Expression::Field("score"),
            Expression::Field("missing"),
            Expression::Call("name.len()".into()),
            Expression::Value(Value::Boolean(Some(true))),
            compare("missing", BinaryOpType::Equal, Value::Int32(Some(1))),
            compare("score", BinaryOpType::Addition, Value::Int32(Some(1))),
            compare("score", BinaryOpType::And, Value::Int32(Some(1))),
            compare("score", BinaryOpType::Equal, Value::Varchar(Some("x".into()))),
            Expression::binary(
                BinaryOpType::Equal,
                Expression::Value(Value::Int32(Some(1))),
                Expression::Field("score"),
            ),
            Expression::binary(
                BinaryOpType::Equal,
                Expression::Field("score"),
                Expression::Field("id"),
            ),
            Expression::binary(
                BinaryOpType::And,
                compare("score", BinaryOpType::Equal, Value::Int32(Some(1))),
                compare("name", BinaryOpType::Equal, Value::Varchar(Some("x".into()))),
            ),
        ];
        for expression in rejected {
            assert!(
                matches!(
                    translate(&descriptor, &expression),
                    Err(Error::UnsupportedExpression(..))
                ),
                "{expression} should be rejected"
            );
        }
    }
}
