use crate::Value;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpType {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Remainder,
}

impl BinaryOpType {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOpType::Equal => "==",
            BinaryOpType::NotEqual => "!=",
            BinaryOpType::Less => "<",
            BinaryOpType::LessEqual => "<=",
            BinaryOpType::Greater => ">",
            BinaryOpType::GreaterEqual => ">=",
            BinaryOpType::And => "&&",
            BinaryOpType::Or => "||",
            BinaryOpType::Addition => "+",
            BinaryOpType::Subtraction => "-",
            BinaryOpType::Multiplication => "*",
            BinaryOpType::Division => "/",
            BinaryOpType::Remainder => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpType {
    Not,
    Negative,
}

/// Predicate source tree, built by the typed column handles or by `expr!`.
///
/// The tree can describe more than the translator accepts: anything beyond a
/// single comparison is rejected when translated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Reference to an entity field, by field name.
    Field(&'static str),
    Value(Value),
    Binary {
        op: BinaryOpType,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Unary {
        op: UnaryOpType,
        arg: Box<Expression>,
    },
    /// Function or method call, kept only to be reported.
    Call(String),
    /// Any other source construct, kept only to be reported.
    Unsupported(String),
}

impl Expression {
    pub fn binary(op: BinaryOpType, lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn unary(op: UnaryOpType, arg: Expression) -> Self {
        Expression::Unary { op, arg: arg.into() }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Field(name) => f.write_str(name),
            Expression::Value(value) => write!(f, "{value}"),
            Expression::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expression::Unary {
                op: UnaryOpType::Not,
                arg,
            } => write!(f, "!{arg}"),
            Expression::Unary {
                op: UnaryOpType::Negative,
                arg,
            } => write!(f, "-{arg}"),
            Expression::Call(v) | Expression::Unsupported(v) => f.write_str(v),
        }
    }
}
