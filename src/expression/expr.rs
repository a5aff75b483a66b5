//! Expression tree definitions.

use crate::expression::operator::{ArithmeticOperator, ComparisonOperator};
use std::fmt;

/// Column reference by field name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name used for predicate lookups, which are case-insensitive
    pub fn lowered(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Literal token as written in the query.
///
/// Numbers keep their raw text; turning them into typed values is the
/// literal decoder's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(String),
    Float(String),
    Boolean(bool),
    Null,
}

impl Literal {
    pub fn string(s: impl Into<String>) -> Self {
        Literal::String(s.into())
    }

    pub fn integer(s: impl Into<String>) -> Self {
        Literal::Integer(s.into())
    }

    pub fn float(s: impl Into<String>) -> Self {
        Literal::Float(s.into())
    }

    /// Name of the literal kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Integer(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Boolean(_) => "boolean",
            Literal::Null => "null",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Integer(s) | Literal::Float(s) => f.write_str(s),
            Literal::Boolean(true) => f.write_str("true"),
            Literal::Boolean(false) => f.write_str("false"),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Function call such as `contains(message, 'fix')`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expression>,
    pub distinct: bool,
}

/// Expression tree node.
///
/// Built once per query by the parser and evaluated once per record.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),

    Column(ColumnRef),

    Comparison {
        op: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Not(Box<Expression>),

    Arithmetic {
        op: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Function(FunctionCall),
}

impl Expression {
    /// Create a literal expression
    pub fn literal(lit: Literal) -> Self {
        Expression::Literal(lit)
    }

    /// Create a string literal expression
    pub fn string(s: impl Into<String>) -> Self {
        Expression::Literal(Literal::string(s))
    }

    /// Create an integer literal expression from its token text
    pub fn integer(s: impl Into<String>) -> Self {
        Expression::Literal(Literal::integer(s))
    }

    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::new(name))
    }

    pub fn comparison(op: ComparisonOperator, left: Expression, right: Expression) -> Self {
        Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::Equal, left, right)
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::NotEqual, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::Less, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::LessEqual, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::Greater, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::GreaterEqual, left, right)
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not_expr(operand: Expression) -> Self {
        Expression::Not(Box::new(operand))
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function(FunctionCall {
            name: name.into(),
            args,
            distinct: false,
        })
    }

    /// Short name of this node's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Column(_) => "column",
            Expression::Comparison { .. } => "comparison",
            Expression::And { .. } => "AND expression",
            Expression::Or { .. } => "OR expression",
            Expression::Not(_) => "NOT expression",
            Expression::Arithmetic { .. } => "arithmetic expression",
            Expression::Function(_) => "function call",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit),
            Expression::Column(col) => f.write_str(&col.name),
            Expression::Comparison { op, left, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Expression::And { left, right } => write!(f, "({} and {})", left, right),
            Expression::Or { left, right } => write!(f, "({} or {})", left, right),
            Expression::Not(operand) => write!(f, "not {}", operand),
            Expression::Arithmetic { op, left, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Expression::Function(call) => {
                write!(f, "{}(", call.name)?;
                if call.distinct {
                    f.write_str("distinct ")?;
                }
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
