//! Operator definitions for expressions.

use std::fmt;

/// Comparison operators that can appear in a predicate.
///
/// The parser accepts `LIKE`/`NOT LIKE` so that they surface as an
/// unsupported-operator error at evaluation time rather than a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Like,
    NotLike,
}

impl ComparisonOperator {
    /// Get the SQL representation of this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::Like => "like",
            ComparisonOperator::NotLike => "not like",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arithmetic operators. Parsed, never evaluated in a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Sub => "-",
            ArithmeticOperator::Mul => "*",
            ArithmeticOperator::Div => "/",
            ArithmeticOperator::Mod => "%",
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_strings() {
        assert_eq!(ComparisonOperator::Equal.as_str(), "=");
        assert_eq!(ComparisonOperator::NotEqual.as_str(), "!=");
        assert_eq!(ComparisonOperator::GreaterEqual.to_string(), ">=");
        assert_eq!(ComparisonOperator::NotLike.to_string(), "not like");
        assert_eq!(ArithmeticOperator::Mod.to_string(), "%");
    }
}
