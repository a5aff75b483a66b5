//! Predicate evaluation against a single record.

use crate::access::{DataType, Provider, Value};
use crate::error::{QueryError, QueryResult};
use crate::expression::literal::decode_literal;
use crate::expression::{ComparisonOperator, Expression, FunctionCall, FunctionRegistry};

/// Evaluates WHERE-clause expressions to a boolean
pub struct PredicateEvaluator<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> PredicateEvaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate `expr` against the record behind `provider`.
    ///
    /// Both sides of AND/OR are always evaluated; an error on either side
    /// fails the whole predicate even if the other side alone decides it.
    pub fn evaluate(&self, provider: &dyn Provider, expr: &Expression) -> QueryResult<bool> {
        match expr {
            Expression::Comparison { op, left, right } => {
                self.evaluate_comparison(provider, *op, left, right)
            }

            Expression::And { left, right } => {
                let l = self.evaluate(provider, left)?;
                let r = self.evaluate(provider, right)?;
                Ok(l && r)
            }

            Expression::Or { left, right } => {
                let l = self.evaluate(provider, left)?;
                let r = self.evaluate(provider, right)?;
                Ok(l || r)
            }

            Expression::Function(call) => self.evaluate_function(provider, call),

            other => Err(QueryError::shape(
                "expression type",
                format!("{} {}", other.kind(), other),
            )),
        }
    }

    fn evaluate_comparison(
        &self,
        provider: &dyn Provider,
        op: ComparisonOperator,
        left: &Expression,
        right: &Expression,
    ) -> QueryResult<bool> {
        let column = match left {
            Expression::Column(col) => col,
            other => {
                return Err(QueryError::shape(
                    "left operand type",
                    format!("{} {}", other.kind(), other),
                ))
            }
        };
        let left_val = provider.get_value(&column.lowered())?;

        let literal = match right {
            Expression::Literal(lit) => lit,
            other => {
                return Err(QueryError::shape(
                    "right operand type",
                    format!("{} {}", other.kind(), other),
                ))
            }
        };
        let right_val = decode_literal(literal)?;

        compare_values(op, &left_val, &right_val)
    }

    fn evaluate_function(&self, provider: &dyn Provider, call: &FunctionCall) -> QueryResult<bool> {
        let function = self.registry.lookup(&call.name)?;
        function(provider, &call.args, call.distinct)
    }
}

/// Apply a comparison operator to two values of the same type.
///
/// `>=` and `<=` are the strict comparison OR'ed with equality, so timestamp
/// boundaries use chronological equality. Floats support equality only.
pub fn compare_values(op: ComparisonOperator, left: &Value, right: &Value) -> QueryResult<bool> {
    if left.data_type() != right.data_type() {
        return Err(QueryError::TypeMismatch {
            context: "comparison".to_string(),
            left: left.data_type().to_string(),
            right: right.data_type().to_string(),
        });
    }

    let ordering = matches!(
        op,
        ComparisonOperator::Greater
            | ComparisonOperator::Less
            | ComparisonOperator::GreaterEqual
            | ComparisonOperator::LessEqual
    );
    if ordering && left.data_type() == DataType::Float64 {
        return Err(QueryError::UnsupportedOperator {
            operator: format!("{} on {}", op, left.data_type()),
        });
    }

    match op {
        ComparisonOperator::Equal => Ok(equals(left, right)),
        ComparisonOperator::NotEqual => Ok(!equals(left, right)),
        ComparisonOperator::Greater => Ok(greater(left, right)),
        ComparisonOperator::Less => Ok(less(left, right)),
        ComparisonOperator::GreaterEqual => Ok(greater(left, right) || equals(left, right)),
        ComparisonOperator::LessEqual => Ok(less(left, right) || equals(left, right)),
        ComparisonOperator::Like | ComparisonOperator::NotLike => {
            Err(QueryError::UnsupportedOperator {
                operator: op.as_str().to_string(),
            })
        }
    }
}

// The helpers below assume both sides already share a variant.

fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(l), Value::String(r)) => l == r,
        (Value::UInt64(l), Value::UInt64(r)) => l == r,
        (Value::Float64(l), Value::Float64(r)) => l == r,
        (Value::Timestamp(l), Value::Timestamp(r)) => l == r,
        _ => false,
    }
}

fn greater(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(l), Value::String(r)) => l > r,
        (Value::UInt64(l), Value::UInt64(r)) => l > r,
        (Value::Timestamp(l), Value::Timestamp(r)) => l > r,
        _ => false,
    }
}

fn less(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(l), Value::String(r)) => l < r,
        (Value::UInt64(l), Value::UInt64(r)) => l < r,
        (Value::Timestamp(l), Value::Timestamp(r)) => l < r,
        _ => false,
    }
}
