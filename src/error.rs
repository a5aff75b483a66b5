//! Query error types.

use thiserror::Error;

/// Errors raised while resolving or executing a query.
///
/// Every variant is deterministic: running the same query against the same
/// records produces the same error, so none of them are retryable.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unsupported {context}: {shape}")]
    UnsupportedShape { context: String, shape: String },

    #[error("field '{field}' does not exist in the {entity} structure")]
    UnknownField { entity: String, field: String },

    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("function {function} expects {expected} arguments, got {actual}")]
    Arity {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("type mismatch in {context}: {left} and {right}")]
    TypeMismatch {
        context: String,
        left: String,
        right: String,
    },

    #[error("unsupported comparison operator: {operator}")]
    UnsupportedOperator { operator: String },

    #[error("cannot decode {kind} literal '{literal}': {reason}")]
    ValueDecode {
        kind: String,
        literal: String,
        reason: String,
    },

    #[error("unknown table: {name}")]
    UnknownEntity { name: String },

    #[error("multiple sources not supported: {count} tables in FROM")]
    MultipleSources { count: usize },

    #[error("record source failed: {message}")]
    Source { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    pub(crate) fn shape(context: impl Into<String>, shape: impl Into<String>) -> Self {
        QueryError::UnsupportedShape {
            context: context.into(),
            shape: shape.into(),
        }
    }

    pub(crate) fn decode(
        kind: impl Into<String>,
        literal: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        QueryError::ValueDecode {
            kind: kind.into(),
            literal: literal.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::UnknownField {
            entity: "commits".to_string(),
            field: "parent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "field 'parent' does not exist in the commits structure"
        );

        let err = QueryError::UnknownFunction {
            name: "lower".to_string(),
        };
        assert_eq!(err.to_string(), "unknown function: lower");

        let err = QueryError::Arity {
            function: "contains".to_string(),
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "function contains expects 2 arguments, got 3");

        let err = QueryError::UnsupportedOperator {
            operator: "like".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported comparison operator: like");

        let err = QueryError::shape("select item", "expression a + 1");
        assert_eq!(err.to_string(), "unsupported select item: expression a + 1");

        let err = QueryError::decode("integer", "-1", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "cannot decode integer literal '-1': invalid digit found in string"
        );

        let err = QueryError::UnknownEntity {
            name: "tags".to_string(),
        };
        assert_eq!(err.to_string(), "unknown table: tags");
    }
}
