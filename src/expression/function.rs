//! Named predicate functions callable from a WHERE clause.

use crate::access::{Provider, Value};
use crate::error::{QueryError, QueryResult};
use crate::expression::literal::decode_literal;
use crate::expression::Expression;
use std::collections::HashMap;
use std::sync::Arc;

/// A predicate function: receives the current record, the unevaluated
/// argument expressions and the DISTINCT flag.
pub type SqlFunction =
    Arc<dyn Fn(&dyn Provider, &[Expression], bool) -> QueryResult<bool> + Send + Sync>;

/// Immutable lookup table from lower-cased function name to implementation.
///
/// Built once, then shared read-only by every evaluation.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, SqlFunction>,
}

impl FunctionRegistry {
    /// A registry with no functions at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the builtin functions
    pub fn with_builtins() -> Self {
        Self::empty().with_function("contains", contains)
    }

    /// Return a registry that also knows `name`
    pub fn with_function<F>(mut self, name: &str, function: F) -> Self
    where
        F: Fn(&dyn Provider, &[Expression], bool) -> QueryResult<bool> + Send + Sync + 'static,
    {
        self.functions
            .insert(name.to_lowercase(), Arc::new(function));
        self
    }

    /// Find a function by name, ignoring case
    pub fn lookup(&self, name: &str) -> QueryResult<&SqlFunction> {
        self.functions
            .get(&name.to_lowercase())
            .ok_or_else(|| QueryError::UnknownFunction {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// `contains(column, 'text')`: case-sensitive substring test on a string field
pub fn contains(provider: &dyn Provider, args: &[Expression], _distinct: bool) -> QueryResult<bool> {
    if args.len() != 2 {
        return Err(QueryError::Arity {
            function: "contains".to_string(),
            expected: 2,
            actual: args.len(),
        });
    }

    let field = match &args[0] {
        Expression::Column(col) => col.lowered(),
        other => {
            return Err(QueryError::shape(
                "contains argument",
                format!("{} {}", other.kind(), other),
            ))
        }
    };
    let haystack = provider.get_value(&field)?;

    let needle = match &args[1] {
        Expression::Literal(lit) => decode_literal(lit)?,
        other => {
            return Err(QueryError::shape(
                "contains argument",
                format!("{} {}", other.kind(), other),
            ))
        }
    };

    match (&haystack, &needle) {
        (Value::String(haystack), Value::String(needle)) => Ok(haystack.contains(needle.as_str())),
        _ => Err(QueryError::TypeMismatch {
            context: "contains".to_string(),
            left: haystack.data_type().to_string(),
            right: needle.data_type().to_string(),
        }),
    }
}
