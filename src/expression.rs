//! Predicate evaluation framework for query execution.
//!
//! This module provides:
//! - Expression tree representation
//! - Literal decoding into typed values
//! - A registry of named predicate functions
//! - Predicate evaluation against one record at a time

pub mod eval;
pub mod expr;
pub mod function;
pub mod literal;
pub mod operator;

pub use eval::{compare_values, PredicateEvaluator};
pub use expr::{ColumnRef, Expression, FunctionCall, Literal};
pub use function::{FunctionRegistry, SqlFunction};
pub use literal::{decode_literal, decode_unsigned};
pub use operator::{ArithmeticOperator, ComparisonOperator};
