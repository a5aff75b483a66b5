//! Access layer for record-oriented reads.
//!
//! This module provides the abstractions the query engine reads through:
//!
//! - **Value**: Typed representation of field and literal values
//! - **Provider**: Per-record field lookup, one implementation per table
//! - **RecordSource**: Ordered, single-pass stream of records
//! - **GitLogSource**: Commits of a repository, read from `git log`

pub mod git_log;
pub mod provider;
pub mod scan;
pub mod value;

pub use git_log::GitLogSource;
pub use provider::{CommitRecord, Provider, Signature};
pub use scan::{IterSource, RecordSource};
pub use value::{DataType, Value};
