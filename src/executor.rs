//! Executor layer for query execution.
//!
//! A query runs as a single pass over a record source: the projection is
//! resolved up front, records are pulled one at a time, filtered and
//! projected, and the pass stops as soon as the row limit is satisfied.

use crate::access::Value;
use serde::Serialize;

pub mod select;

pub use select::{resolve_projection, SelectExecutor};

/// LIMIT/OFFSET of a query. Zero means "no limit" and "start at the
/// first record" respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Whether `rows` accepted rows satisfy the limit
    pub fn is_satisfied(&self, rows: usize) -> bool {
        self.limit != 0 && rows as u64 >= self.limit
    }
}

/// What the scan loop should do after handling one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    Stop,
}

/// Columns and rows produced by a query.
///
/// Each row holds one value per column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_satisfied() {
        assert!(!Pagination::default().is_satisfied(1_000));
        assert!(!Pagination::new(2, 0).is_satisfied(1));
        assert!(Pagination::new(2, 0).is_satisfied(2));
        assert!(Pagination::new(2, 5).is_satisfied(3));
    }

    #[test]
    fn test_result_table() {
        let table = ResultTable::new(vec!["hash".to_string()], vec![vec![Value::from("a1")]]);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
        assert!(ResultTable::default().is_empty());
    }
}
