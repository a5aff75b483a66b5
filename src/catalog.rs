//! Field schemas of the queryable tables.
//!
//! The catalog is static: it maps each table name to its ordered field list.
//! The order is the one used for `SELECT *` and for `SHOW TABLES`.

use crate::error::{QueryError, QueryResult};
use log::debug;

pub const COMMITS_TABLE_NAME: &str = "commits";

/// Fields of the `commits` table, in declared order.
pub const COMMIT_FIELDS: &[&str] = &[
    "author_name",
    "author_email",
    "committer_name",
    "committer_email",
    "hash",
    "date",
    "message",
];

/// Names that are reserved for future tables but cannot be queried yet.
pub const RESERVED_TABLE_NAMES: &[&str] = &["refs", "tags", "branches"];

/// Kinds of entity a query can read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Commits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: &'static str,
    pub kind: TableKind,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<TableInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: vec![TableInfo {
                name: COMMITS_TABLE_NAME,
                kind: TableKind::Commits,
                fields: COMMIT_FIELDS,
            }],
        }
    }

    /// All queryable tables, in registration order
    pub fn list_tables(&self) -> &[TableInfo] {
        &self.tables
    }

    /// Look up a table by name.
    ///
    /// Reserved names fail the same way unknown names do.
    pub fn get_table(&self, name: &str) -> QueryResult<&TableInfo> {
        if let Some(table) = self.tables.iter().find(|t| t.name == name) {
            return Ok(table);
        }

        if RESERVED_TABLE_NAMES.contains(&name) {
            debug!("table '{}' is reserved but not implemented", name);
        }

        Err(QueryError::UnknownEntity {
            name: name.to_string(),
        })
    }

    /// Ordered field list of a table
    pub fn fields(&self, name: &str) -> QueryResult<&'static [&'static str]> {
        Ok(self.get_table(name)?.fields)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_commits_schema_order() -> Result<()> {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.fields("commits")?,
            &[
                "author_name",
                "author_email",
                "committer_name",
                "committer_email",
                "hash",
                "date",
                "message",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_get_table() -> Result<()> {
        let catalog = Catalog::new();
        let table = catalog.get_table("commits")?;
        assert_eq!(table.kind, TableKind::Commits);
        assert_eq!(catalog.list_tables().len(), 1);
        Ok(())
    }

    #[test]
    fn test_reserved_and_unknown_tables_fail() {
        let catalog = Catalog::new();
        for name in ["refs", "tags", "branches", "users", "COMMITS"] {
            let err = catalog.get_table(name).unwrap_err();
            assert!(
                matches!(err, QueryError::UnknownEntity { name: ref n } if n == name),
                "{} should be unknown",
                name
            );
        }
    }
}
