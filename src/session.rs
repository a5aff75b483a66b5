//! Session management for running queries against a repository.

use crate::access::{GitLogSource, RecordSource, Value};
use crate::catalog::{Catalog, TableInfo};
use crate::error::{QueryError, QueryResult};
use crate::executor::{Pagination, ResultTable, SelectExecutor};
use crate::expression::{decode_unsigned, Expression, FunctionRegistry};
use crate::sql::{parse_statement, SelectStatement, Statement, TableFactor};
use anyhow::Result;
use log::{debug, info};
use std::path::PathBuf;

/// Settings a session runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Repository whose history `commits` reads
    pub repo_path: PathBuf,
}

impl SessionConfig {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Runs one query at a time against a repository.
pub struct Session {
    config: SessionConfig,
    catalog: Catalog,
    registry: FunctionRegistry,
    /// Number of statements executed successfully
    query_count: u64,
}

impl Session {
    /// Creates a new session.
    pub fn new(config: SessionConfig, registry: FunctionRegistry) -> Self {
        Session {
            config,
            catalog: Catalog::new(),
            registry,
            query_count: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query_count(&self) -> u64 {
        self.query_count
    }

    /// Executes a SQL statement, reading commits from the configured
    /// repository.
    pub fn execute(&mut self, sql: &str) -> Result<ResultTable> {
        debug!("executing query: {}", sql);

        let table = match parse_statement(sql)? {
            Statement::ShowTables => self.show_tables(),
            Statement::Select(select) => {
                let (executor, info) = self.prepare_select(&select)?;
                debug!(
                    "reading table '{}' from {}",
                    info.name,
                    self.config.repo_path.display()
                );
                let source = GitLogSource::open(&self.config.repo_path)?;
                executor.execute(source)?
            }
        };

        Ok(self.finish(table))
    }

    /// Executes a SQL statement over records supplied by the caller.
    ///
    /// The table named in FROM must still exist in the catalog; its field
    /// list is what `*` expands to.
    pub fn execute_with_source<S: RecordSource>(
        &mut self,
        sql: &str,
        source: S,
    ) -> Result<ResultTable> {
        debug!("executing query with supplied source: {}", sql);

        let table = match parse_statement(sql)? {
            Statement::ShowTables => self.show_tables(),
            Statement::Select(select) => {
                let (executor, _) = self.prepare_select(&select)?;
                executor.execute(source)?
            }
        };

        Ok(self.finish(table))
    }

    /// Resolve the table and pagination of a SELECT and build its executor.
    ///
    /// Nothing here reads a record, so every error is reported before a
    /// source is opened.
    fn prepare_select<'s>(
        &'s self,
        select: &'s SelectStatement,
    ) -> QueryResult<(SelectExecutor<'s>, &'s TableInfo)> {
        let info = self.resolve_table(&select.from)?;

        let pagination = Pagination::new(
            pagination_value(select.limit.as_ref(), "limit")?,
            pagination_value(select.offset.as_ref(), "offset")?,
        );

        let executor = SelectExecutor::new(
            &select.projections,
            info.fields,
            select.where_clause.as_ref(),
            pagination,
            &self.registry,
        )?;

        Ok((executor, info))
    }

    fn resolve_table(&self, from: &[TableFactor]) -> QueryResult<&TableInfo> {
        match from {
            [TableFactor::Table { name, .. }] => {
                let info = self.catalog.get_table(name)?;
                debug!("resolved table '{}' as {:?}", name, info.kind);
                Ok(info)
            }
            [TableFactor::Derived(inner)] => Err(QueryError::shape(
                "table expression",
                format!("subselect over {} table(s)", inner.from.len()),
            )),
            factors => Err(QueryError::MultipleSources {
                count: factors.len(),
            }),
        }
    }

    /// List every table with its comma separated fields
    pub fn show_tables(&self) -> ResultTable {
        let rows = self
            .catalog
            .list_tables()
            .iter()
            .map(|t| vec![Value::from(t.name), Value::from(t.fields.join(", "))])
            .collect();

        ResultTable::new(vec!["table".to_string(), "fields".to_string()], rows)
    }

    fn finish(&mut self, table: ResultTable) -> ResultTable {
        self.query_count += 1;
        info!("query returned {} row(s)", table.len());
        table
    }
}

/// Decode a LIMIT or OFFSET clause. A missing clause is zero.
fn pagination_value(expr: Option<&Expression>, clause: &str) -> QueryResult<u64> {
    match expr {
        None => Ok(0),
        Some(Expression::Literal(lit)) => decode_unsigned(lit),
        Some(other) => Err(QueryError::shape(
            format!("{} expression", clause),
            other.to_string(),
        )),
    }
}
