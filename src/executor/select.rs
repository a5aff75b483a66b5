//! Single-pass SELECT executor.
//!
//! Execution has three phases that never loop back:
//!
//! 1. **Resolve**: the select list is validated and turned into column names
//!    before any record is read. `*` expands to the table's fields in
//!    declared order.
//! 2. **Scan**: records are pulled in source order. The first `offset`
//!    records are skipped without being evaluated. Each remaining record is
//!    filtered, then projected. Any error aborts the pass.
//! 3. **Finalize**: the accumulated rows become a [`ResultTable`].

use crate::access::{Provider, RecordSource, Value};
use crate::error::{QueryError, QueryResult};
use crate::executor::{Pagination, ResultTable, ScanControl};
use crate::expression::{Expression, FunctionRegistry, PredicateEvaluator};
use crate::sql::SelectItem;
use log::debug;

/// Turn a select list into the ordered column names it projects
pub fn resolve_projection(items: &[SelectItem], schema: &[&str]) -> QueryResult<Vec<String>> {
    let mut columns = Vec::with_capacity(items.len());

    for item in items {
        match item {
            SelectItem::AllColumns => columns.extend(schema.iter().map(|f| f.to_string())),
            SelectItem::Expression(Expression::Column(col), _) => columns.push(col.name.clone()),
            SelectItem::Expression(other, _) => {
                return Err(QueryError::shape(
                    "select expr type",
                    format!("{} {}", other.kind(), other),
                ))
            }
        }
    }

    Ok(columns)
}

/// Executor for a SELECT over one table
pub struct SelectExecutor<'a> {
    /// Resolved output columns
    columns: Vec<String>,
    /// WHERE clause, if any
    predicate: Option<&'a Expression>,
    pagination: Pagination,
    evaluator: PredicateEvaluator<'a>,
    /// Rows accepted so far
    rows: Vec<Vec<Value>>,
}

impl<'a> SelectExecutor<'a> {
    /// Resolve the select list against `schema` and prepare for a scan.
    ///
    /// Select items other than `*` and bare columns are rejected here, so a
    /// bad select list never fails halfway through a scan.
    pub fn new(
        items: &[SelectItem],
        schema: &[&str],
        predicate: Option<&'a Expression>,
        pagination: Pagination,
        registry: &'a FunctionRegistry,
    ) -> QueryResult<Self> {
        let columns = resolve_projection(items, schema)?;
        debug!("resolved projection: {:?}", columns);

        Ok(Self {
            columns,
            predicate,
            pagination,
            evaluator: PredicateEvaluator::new(registry),
            rows: Vec::new(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Run the scan and build the result.
    ///
    /// The source is consumed: it is dropped exactly once whether the scan
    /// runs to exhaustion, stops at the limit, or fails.
    pub fn execute<S: RecordSource>(mut self, mut source: S) -> QueryResult<ResultTable> {
        let mut ordinal: u64 = 0;

        while let Some(record) = source.next_record()? {
            let control = match self.scan_record(ordinal, &record) {
                Ok(control) => control,
                Err(e) => {
                    debug!("scan aborted at record {}: {}", ordinal, e);
                    return Err(e);
                }
            };
            ordinal += 1;

            if control == ScanControl::Stop {
                debug!(
                    "limit {} reached after {} records",
                    self.pagination.limit, ordinal
                );
                source.stop();
                break;
            }
        }

        debug!("scan produced {} rows", self.rows.len());
        Ok(ResultTable::new(self.columns, self.rows))
    }

    /// Handle the record at source position `ordinal`
    fn scan_record(&mut self, ordinal: u64, record: &dyn Provider) -> QueryResult<ScanControl> {
        if ordinal < self.pagination.offset {
            return Ok(ScanControl::Continue);
        }

        let accepted = match self.predicate {
            Some(predicate) => self.evaluator.evaluate(record, predicate)?,
            None => true,
        };

        if accepted {
            let row = self
                .columns
                .iter()
                .map(|column| record.get_value(column))
                .collect::<QueryResult<Vec<Value>>>()?;
            self.rows.push(row);
        }

        if self.pagination.is_satisfied(self.rows.len()) {
            Ok(ScanControl::Stop)
        } else {
            Ok(ScanControl::Continue)
        }
    }
}
