use anyhow::Result;
use chrono::DateTime;
use gitquery::access::{CommitRecord, IterSource, Provider, RecordSource, Signature, Value};
use gitquery::catalog::COMMIT_FIELDS;
use gitquery::expression::{Expression, FunctionRegistry};
use gitquery::output::{format_result, OutputFormat};
use gitquery::{QueryError, QueryResult, Session, SessionConfig};
use std::cell::Cell;
use std::path::Path;
use std::process::{Command, Stdio};
use std::rc::Rc;

fn commit(hash: &str, author: &str, message: &str) -> CommitRecord {
    let when = DateTime::parse_from_rfc3339("2023-01-15T10:00:00+00:00").unwrap();
    CommitRecord {
        hash: hash.to_string(),
        author: Signature::new(author, "author@example.com", when),
        committer: Signature::new("Committer", "committer@example.com", when),
        message: message.to_string(),
    }
}

fn records() -> Vec<CommitRecord> {
    vec![
        commit("a1", "Alice", "fix typo"),
        commit("b2", "Bob", "add docs"),
        commit("a3", "Alice", "prefix cleanup"),
    ]
}

fn session() -> Session {
    Session::new(SessionConfig::default(), FunctionRegistry::with_builtins())
}

fn strings(rows: &[Vec<Value>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect()
}

/// Source that counts how many records were pulled
struct CountingSource {
    records: std::vec::IntoIter<CommitRecord>,
    pulls: Rc<Cell<usize>>,
    stopped: Rc<Cell<bool>>,
}

impl RecordSource for CountingSource {
    type Record = CommitRecord;

    fn next_record(&mut self) -> QueryResult<Option<CommitRecord>> {
        self.pulls.set(self.pulls.get() + 1);
        Ok(self.records.next())
    }

    fn stop(&mut self) {
        self.stopped.set(true);
    }
}

#[test]
fn test_filter_keeps_source_order() -> Result<()> {
    let mut session = session();
    let table = session.execute_with_source(
        "SELECT author_name, hash FROM commits WHERE author_name = \"Alice\"",
        IterSource::new(records().into_iter()),
    )?;

    assert_eq!(table.columns, vec!["author_name", "hash"]);
    assert_eq!(
        strings(&table.rows),
        vec![vec!["Alice", "a1"], vec!["Alice", "a3"]]
    );
    Ok(())
}

#[test]
fn test_limit_with_offset() -> Result<()> {
    let mut session = session();
    let table = session.execute_with_source(
        "SELECT author_name, hash FROM commits LIMIT 1 OFFSET 1",
        IterSource::new(records().into_iter()),
    )?;
    assert_eq!(strings(&table.rows), vec![vec!["Bob", "b2"]]);
    Ok(())
}

#[test]
fn test_contains_matches_substring() -> Result<()> {
    let mut session = session();
    let table = session.execute_with_source(
        "SELECT hash FROM commits WHERE contains(message, 'fix')",
        IterSource::new(records().into_iter()),
    )?;
    // "prefix cleanup" contains "fix" as well
    assert_eq!(strings(&table.rows), vec![vec!["a1"], vec!["a3"]]);

    let table = session.execute_with_source(
        "SELECT hash FROM commits WHERE CONTAINS(message, 'FIX')",
        IterSource::new(records().into_iter()),
    )?;
    assert!(table.is_empty());
    Ok(())
}

#[test]
fn test_wildcard_uses_declared_order() -> Result<()> {
    let mut session = session();
    let table = session.execute_with_source(
        "SELECT * FROM commits LIMIT 1",
        IterSource::new(records().into_iter()),
    )?;
    assert_eq!(table.columns, COMMIT_FIELDS);
    assert_eq!(table.rows[0].len(), COMMIT_FIELDS.len());
    assert_eq!(table.rows[0][4], Value::from("a1"));
    Ok(())
}

#[test]
fn test_limit_stops_pulling() -> Result<()> {
    let pulls = Rc::new(Cell::new(0));
    let stopped = Rc::new(Cell::new(false));
    let source = CountingSource {
        records: records().into_iter(),
        pulls: pulls.clone(),
        stopped: stopped.clone(),
    };

    let mut session = session();
    let table = session.execute_with_source(
        "SELECT hash FROM commits WHERE author_name = 'Alice' LIMIT 1",
        source,
    )?;

    assert_eq!(strings(&table.rows), vec![vec!["a1"]]);
    assert_eq!(pulls.get(), 1);
    assert!(stopped.get());
    Ok(())
}

#[test]
fn test_offset_hides_errors_in_skipped_records() -> Result<()> {
    let mut session = session();

    // Timestamp literal against a text field fails on any evaluated record
    let sql = "SELECT hash FROM commits WHERE author_name = '2023-01-15' LIMIT 5 OFFSET 3";
    let table = session.execute_with_source(sql, IterSource::new(records().into_iter()))?;
    assert!(table.is_empty());

    let sql = "SELECT hash FROM commits WHERE author_name = '2023-01-15' LIMIT 5 OFFSET 2";
    let err = session
        .execute_with_source(sql, IterSource::new(records().into_iter()))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_no_short_circuit() {
    let mut session = session();
    for sql in [
        "SELECT hash FROM commits WHERE hash = 'zz' AND nope = 'x'",
        "SELECT hash FROM commits WHERE hash = 'a1' OR nope = 'x'",
    ] {
        let err = session
            .execute_with_source(sql, IterSource::new(records().into_iter()))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QueryError>(),
            Some(QueryError::UnknownField { .. })
        ));
    }
}

fn error_kind(err: &QueryError) -> &'static str {
    match err {
        QueryError::UnsupportedShape { .. } => "shape",
        QueryError::UnknownField { .. } => "field",
        QueryError::UnknownFunction { .. } => "function",
        QueryError::Arity { .. } => "arity",
        QueryError::TypeMismatch { .. } => "type",
        QueryError::UnsupportedOperator { .. } => "operator",
        QueryError::ValueDecode { .. } => "decode",
        QueryError::UnknownEntity { .. } => "entity",
        QueryError::MultipleSources { .. } => "sources",
        QueryError::Source { .. } => "source",
        QueryError::Io(_) => "io",
    }
}

#[test]
fn test_error_kinds() {
    let mut session = session();
    let cases = [
        ("SELECT hash FROM commits WHERE missing(message)", "function"),
        ("SELECT hash FROM commits WHERE contains(message)", "arity"),
        ("SELECT hash FROM commits WHERE contains(date, 'x')", "type"),
        ("SELECT hash FROM commits WHERE message LIKE 'fix%'", "operator"),
        ("SELECT hash FROM commits WHERE NOT hash = 'a1'", "shape"),
        ("SELECT hash FROM commits WHERE hash = TRUE", "decode"),
        ("SELECT count(hash) FROM commits", "shape"),
        ("SELECT hash FROM refs", "entity"),
        ("SELECT hash FROM commits, commits", "sources"),
    ];

    for (sql, expected) in cases {
        let err = session
            .execute_with_source(sql, IterSource::new(records().into_iter()))
            .unwrap_err();
        let query_err = err
            .downcast_ref::<QueryError>()
            .unwrap_or_else(|| panic!("{}: not a query error: {}", sql, err));
        assert_eq!(error_kind(query_err), expected, "{}: {}", sql, query_err);
    }
}

#[test]
fn test_custom_function_registry() -> Result<()> {
    fn by_bob(provider: &dyn Provider, _args: &[Expression], _distinct: bool) -> QueryResult<bool> {
        Ok(provider.get_value("author_name")? == Value::from("Bob"))
    }

    let registry = FunctionRegistry::empty().with_function("by_bob", by_bob);
    let mut session = Session::new(SessionConfig::default(), registry);

    let table = session.execute_with_source(
        "SELECT hash FROM commits WHERE by_bob()",
        IterSource::new(records().into_iter()),
    )?;
    assert_eq!(strings(&table.rows), vec![vec!["b2"]]);

    let err = session
        .execute_with_source(
            "SELECT hash FROM commits WHERE contains(message, 'fix')",
            IterSource::new(records().into_iter()),
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::UnknownFunction { .. })
    ));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let mut session = session();
    let table = session.execute_with_source(
        "SELECT hash, date FROM commits LIMIT 1",
        IterSource::new(records().into_iter()),
    )?;
    let json: serde_json::Value = serde_json::from_str(&format_result(&table, OutputFormat::Json)?)?;
    assert_eq!(
        json,
        serde_json::json!({
            "columns": ["hash", "date"],
            "rows": [["a1", "2023-01-15T10:00:00+00:00"]]
        })
    );
    Ok(())
}

fn git(dir: &Path, args: &[&str], author: &str, date: &str) -> std::io::Result<bool> {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", "dev@example.com")
        .env("GIT_COMMITTER_NAME", author)
        .env("GIT_COMMITTER_EMAIL", "dev@example.com")
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    Ok(status.success())
}

#[test]
fn test_query_real_repository() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // Skip quietly on machines without git.
    match git(dir.path(), &["init", "-q"], "Alice", "2023-01-01T00:00:00+00:00") {
        Ok(true) => {}
        _ => return Ok(()),
    }

    let history = [
        ("Alice", "initial import", "2023-01-01T12:00:00+00:00"),
        ("Bob", "fix build", "2023-01-10T12:00:00+00:00"),
        ("Alice", "fix tests", "2023-01-20T12:00:00+00:00"),
    ];
    for (author, message, date) in history {
        assert!(git(
            dir.path(),
            &["commit", "-q", "--allow-empty", "-m", message],
            author,
            date
        )?);
    }

    let mut session = Session::new(
        SessionConfig::new(dir.path()),
        FunctionRegistry::with_builtins(),
    );

    let table = session.execute(
        "select author_name, message from commits where contains(message, 'fix') and date > '2023-01-05'",
    )?;
    assert_eq!(
        table
            .rows
            .iter()
            .map(|row| (row[0].to_string(), row[1].to_string().trim_end().to_string()))
            .collect::<Vec<_>>(),
        vec![
            ("Alice".to_string(), "fix tests".to_string()),
            ("Bob".to_string(), "fix build".to_string()),
        ]
    );

    let table = session.execute("SELECT hash FROM commits LIMIT 1")?;
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0][0].to_string().len(), 40);
    Ok(())
}
