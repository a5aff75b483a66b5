//! Per-record field access.

use crate::access::Value;
use crate::catalog::COMMITS_TABLE_NAME;
use crate::error::{QueryError, QueryResult};
use chrono::{DateTime, FixedOffset};

/// Answers "what is the value of field X" for a single record.
///
/// There is one implementation per queryable entity kind. Asking for a
/// field the entity does not have is an error, never an empty value.
pub trait Provider {
    fn get_value(&self, field: &str) -> QueryResult<Value>;
}

/// Who did something, and when
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<FixedOffset>,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: DateTime<FixedOffset>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }
}

/// A single commit from the version history
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl Provider for CommitRecord {
    fn get_value(&self, field: &str) -> QueryResult<Value> {
        match field {
            "author_name" => Ok(Value::String(self.author.name.clone())),
            "author_email" => Ok(Value::String(self.author.email.clone())),
            "committer_name" => Ok(Value::String(self.committer.name.clone())),
            "committer_email" => Ok(Value::String(self.committer.email.clone())),
            "hash" => Ok(Value::String(self.hash.clone())),
            // Author time, not commit time.
            "date" => Ok(Value::Timestamp(self.author.when)),
            "message" => Ok(Value::String(self.message.clone())),
            _ => Err(QueryError::UnknownField {
                entity: COMMITS_TABLE_NAME.to_string(),
                field: field.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use anyhow::Result;

    fn sample_commit() -> Result<CommitRecord> {
        Ok(CommitRecord {
            hash: "9fceb02d0ae598e95dc970b74767f19372d61af8".to_string(),
            author: Signature::new(
                "Alice",
                "alice@example.com",
                DateTime::parse_from_rfc3339("2023-01-15T10:00:00+01:00")?,
            ),
            committer: Signature::new(
                "Bob",
                "bob@example.com",
                DateTime::parse_from_rfc3339("2023-02-01T08:00:00+00:00")?,
            ),
            message: "fix: handle empty input\n".to_string(),
        })
    }

    #[test]
    fn test_commit_fields() -> Result<()> {
        let commit = sample_commit()?;
        assert_eq!(commit.get_value("author_name")?, Value::from("Alice"));
        assert_eq!(
            commit.get_value("author_email")?,
            Value::from("alice@example.com")
        );
        assert_eq!(commit.get_value("committer_name")?, Value::from("Bob"));
        assert_eq!(
            commit.get_value("committer_email")?,
            Value::from("bob@example.com")
        );
        assert_eq!(
            commit.get_value("hash")?,
            Value::from("9fceb02d0ae598e95dc970b74767f19372d61af8")
        );
        assert_eq!(
            commit.get_value("message")?,
            Value::from("fix: handle empty input\n")
        );
        Ok(())
    }

    #[test]
    fn test_date_is_author_time() -> Result<()> {
        let commit = sample_commit()?;
        assert_eq!(
            commit.get_value("date")?,
            Value::Timestamp(commit.author.when)
        );
        assert_ne!(
            commit.get_value("date")?,
            Value::Timestamp(commit.committer.when)
        );
        Ok(())
    }

    #[test]
    fn test_unknown_field() -> Result<()> {
        let commit = sample_commit()?;
        let err = commit.get_value("parent").unwrap_err();
        assert!(matches!(err, QueryError::UnknownField { ref field, .. } if field == "parent"));
        Ok(())
    }

    #[test]
    fn test_every_schema_field_resolves() -> Result<()> {
        let commit = sample_commit()?;
        let fields = Catalog::new().fields(COMMITS_TABLE_NAME)?;
        for field in fields {
            commit.get_value(field)?;
        }
        Ok(())
    }
}
