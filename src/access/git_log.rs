//! Commit records read from `git log`.
//!
//! The source spawns a `git log` child process and reads its output lazily,
//! one commit per pull, in the order git emits them. Every field, the body
//! included, is terminated by NUL, which git never allows inside a commit
//! message, so a commit is exactly eight NUL-terminated fields and messages
//! survive intact whatever bytes they contain.

use crate::access::{CommitRecord, RecordSource, Signature};
use crate::error::{QueryError, QueryResult};
use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

const FIELD_SEPARATOR: u8 = 0x00;
const FIELD_COUNT: usize = 8;

/// hash, author name/email/date, committer name/email/date, raw body
const LOG_FORMAT: &str = "--format=%H%x00%an%x00%ae%x00%aI%x00%cn%x00%ce%x00%cI%x00%B%x00";

/// Record source over the history reachable from `HEAD`
pub struct GitLogSource {
    repo_path: PathBuf,
    child: Option<Child>,
    reader: Option<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
    buffer: Vec<u8>,
}

impl GitLogSource {
    /// Start walking the history of the repository at `repo_path`
    pub fn open(repo_path: impl AsRef<Path>) -> QueryResult<Self> {
        let repo_path = repo_path.as_ref().to_path_buf();
        debug!("spawning git log in {}", repo_path.display());

        let mut child = Command::new("git")
            .arg("-C")
            .arg(&repo_path)
            .args(["-c", "log.showSignature=false"])
            .args(["log", "--no-color", LOG_FORMAT, "HEAD"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| QueryError::Source {
            message: "git log stdout not captured".to_string(),
        })?;

        // Drained concurrently so a chatty stderr cannot stall stdout
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                if let Err(e) = pipe.read_to_string(&mut text) {
                    debug!("failed to read git log stderr: {}", e);
                }
                text
            })
        });

        Ok(Self {
            repo_path,
            child: Some(child),
            reader: Some(BufReader::new(stdout)),
            stderr,
            buffer: Vec::new(),
        })
    }

    /// Reap the child after its output is exhausted
    fn finish(&mut self) -> QueryResult<()> {
        self.reader = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        let stderr = match self.stderr.take() {
            Some(handle) => handle.join().map_err(|_| QueryError::Source {
                message: "git log stderr reader panicked".to_string(),
            })?,
            None => String::new(),
        };
        if status.success() {
            return Ok(());
        }

        Err(QueryError::Source {
            message: format!(
                "git log in {} exited with {}: {}",
                self.repo_path.display(),
                status,
                stderr.trim()
            ),
        })
    }

    /// Kill the child if it is still running. Safe to call more than once.
    fn release(&mut self) {
        self.reader = None;
        // The reader thread ends on its own once the pipe closes
        self.stderr = None;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!("git log already exited: {}", e);
            }
            if let Err(e) = child.wait() {
                warn!("failed to reap git log: {}", e);
            }
        }
    }
}

impl RecordSource for GitLogSource {
    type Record = CommitRecord;

    fn next_record(&mut self) -> QueryResult<Option<CommitRecord>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.buffer.clear();
        for field in 0..FIELD_COUNT {
            let read = reader.read_until(FIELD_SEPARATOR, &mut self.buffer)?;
            if read > 0 && self.buffer.last() == Some(&FIELD_SEPARATOR) {
                continue;
            }

            if field == 0 && trim_record(&self.buffer).is_empty() {
                self.finish()?;
                return Ok(None);
            }

            self.release();
            return Err(QueryError::Source {
                message: "git log output ended in the middle of a commit".to_string(),
            });
        }

        parse_record(trim_record(&self.buffer)).map(Some)
    }

    fn stop(&mut self) {
        debug!("stopping git log early");
        self.release();
    }
}

impl Drop for GitLogSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Strip the final terminator and the newline git writes between commits
fn trim_record(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(&[FIELD_SEPARATOR]).unwrap_or(raw);
    let mut start = 0;
    while start < raw.len() && (raw[start] == b'\n' || raw[start] == b'\r') {
        start += 1;
    }
    &raw[start..]
}

/// Parse one NUL-separated commit record without its final terminator
pub(crate) fn parse_record(record: &[u8]) -> QueryResult<CommitRecord> {
    let text = String::from_utf8_lossy(record);
    let fields: Vec<&str> = text
        .splitn(FIELD_COUNT, char::from(FIELD_SEPARATOR))
        .collect();

    if fields.len() != FIELD_COUNT {
        return Err(QueryError::Source {
            message: format!(
                "malformed git log record: expected {} fields, got {}",
                FIELD_COUNT,
                fields.len()
            ),
        });
    }

    Ok(CommitRecord {
        hash: fields[0].to_string(),
        author: Signature::new(fields[1], fields[2], parse_time(fields[3])?),
        committer: Signature::new(fields[4], fields[5], parse_time(fields[6])?),
        message: fields[7].to_string(),
    })
}

fn parse_time(s: &str) -> QueryResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).map_err(|e| QueryError::Source {
        message: format!("bad commit timestamp '{}': {}", s, e),
    })
}
