use crate::error::{GchartError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use gix::{discover, ObjectId, Repository};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

/// An instant a commit was recorded at, carrying the offset the source
/// stored. Consumed only for its calendar day in the reference zone.
pub type CommitTimestamp = DateTime<FixedOffset>;

/// A repository backend able to stream its commit timestamps. Streams are
/// consumed lazily; a full history is never held in memory.
pub trait CommitLogSource {
    /// Identifier used in diagnostics, normally the path the user gave.
    fn label(&self) -> &str;

    fn timestamps(&self) -> Result<Box<dyn Iterator<Item = Result<CommitTimestamp>> + '_>>;
}

/// Open the backend for `path`. Only git repositories are recognized; the
/// backend is picked by inspecting the path, not configured by the caller.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn CommitLogSource>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GchartError::RepositoryUnavailable {
            path: path.to_path_buf(),
            reason: "path does not exist".to_string(),
        });
    }

    let repo = discover(path).map_err(|e| GchartError::RepositoryUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(Box::new(GitLogSource {
        label: path.display().to_string(),
        repo,
    }))
}

pub struct GitLogSource {
    label: String,
    repo: Repository,
}

impl CommitLogSource for GitLogSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn timestamps(&self) -> Result<Box<dyn Iterator<Item = Result<CommitTimestamp>> + '_>> {
        let head = self.repo.head()?;

        // An unborn HEAD has no commits; that is an empty stream, not an error.
        let stack: VecDeque<ObjectId> = match head.id() {
            Some(id) => VecDeque::from([id.detach()]),
            None => VecDeque::new(),
        };

        Ok(Box::new(Timestamps {
            repo: &self.repo,
            stack,
            seen: HashSet::new(),
        }))
    }
}

struct Timestamps<'repo> {
    repo: &'repo Repository,
    stack: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl Iterator for Timestamps<'_> {
    type Item = Result<CommitTimestamp>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(commit_id) = self.stack.pop_back() {
            if !self.seen.insert(commit_id) {
                continue;
            }

            let commit = match self.repo.find_commit(commit_id) {
                Ok(commit) => commit,
                Err(e) => return Some(Err(e.into())),
            };

            for pid in commit.parent_ids() {
                self.stack.push_back(pid.detach());
            }

            return Some(match commit.time() {
                Ok(time) => to_timestamp(time.seconds, time.offset),
                Err(e) => Err(GchartError::MalformedTimestamp(e.to_string())),
            });
        }
        None
    }
}

fn to_timestamp(seconds: i64, offset: i32) -> Result<CommitTimestamp> {
    let zone = FixedOffset::east_opt(offset).ok_or_else(|| {
        GchartError::MalformedTimestamp(format!("UTC offset {offset}s out of range"))
    })?;
    let utc = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
        GchartError::MalformedTimestamp(format!("timestamp {seconds}s out of range"))
    })?;
    Ok(utc.with_timezone(&zone))
}
