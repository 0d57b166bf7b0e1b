//! Core data types for ctxgit.

use crate::ObjectId;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A stored commit: an immutable snapshot of tracked files plus metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Parent commit ids (empty for the initial commit).
    pub parents: Vec<ObjectId>,
    /// Root tree of the snapshot.
    pub root_tree: ObjectId,
    /// Commit message.
    pub message: String,
    /// Author string.
    pub author: String,
    /// Creation time as Unix seconds (UTC).
    pub timestamp_unix: i64,
}

/// File hierarchy snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    /// Sorted list of entries (MUST be sorted by name for determinism).
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Creates a new tree, automatically sorting entries by name.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }
}

/// Entry in a tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Name of the entry (filename or directory name).
    pub name: String,
    /// Type of entry.
    pub kind: TreeEntryKind,
    /// ObjectId pointing to the content (blob or subtree).
    pub id: ObjectId,
}

/// Type of tree entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEntryKind {
    /// Regular file (blob).
    Blob,
    /// Directory (subtree).
    Tree,
}

/// Commit metadata as surfaced to callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Short content-derived identifier (12 hex chars).
    pub hash: String,
    /// Commit message.
    pub message: String,
    /// Author string.
    pub author: String,
    /// Commit date with timezone.
    pub date: DateTime<Utc>,
}

impl CommitInfo {
    /// Builds the caller-facing view of a stored commit.
    pub fn from_commit(id: ObjectId, commit: &Commit) -> Self {
        let date = Utc
            .timestamp_opt(commit.timestamp_unix, 0)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap());
        Self {
            hash: id.short(),
            message: commit.message.clone(),
            author: commit.author.clone(),
            date,
        }
    }
}

/// Result of a two-ref diff request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Unified line diff, empty when the refs do not resolve.
    pub diff_text: String,
    /// The base ref as requested.
    pub from_ref: String,
    /// The target ref as requested.
    pub to_ref: String,
}

/// A repository as surfaced to callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Opaque repository id.
    pub id: String,
    /// Display name from the metadata file.
    pub name: String,
    /// Current checkout target ("HEAD" when detached).
    pub current_branch: String,
    /// All local branch names, store order.
    pub branches: Vec<String>,
}
