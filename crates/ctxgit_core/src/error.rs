//! Error types for ctxgit_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ctxgit_core operations.
#[derive(Error, Debug)]
pub enum CtxGitError {
    /// Repository id does not resolve to a valid repository directory.
    #[error("repository not found: {0}")]
    RepoNotFound(String),

    /// Branch name does not exist in the repository.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Branch with this name already exists.
    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// Export target name is not registered.
    #[error("unknown export target: {0}")]
    UnknownTarget(String),

    /// Operation is reserved for a future capability.
    #[error("not yet supported: {0}")]
    Unimplemented(&'static str),

    /// Working area matches the parent commit; nothing to snapshot.
    #[error("nothing to commit: working area matches the current commit")]
    NothingToCommit,

    /// Object with the given ID was not found in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Hash verification failed during object read.
    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        /// The expected object ID
        expected: String,
        /// The actual computed hash
        actual: String,
    },

    /// The object file is corrupted or has invalid format.
    #[error("corrupted object at {}: {}", path.display(), reason)]
    CorruptedObject {
        /// Path to the corrupted object
        path: PathBuf,
        /// Description of the corruption
        reason: String,
    },

    /// Invalid hex string for ObjectId parsing.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Invalid ref file content or format.
    #[error("invalid ref at {}: {}", path.display(), reason)]
    InvalidRef {
        /// Path to the invalid ref file
        path: PathBuf,
        /// Description of what's invalid
        reason: String,
    },

    /// A revision spec (branch name, HEAD~N, hex id) could not be resolved.
    #[error("cannot resolve revision: {0}")]
    BadRefSpec(String),

    /// File path escapes the repository root or targets internal state.
    #[error("invalid repository path: {0}")]
    InvalidPath(String),

    /// The tracked context document exists but cannot be parsed.
    #[error("malformed context document: {0}")]
    MalformedDocument(String),

    /// Repository metadata file is missing or cannot be parsed.
    #[error("repository metadata error: {0}")]
    Metadata(String),

    /// Serialization error during typed object operations.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error during typed object operations.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Compression or decompression failed.
    #[error("compression error: {0}")]
    Compression(String),

    /// Blob exceeds maximum allowed size.
    #[error("blob too large: {size} bytes exceeds limit of {limit} bytes")]
    BlobTooLarge {
        /// Actual size of the blob
        size: usize,
        /// Maximum allowed size
        limit: usize,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CtxGitError {
    /// Whether this error means "the named thing does not exist"; the
    /// boundary layer maps these to a 404-equivalent signal.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RepoNotFound(_) | Self::BranchNotFound(_) | Self::ObjectNotFound(_)
        )
    }

    /// Whether this error is a conflict with existing state (409-equivalent).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::BranchExists(_))
    }
}

/// Convenience Result type for ctxgit_core operations.
pub type Result<T> = std::result::Result<T, CtxGitError>;
