//! ctxgit core library
//!
//! Versioned context documents per project, providing:
//! - A store of independent repositories keyed by opaque ids
//! - A content-addressed commit-graph engine (branches, commits, log,
//!   diff, checkout-scoped file I/O)
//! - A structured context document tracked as a single file
//! - Model-specific prompt-pack export
//!
//! # Quick Start
//!
//! ```
//! use ctxgit_core::{ContextData, ContextGit};
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let service = ContextGit::new(tmp.path().join("data")).unwrap();
//!
//! // Create a repository: one branch, one commit.
//! let repo = service.create_repository("demo").unwrap();
//! assert_eq!(repo.current_branch, "master");
//!
//! // Edit the context document, then capture it in history.
//! let mut ctx = ContextData::default();
//! ctx.purpose = "try the API".to_string();
//! service.save_context(&repo.id, &ctx).unwrap();
//! service.commit(&repo.id, "set purpose").unwrap();
//!
//! // Render a prompt pack.
//! let pack = service.export_context(&repo.id, "claude", None).unwrap();
//! assert!(pack.content.contains("try the API"));
//! ```
//!
//! # Layering
//!
//! The service facade delegates durable state changes to the per-repository
//! engine ([`VcsRepo`]), which operates on the store's on-disk layout. File
//! edits and commits are decoupled: [`ContextGit::save_context`] writes the
//! working area only, and history is captured when the caller commits.

pub mod context;
mod diff;
mod error;
mod export;
mod object_id;
mod object_store;
mod refs;
mod service;
mod store;
mod types;
mod vcs;
mod worktree;

pub use context::{ContextData, Decision, DocumentState, GlossaryItem, CONTEXT_FILE};
pub use error::{CtxGitError, Result};
pub use export::{
    ChatGptTemplate, ClaudeTemplate, ExportRegistry, ExportResult, GeminiTemplate, PromptTemplate,
};
pub use object_id::ObjectId;
pub use object_store::ObjectStore;
pub use refs::{Head, Refs};
pub use service::{ContextGit, DEFAULT_DIFF_FROM, DEFAULT_DIFF_TO};
pub use store::{RepoMeta, RepoStore, INITIAL_COMMIT_MESSAGE, META_FILE};
pub use types::{Commit, CommitInfo, DiffResult, RepoInfo, Tree, TreeEntry, TreeEntryKind};
pub use vcs::{RepoLock, VcsRepo, DEFAULT_BRANCH, DEFAULT_LOG_LIMIT, HISTORY_DIR};
