//! The external interface: one facade over store, engine, document
//! manager, and export registry.
//!
//! Constructed once at process start and passed into callers explicitly;
//! there are no global service instances. Every operation against a
//! repository takes that repository's exclusive lock first, so a
//! checkout+read/write+commit sequence is atomic as seen by concurrent
//! callers; operations on different repositories never contend.

use crate::context::{self, ContextData};
use crate::error::{CtxGitError, Result};
use crate::export::{ExportRegistry, ExportResult};
use crate::store::RepoStore;
use crate::types::{CommitInfo, DiffResult, RepoInfo};
use crate::vcs::DEFAULT_LOG_LIMIT;
use std::path::Path;

/// Default base ref for diff requests.
pub const DEFAULT_DIFF_FROM: &str = "HEAD~1";

/// Default target ref for diff requests.
pub const DEFAULT_DIFF_TO: &str = "HEAD";

/// Service facade exposing every external operation.
pub struct ContextGit {
    store: RepoStore,
    exports: ExportRegistry,
}

impl ContextGit {
    /// Creates a service over a store rooted at `data_dir`, with the
    /// built-in export targets.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            store: RepoStore::new(data_dir)?,
            exports: ExportRegistry::with_builtin_targets(),
        })
    }

    /// Creates a service from explicitly constructed parts.
    pub fn with_parts(store: RepoStore, exports: ExportRegistry) -> Self {
        Self { store, exports }
    }

    /// Returns the underlying repository store.
    pub fn store(&self) -> &RepoStore {
        &self.store
    }

    /// Creates a repository: id allocation, history init, metadata file,
    /// default context document, and the single initial commit.
    pub fn create_repository(&self, name: &str) -> Result<RepoInfo> {
        self.store.create(name)
    }

    /// Enumerates valid repositories.
    pub fn list_repositories(&self) -> Result<Vec<RepoInfo>> {
        self.store.list()
    }

    /// Returns one repository's info.
    pub fn get_repository(&self, id: &str) -> Result<RepoInfo> {
        self.store.get_info(id)
    }

    /// Irreversibly deletes a repository.
    pub fn delete_repository(&self, id: &str) -> Result<()> {
        {
            let repo = self.store.open(id)?;
            let _lock = repo.lock()?;
        }
        self.store.delete(id)
    }

    /// Lists branch names.
    pub fn list_branches(&self, id: &str) -> Result<Vec<String>> {
        self.store.open(id)?.branches()
    }

    /// Creates a branch at the current history position; returns the
    /// updated branch list. Does not switch.
    pub fn create_branch(&self, id: &str, name: &str) -> Result<Vec<String>> {
        let repo = self.store.open(id)?;
        let _lock = repo.lock()?;
        repo.create_branch(name)
    }

    /// Checks out a branch, rewriting the working area.
    pub fn checkout(&self, id: &str, branch: &str) -> Result<String> {
        let repo = self.store.open(id)?;
        let _lock = repo.lock()?;
        repo.checkout(branch)
    }

    /// Commits all working-area changes as one commit.
    pub fn commit(&self, id: &str, message: &str) -> Result<CommitInfo> {
        let repo = self.store.open(id)?;
        let _lock = repo.lock()?;
        repo.commit_all(message)
    }

    /// Lists commits from the current checkout, newest first.
    pub fn list_commits(&self, id: &str, max_count: Option<usize>) -> Result<Vec<CommitInfo>> {
        self.store
            .open(id)?
            .log(max_count.unwrap_or(DEFAULT_LOG_LIMIT))
    }

    /// Diffs two revision specs; unresolvable refs yield an empty diff.
    pub fn get_diff(
        &self,
        id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<DiffResult> {
        let from = from.unwrap_or(DEFAULT_DIFF_FROM);
        let to = to.unwrap_or(DEFAULT_DIFF_TO);

        let diff_text = self.store.open(id)?.diff(from, to)?;

        Ok(DiffResult {
            diff_text,
            from_ref: from.to_string(),
            to_ref: to.to_string(),
        })
    }

    /// Diffs one branch against another (target as base, source on top).
    pub fn diff_branches(&self, id: &str, source: &str, target: &str) -> Result<DiffResult> {
        self.get_diff(id, Some(target), Some(source))
    }

    /// Returns the context document; absent file means the empty default.
    pub fn get_context(&self, id: &str) -> Result<ContextData> {
        context::get(&self.store.open(id)?)
    }

    /// Saves the context document without committing, returning it as
    /// re-read through the engine.
    pub fn save_context(&self, id: &str, data: &ContextData) -> Result<ContextData> {
        let repo = self.store.open(id)?;
        let _lock = repo.lock()?;
        context::save(&repo, data)?;
        context::get(&repo)
    }

    /// Renders the context document for an export target.
    ///
    /// When `branch` is given it is checked out first: the repository's
    /// current branch changes as an observable consequence of the export.
    pub fn export_context(
        &self,
        id: &str,
        target: &str,
        branch: Option<&str>,
    ) -> Result<ExportResult> {
        let repo = self.store.open(id)?;
        let _lock = repo.lock()?;

        if let Some(branch) = branch {
            repo.checkout(branch)?;
        }

        let ctx = context::get(&repo)?;
        let content = self.exports.render(target, &ctx)?;

        Ok(ExportResult {
            target: target.to_string(),
            content,
        })
    }

    /// Enumerates available export targets.
    pub fn list_export_targets(&self) -> Vec<String> {
        self.exports.targets()
    }

    /// Reserved: merging one branch into another.
    pub fn merge_branch(&self, id: &str, _source: &str, _target: &str) -> Result<CommitInfo> {
        // Resolve the repository first so unknown ids still fail NotFound.
        self.store.resolve(id)?;
        Err(CtxGitError::Unimplemented("branch merge"))
    }
}
