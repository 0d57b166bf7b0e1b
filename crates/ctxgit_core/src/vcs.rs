//! Per-repository version-control engine.
//!
//! Wraps one repository's on-disk history with branch, commit, log, diff,
//! and working-area file I/O. History lives in `.ctxgit/` next to the
//! tracked files; every call re-reads on-disk state, so nothing is cached
//! across operations.

use crate::diff;
use crate::error::{CtxGitError, Result};
use crate::refs::{Head, Refs};
use crate::types::{Commit, CommitInfo};
use crate::worktree;
use crate::{ObjectId, ObjectStore};
use chrono::Utc;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Name of the per-repository history directory.
pub const HISTORY_DIR: &str = ".ctxgit";

/// Branch created by `init` and checked out by default.
pub const DEFAULT_BRANCH: &str = "master";

/// Default number of commits returned by `log`.
pub const DEFAULT_LOG_LIMIT: usize = 50;

const DEFAULT_AUTHOR: &str = "ctxgit";

/// Handle to one repository's version-control state.
pub struct VcsRepo {
    root: PathBuf,
    store: ObjectStore,
    refs: Refs,
    author: String,
}

impl VcsRepo {
    /// Initializes version-control history in `path`.
    ///
    /// Creates the `.ctxgit/` structure and points HEAD at the default
    /// branch, which stays unborn until the first commit.
    ///
    /// # Errors
    ///
    /// Fails if the directory already contains history.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let history = root.join(HISTORY_DIR);

        if history.exists() {
            return Err(CtxGitError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("history already exists in {}", root.display()),
            )));
        }

        fs::create_dir_all(history.join("objects"))?;
        fs::create_dir_all(history.join("refs").join("heads"))?;

        let refs = Refs::new(&history);
        refs.write_head_branch(DEFAULT_BRANCH)?;

        Ok(Self {
            store: ObjectStore::new(history.join("objects")),
            refs,
            root,
            author: DEFAULT_AUTHOR.to_string(),
        })
    }

    /// Opens existing history in `path`.
    ///
    /// # Errors
    ///
    /// Returns `RepoNotFound` if the history directory is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let history = root.join(HISTORY_DIR);

        if !history.is_dir() {
            return Err(CtxGitError::RepoNotFound(root.display().to_string()));
        }

        Ok(Self {
            store: ObjectStore::new(history.join("objects")),
            refs: Refs::new(&history),
            root,
            author: DEFAULT_AUTHOR.to_string(),
        })
    }

    /// Sets the author recorded on commits created through this handle.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Returns the repository root (parent of `.ctxgit`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns a reference to the content-addressed object store.
    pub fn object_store(&self) -> &ObjectStore {
        &self.store
    }

    /// Returns a reference to the refs manager.
    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// The current checkout target: a branch name, or "HEAD" when the
    /// history pointer does not resolve to a branch (detached).
    pub fn current_branch(&self) -> Result<String> {
        match self.refs.read_head()? {
            Head::Branch(name) => Ok(name),
            Head::Detached(_) => Ok("HEAD".to_string()),
        }
    }

    /// All local branch names, store order.
    pub fn branches(&self) -> Result<Vec<String>> {
        self.refs.list_branches()
    }

    /// Creates a branch at the current history position without switching
    /// to it. Returns the updated branch list.
    ///
    /// # Errors
    ///
    /// Returns `BranchExists` for duplicate names and `BadRefSpec` when the
    /// name is not usable as a ref.
    pub fn create_branch(&self, name: &str) -> Result<Vec<String>> {
        validate_branch_name(name)?;

        if self.refs.branch_exists(name) {
            return Err(CtxGitError::BranchExists(name.to_string()));
        }

        let head = self
            .refs
            .resolve_head()?
            .ok_or_else(|| CtxGitError::BadRefSpec("HEAD".to_string()))?;

        self.refs.write_branch(name, head)?;
        self.branches()
    }

    /// Switches the working area to the given branch.
    ///
    /// Working files are rewritten to the target snapshot; uncommitted
    /// edits do not survive the switch. HEAD is only moved after the
    /// working area has been rewritten.
    ///
    /// # Errors
    ///
    /// Returns `BranchNotFound` if the branch does not exist.
    pub fn checkout(&self, name: &str) -> Result<String> {
        if !self.refs.branch_exists(name) {
            return Err(CtxGitError::BranchNotFound(name.to_string()));
        }

        let commit_id = self.refs.read_branch(name)?;
        let commit = self.store.get_commit(commit_id)?;

        worktree::materialize(&self.root, &self.store, commit.root_tree)?;
        self.refs.write_head_branch(name)?;

        Ok(name.to_string())
    }

    /// Snapshots the entire working area and creates one commit.
    ///
    /// All present, modified, and deleted files are captured; there is no
    /// selective staging. The branch pointer only moves once the commit
    /// object is fully stored.
    ///
    /// # Errors
    ///
    /// Returns `NothingToCommit` when the snapshot equals the current
    /// commit's tree.
    pub fn commit_all(&self, message: &str) -> Result<CommitInfo> {
        let root_tree = worktree::snapshot(&self.root, &self.store)?;

        let parent = self.refs.resolve_head()?;
        if let Some(parent_id) = parent {
            let parent_commit = self.store.get_commit(parent_id)?;
            if parent_commit.root_tree == root_tree {
                return Err(CtxGitError::NothingToCommit);
            }
        }

        let commit = Commit {
            parents: parent.into_iter().collect(),
            root_tree,
            message: message.to_string(),
            author: self.author.clone(),
            timestamp_unix: Utc::now().timestamp(),
        };

        let commit_id = self.store.put_commit(&commit)?;

        match self.refs.read_head()? {
            Head::Branch(branch) => self.refs.write_branch(&branch, commit_id)?,
            Head::Detached(_) => self.refs.write_head_detached(commit_id)?,
        }

        Ok(CommitInfo::from_commit(commit_id, &commit))
    }

    /// Walks history from the current checkout backwards, newest first,
    /// truncated at `max_count`.
    ///
    /// Merges are unimplemented, so the walk follows first parents and is
    /// exact.
    pub fn log(&self, max_count: usize) -> Result<Vec<CommitInfo>> {
        let mut commits = Vec::new();
        let mut cursor = self.refs.resolve_head()?;

        while let Some(id) = cursor {
            if commits.len() >= max_count {
                break;
            }

            let commit = self.store.get_commit(id)?;
            commits.push(CommitInfo::from_commit(id, &commit));
            cursor = commit.parents.first().copied();
        }

        Ok(commits)
    }

    /// Resolves a revision spec to a commit id.
    ///
    /// Grammar: `HEAD`, a branch name, a full or unambiguous-prefix hex
    /// id, optionally suffixed with `~N` for the Nth first-parent
    /// ancestor.
    pub fn resolve_ref(&self, spec: &str) -> Result<ObjectId> {
        let spec = spec.trim();
        let (base, distance) = match spec.split_once('~') {
            Some((base, n)) => {
                let n: usize = n
                    .parse()
                    .map_err(|_| CtxGitError::BadRefSpec(spec.to_string()))?;
                (base, n)
            }
            None => (spec, 0),
        };

        let mut id = self.resolve_base(base, spec)?;

        for _ in 0..distance {
            let commit = self.store.get_commit(id)?;
            id = *commit
                .parents
                .first()
                .ok_or_else(|| CtxGitError::BadRefSpec(spec.to_string()))?;
        }

        Ok(id)
    }

    fn resolve_base(&self, base: &str, spec: &str) -> Result<ObjectId> {
        if base == "HEAD" {
            return self
                .refs
                .resolve_head()?
                .ok_or_else(|| CtxGitError::BadRefSpec(spec.to_string()));
        }

        if self.refs.branch_exists(base) {
            return self.refs.read_branch(base);
        }

        if base.len() == ObjectId::HEX_LEN {
            let id = ObjectId::from_hex(base)?;
            if self.store.is_commit(id) {
                return Ok(id);
            }
            return Err(CtxGitError::BadRefSpec(spec.to_string()));
        }

        if let Some(id) = self.store.find_by_prefix(base)? {
            if self.store.is_commit(id) {
                return Ok(id);
            }
        }

        Err(CtxGitError::BadRefSpec(spec.to_string()))
    }

    /// Produces a unified diff between two revision specs.
    ///
    /// Resolution failure is a deliberate soft-fail: this reporting path
    /// always succeeds, returning an empty diff instead (e.g. `HEAD~1`
    /// before the second commit exists).
    pub fn diff(&self, from: &str, to: &str) -> Result<String> {
        let (from_id, to_id) = match (self.resolve_ref(from), self.resolve_ref(to)) {
            (Ok(a), Ok(b)) => (a, b),
            (from_res, to_res) => {
                debug!(
                    from = from,
                    to = to,
                    from_ok = from_res.is_ok(),
                    to_ok = to_res.is_ok(),
                    "diff refs did not resolve, returning empty diff"
                );
                return Ok(String::new());
            }
        };

        let from_commit = self.store.get_commit(from_id)?;
        let to_commit = self.store.get_commit(to_id)?;

        diff::diff_trees(&self.store, from_commit.root_tree, to_commit.root_tree)
    }

    /// Reads a file from the working area as it currently exists on disk
    /// (reflects the current checkout, including uncommitted edits).
    ///
    /// Returns `None` when the file does not exist. Callers use this to
    /// distinguish "never created" from "empty".
    pub fn read_file(&self, name: &str) -> Result<Option<String>> {
        let path = self.working_path(name)?;

        if !path.is_file() {
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Overwrites (or creates) a file in the working area. Does not
    /// commit; versioning the change is the caller's choice.
    pub fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let path = self.working_path(name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)?;
        Ok(())
    }

    /// Acquires this repository's exclusive lock.
    ///
    /// Blocks until the lock is free. Concurrent operations against the
    /// same repository serialize on this; different repositories lock
    /// independently.
    pub fn lock(&self) -> Result<RepoLock> {
        let path = self.root.join(HISTORY_DIR).join("LOCK");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(RepoLock { file })
    }

    /// Validates a working-area path and resolves it against the root.
    fn working_path(&self, name: &str) -> Result<PathBuf> {
        let rel = Path::new(name);

        if name.is_empty() || rel.is_absolute() {
            return Err(CtxGitError::InvalidPath(name.to_string()));
        }

        for component in rel.components() {
            match component {
                Component::Normal(part) if part.to_str() != Some(HISTORY_DIR) => {}
                _ => return Err(CtxGitError::InvalidPath(name.to_string())),
            }
        }

        Ok(self.root.join(rel))
    }
}

/// RAII guard for a repository's exclusive lock.
///
/// The lock is released when dropped; the LOCK file itself persists.
pub struct RepoLock {
    file: File,
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

fn validate_branch_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.starts_with('-')
        && !name.contains("..")
        && name.split('/').all(|seg| {
            !seg.is_empty()
                && seg != "."
                && seg != ".."
                && seg.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });

    if ok {
        Ok(())
    } else {
        Err(CtxGitError::BadRefSpec(name.to_string()))
    }
}
