//! Branch pointers and the symbolic HEAD.
//!
//! Branch refs live under `refs/heads/<name>` as single-line hex files.
//! `HEAD` is either symbolic (`ref: <branch>`) or detached (a raw hex id).
//! All writes are atomic using temp file + fsync + rename.

use crate::error::{CtxGitError, Result};
use crate::ObjectId;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The checkout target recorded in HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD points at a branch by name.
    Branch(String),
    /// HEAD points directly at a commit.
    Detached(ObjectId),
}

/// Manages branch refs and HEAD for one repository.
pub struct Refs {
    root: PathBuf,
}

impl Refs {
    /// Creates a new Refs manager for the given history directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Reads HEAD.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRef` if HEAD is missing or malformed; a repository
    /// always has a HEAD once initialized.
    pub fn read_head(&self) -> Result<Head> {
        let path = self.root.join("HEAD");

        if !path.exists() {
            return Err(CtxGitError::InvalidRef {
                path,
                reason: "HEAD missing".to_string(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let trimmed = content.trim();

        if let Some(branch) = trimmed.strip_prefix("ref: ") {
            let branch = branch.trim();
            if branch.is_empty() {
                return Err(CtxGitError::InvalidRef {
                    path,
                    reason: "empty branch name in HEAD".to_string(),
                });
            }
            return Ok(Head::Branch(branch.to_string()));
        }

        let id = ObjectId::from_hex(trimmed).map_err(|_| CtxGitError::InvalidRef {
            path,
            reason: "HEAD is neither symbolic nor a valid object id".to_string(),
        })?;
        Ok(Head::Detached(id))
    }

    /// Points HEAD at a branch (symbolic).
    pub fn write_head_branch(&self, branch: &str) -> Result<()> {
        self.write_file_atomic(&self.root.join("HEAD"), &format!("ref: {}\n", branch))
    }

    /// Points HEAD directly at a commit (detached).
    pub fn write_head_detached(&self, id: ObjectId) -> Result<()> {
        self.write_file_atomic(&self.root.join("HEAD"), &format!("{}\n", id.as_hex()))
    }

    /// Resolves HEAD to a commit id.
    ///
    /// Returns `None` when HEAD points at an unborn branch (a branch name
    /// with no ref file yet, the state between `init` and the first
    /// commit).
    pub fn resolve_head(&self) -> Result<Option<ObjectId>> {
        match self.read_head()? {
            Head::Detached(id) => Ok(Some(id)),
            Head::Branch(name) => {
                if self.branch_exists(&name) {
                    Ok(Some(self.read_branch(&name)?))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Reads a branch ref.
    ///
    /// # Errors
    ///
    /// Returns `BranchNotFound` if the branch doesn't exist.
    pub fn read_branch(&self, name: &str) -> Result<ObjectId> {
        let path = self.branch_path(name);

        if !path.exists() {
            return Err(CtxGitError::BranchNotFound(name.to_string()));
        }

        self.read_ref_file(&path)
    }

    /// Writes a branch ref atomically, creating parent directories for
    /// nested names (e.g. "feature/login").
    pub fn write_branch(&self, name: &str, id: ObjectId) -> Result<()> {
        let path = self.branch_path(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.write_file_atomic(&path, &format!("{}\n", id.as_hex()))
    }

    /// Whether a branch ref exists.
    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name).is_file()
    }

    /// Lists all branch names, sorted for deterministic output.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let heads = self.root.join("refs").join("heads");

        if !heads.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        self.collect_branches(&heads, &heads, &mut names)?;
        names.sort();

        Ok(names)
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.root.join("refs").join("heads").join(name)
    }

    /// Reads an ObjectId from a ref file.
    fn read_ref_file(&self, path: &Path) -> Result<ObjectId> {
        let content = fs::read_to_string(path)?;
        let trimmed = content.trim();

        if trimmed.len() != ObjectId::HEX_LEN {
            return Err(CtxGitError::InvalidRef {
                path: path.to_path_buf(),
                reason: format!("expected {} hex chars, got {}", ObjectId::HEX_LEN, trimmed.len()),
            });
        }

        ObjectId::from_hex(trimmed).map_err(|_| CtxGitError::InvalidRef {
            path: path.to_path_buf(),
            reason: "invalid hex string".to_string(),
        })
    }

    /// Writes ref content atomically with temp file + fsync + rename.
    fn write_file_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, path)?;

        // fsync parent directory (Unix-specific for crash safety)
        #[cfg(unix)]
        {
            if let Some(parent) = path.parent() {
                if let Ok(dir_file) = File::open(parent) {
                    let _ = dir_file.sync_all();
                }
            }
        }

        Ok(())
    }

    /// Recursively collects branch names under refs/heads.
    fn collect_branches(
        &self,
        current: &Path,
        base: &Path,
        names: &mut Vec<String>,
    ) -> Result<()> {
        for entry in fs::read_dir(current)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.collect_branches(&path, base, names)?;
            } else if path.is_file() {
                if path.extension().and_then(|s| s.to_str()) == Some("tmp") {
                    continue;
                }

                if let Ok(rel) = path.strip_prefix(base) {
                    if let Some(name) = rel.to_str() {
                        names.push(name.to_string());
                    }
                }
            }
        }

        Ok(())
    }
}
