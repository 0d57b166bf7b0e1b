//! Isolated test environments over tempfile.

use anyhow::{Context, Result};
use ctxgit_core::{ContextData, ContextGit, Decision, GlossaryItem, RepoInfo};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One isolated store with a service facade over it.
pub struct TestWorkspace {
    dir: TempDir,
    service: ContextGit,
}

impl TestWorkspace {
    /// Creates an empty workspace with its own store root.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        let service = ContextGit::new(dir.path().join("data"))?;
        Ok(Self { dir, service })
    }

    /// The service under test.
    pub fn service(&self) -> &ContextGit {
        &self.service
    }

    /// The store root on disk.
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// A repository's on-disk directory.
    pub fn repo_dir(&self, id: &str) -> PathBuf {
        self.data_dir().join(id)
    }

    /// Creates a repository and returns its info.
    pub fn create_repo(&self, name: &str) -> Result<RepoInfo> {
        Ok(self.service.create_repository(name)?)
    }

    /// Saves a context document with just a purpose set.
    pub fn save_purpose(&self, id: &str, purpose: &str) -> Result<()> {
        let mut ctx = self.service.get_context(id)?;
        ctx.purpose = purpose.to_string();
        self.service.save_context(id, &ctx)?;
        Ok(())
    }

    /// Reopens the service over the same store root, simulating a new
    /// process against existing on-disk state.
    pub fn reopen(&self) -> Result<ContextGit> {
        Ok(ContextGit::new(self.data_dir())?)
    }
}

/// A fully populated sample document.
pub fn full_document() -> ContextData {
    ContextData {
        purpose: "Track project knowledge".to_string(),
        assumptions: vec![
            "single writer per repository".to_string(),
            "documents stay small".to_string(),
        ],
        glossary: vec![GlossaryItem {
            term: "export pack".to_string(),
            definition: "prompt text rendered for one model family".to_string(),
        }],
        decisions: vec![Decision {
            title: "explicit commits".to_string(),
            detail: "saving a document never commits it".to_string(),
            date: Some("2026-03-02".to_string()),
        }],
    }
}

/// Checks a path exists, with a readable failure.
pub fn assert_exists(path: &Path) {
    assert!(path.exists(), "expected {} to exist", path.display());
}
