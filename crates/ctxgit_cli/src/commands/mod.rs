//! CLI command implementations.

pub mod branch;
pub mod context;
pub mod export;
pub mod history;
pub mod repo;

use anyhow::{Context as _, Result};
use ctxgit_core::ContextGit;
use std::path::Path;

/// Opens the service over the store root.
pub(crate) fn service(data_dir: &Path) -> Result<ContextGit> {
    tracing::debug!(data_dir = %data_dir.display(), "opening store");
    ContextGit::new(data_dir)
        .with_context(|| format!("Failed to open store at {}", data_dir.display()))
}
