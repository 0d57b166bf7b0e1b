//! Branch commands.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// List branches of a repository.
pub fn list(data_dir: &Path, id: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let current = service.get_repository(id)?.current_branch;

    for branch in service.list_branches(id)? {
        if branch == current {
            println!("* {}", style(&branch).green());
        } else {
            println!("  {}", branch);
        }
    }

    Ok(())
}

/// Create a branch at the current history position.
pub fn create(data_dir: &Path, id: &str, name: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let branches = service
        .create_branch(id, name)
        .context("Failed to create branch")?;

    println!("Created branch {}", style(name).green());
    println!("Branches: {}", branches.join(", "));

    Ok(())
}

/// Switch the working area to a branch.
pub fn checkout(data_dir: &Path, id: &str, branch: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let current = service.checkout(id, branch)?;

    println!("Switched to branch {}", style(&current).green());
    Ok(())
}
