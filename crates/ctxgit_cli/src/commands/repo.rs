//! Repository lifecycle commands.

use anyhow::{bail, Context, Result};
use console::style;
use ctxgit_core::RepoInfo;
use std::path::Path;

/// Create a new repository and print its id.
pub fn create(data_dir: &Path, name: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let repo = service
        .create_repository(name)
        .context("Failed to create repository")?;

    println!(
        "Created repository {} ({})",
        style(&repo.id).green().bold(),
        repo.name
    );
    println!("  Branch: {}", repo.current_branch);

    Ok(())
}

/// List all repositories in the store.
pub fn list(data_dir: &Path, format: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let repos = service.list_repositories()?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&repos)?),
        "text" => {
            if repos.is_empty() {
                println!("No repositories in {}", data_dir.display());
                return Ok(());
            }
            for repo in repos {
                println!(
                    "{}  {}  [{}]",
                    style(&repo.id).cyan(),
                    repo.name,
                    repo.current_branch
                );
            }
        }
        other => bail!("Unknown format: {}", other),
    }

    Ok(())
}

/// Show one repository.
pub fn info(data_dir: &Path, id: &str, format: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let repo = service.get_repository(id)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&repo)?),
        "text" => print_info(&repo),
        other => bail!("Unknown format: {}", other),
    }

    Ok(())
}

/// Delete a repository irreversibly.
pub fn delete(data_dir: &Path, id: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    service.delete_repository(id)?;

    println!("Deleted repository {}", id);
    Ok(())
}

fn print_info(repo: &RepoInfo) {
    println!("{} ({})", style(&repo.id).cyan().bold(), repo.name);
    println!("Branches:");
    for branch in &repo.branches {
        if *branch == repo.current_branch {
            println!("  * {}", style(branch).green());
        } else {
            println!("    {}", branch);
        }
    }
}
