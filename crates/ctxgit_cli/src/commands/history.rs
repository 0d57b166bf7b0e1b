//! Commit, log, and diff commands.

use anyhow::{bail, Result};
use console::style;
use std::path::Path;

/// Commit all working-area changes.
pub fn commit(data_dir: &Path, id: &str, message: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let info = service.commit(id, message)?;

    println!(
        "[{}] {}",
        style(&info.hash).yellow(),
        info.message
    );
    Ok(())
}

/// Show commit history, newest first.
pub fn log(data_dir: &Path, id: &str, max_count: usize, format: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let commits = service.list_commits(id, Some(max_count))?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&commits)?),
        "text" => {
            for info in commits {
                println!(
                    "{}  {}  {}  {}",
                    style(&info.hash).yellow(),
                    info.date.to_rfc3339(),
                    info.author,
                    info.message
                );
            }
        }
        other => bail!("Unknown format: {}", other),
    }

    Ok(())
}

/// Print a unified diff between two revisions.
pub fn diff(data_dir: &Path, id: &str, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let service = super::service(data_dir)?;
    let result = service.get_diff(id, from, to)?;

    if result.diff_text.is_empty() {
        println!(
            "No differences between {} and {}",
            result.from_ref, result.to_ref
        );
    } else {
        print!("{}", result.diff_text);
    }

    Ok(())
}
