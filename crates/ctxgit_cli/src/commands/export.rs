//! Export commands.

use anyhow::Result;
use std::path::Path;

/// Render the context document for an export target and print it.
pub fn run(data_dir: &Path, id: &str, target: &str, branch: Option<&str>) -> Result<()> {
    let service = super::service(data_dir)?;
    let result = service.export_context(id, target, branch)?;

    print!("{}", result.content);
    Ok(())
}

/// List available export targets.
pub fn targets(data_dir: &Path) -> Result<()> {
    let service = super::service(data_dir)?;

    for target in service.list_export_targets() {
        println!("{}", target);
    }

    Ok(())
}
