//! Context document commands.
//!
//! Edits write the working area only; run `ctxgit commit` to capture them
//! in history.

use anyhow::{bail, Result};
use console::style;
use ctxgit_core::{ContextData, Decision, GlossaryItem};
use std::path::Path;

/// Print the context document.
pub fn show(data_dir: &Path, id: &str, format: &str) -> Result<()> {
    let service = super::service(data_dir)?;
    let ctx = service.get_context(id)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&ctx)?),
        "text" => print_document(&ctx),
        other => bail!("Unknown format: {}", other),
    }

    Ok(())
}

/// Set the purpose field.
pub fn set_purpose(data_dir: &Path, id: &str, text: &str) -> Result<()> {
    edit(data_dir, id, |ctx| {
        ctx.purpose = text.to_string();
    })?;
    println!("Purpose updated (uncommitted)");
    Ok(())
}

/// Append an assumption.
pub fn add_assumption(data_dir: &Path, id: &str, text: &str) -> Result<()> {
    edit(data_dir, id, |ctx| {
        ctx.assumptions.push(text.to_string());
    })?;
    println!("Assumption added (uncommitted)");
    Ok(())
}

/// Append a glossary entry.
pub fn add_term(data_dir: &Path, id: &str, term: &str, definition: &str) -> Result<()> {
    edit(data_dir, id, |ctx| {
        ctx.glossary.push(GlossaryItem {
            term: term.to_string(),
            definition: definition.to_string(),
        });
    })?;
    println!("Glossary entry added (uncommitted)");
    Ok(())
}

/// Append a decision.
pub fn add_decision(
    data_dir: &Path,
    id: &str,
    title: &str,
    detail: &str,
    date: Option<&str>,
) -> Result<()> {
    edit(data_dir, id, |ctx| {
        ctx.decisions.push(Decision {
            title: title.to_string(),
            detail: detail.to_string(),
            date: date.map(str::to_string),
        });
    })?;
    println!("Decision added (uncommitted)");
    Ok(())
}

fn edit(data_dir: &Path, id: &str, apply: impl FnOnce(&mut ContextData)) -> Result<()> {
    let service = super::service(data_dir)?;
    let mut ctx = service.get_context(id)?;
    apply(&mut ctx);
    service.save_context(id, &ctx)?;
    Ok(())
}

fn print_document(ctx: &ContextData) {
    println!("{}", style("Purpose").bold());
    println!("  {}", ctx.purpose);

    if !ctx.assumptions.is_empty() {
        println!("{}", style("Assumptions").bold());
        for assumption in &ctx.assumptions {
            println!("  - {}", assumption);
        }
    }

    if !ctx.glossary.is_empty() {
        println!("{}", style("Glossary").bold());
        for item in &ctx.glossary {
            println!("  {}: {}", item.term, item.definition);
        }
    }

    if !ctx.decisions.is_empty() {
        println!("{}", style("Decisions").bold());
        for decision in &ctx.decisions {
            match &decision.date {
                Some(date) => println!("  {} ({}): {}", decision.title, date, decision.detail),
                None => println!("  {}: {}", decision.title, decision.detail),
            }
        }
    }
}
