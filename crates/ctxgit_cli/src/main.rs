//! ctxgit CLI - command-line interface for versioned context documents.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "ctxgit")]
#[command(about = "Versioned context documents with prompt-pack export", long_about = None)]
#[command(version)]
struct Cli {
    /// Store root holding all repositories
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new context repository
    Create {
        /// Display name
        name: String,
    },
    /// List repositories in the store
    List {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one repository
    Info {
        /// Repository id
        id: String,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Delete a repository irreversibly
    Delete {
        /// Repository id
        id: String,
    },
    /// Branch operations
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },
    /// Switch the working area to a branch
    Checkout {
        /// Repository id
        id: String,
        /// Branch name
        branch: String,
    },
    /// Commit all working-area changes
    Commit {
        /// Repository id
        id: String,
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Show commit history, newest first
    Log {
        /// Repository id
        id: String,
        /// Maximum number of commits to show
        #[arg(long, default_value_t = ctxgit_core::DEFAULT_LOG_LIMIT)]
        max_count: usize,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Diff two revisions (defaults to the last commit's changes)
    Diff {
        /// Repository id
        id: String,
        /// Base revision
        #[arg(long)]
        from: Option<String>,
        /// Target revision
        #[arg(long)]
        to: Option<String>,
    },
    /// Context document operations
    Context {
        #[command(subcommand)]
        command: ContextCommands,
    },
    /// Render the context document for an export target
    Export {
        /// Repository id
        id: String,
        /// Export target (see `ctxgit targets`)
        target: String,
        /// Branch to check out before exporting
        #[arg(long)]
        branch: Option<String>,
    },
    /// List available export targets
    Targets,
}

#[derive(Subcommand)]
enum BranchCommands {
    /// List branches
    List {
        /// Repository id
        id: String,
    },
    /// Create a branch at the current history position
    Create {
        /// Repository id
        id: String,
        /// Branch name
        name: String,
    },
}

#[derive(Subcommand)]
enum ContextCommands {
    /// Print the context document
    Show {
        /// Repository id
        id: String,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set the purpose field
    SetPurpose {
        /// Repository id
        id: String,
        /// New purpose text
        text: String,
    },
    /// Append an assumption
    AddAssumption {
        /// Repository id
        id: String,
        /// Assumption text
        text: String,
    },
    /// Append a glossary entry
    AddTerm {
        /// Repository id
        id: String,
        /// Term
        term: String,
        /// Definition
        definition: String,
    },
    /// Append a decision
    AddDecision {
        /// Repository id
        id: String,
        /// Decision title
        title: String,
        /// Decision detail
        detail: String,
        /// Optional decision date (free-form, e.g. 2026-08-07)
        #[arg(long)]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Create { name } => commands::repo::create(&data_dir, &name),
        Commands::List { format } => commands::repo::list(&data_dir, &format),
        Commands::Info { id, format } => commands::repo::info(&data_dir, &id, &format),
        Commands::Delete { id } => commands::repo::delete(&data_dir, &id),
        Commands::Branch { command } => match command {
            BranchCommands::List { id } => commands::branch::list(&data_dir, &id),
            BranchCommands::Create { id, name } => commands::branch::create(&data_dir, &id, &name),
        },
        Commands::Checkout { id, branch } => commands::branch::checkout(&data_dir, &id, &branch),
        Commands::Commit { id, message } => commands::history::commit(&data_dir, &id, &message),
        Commands::Log {
            id,
            max_count,
            format,
        } => commands::history::log(&data_dir, &id, max_count, &format),
        Commands::Diff { id, from, to } => {
            commands::history::diff(&data_dir, &id, from.as_deref(), to.as_deref())
        }
        Commands::Context { command } => match command {
            ContextCommands::Show { id, format } => {
                commands::context::show(&data_dir, &id, &format)
            }
            ContextCommands::SetPurpose { id, text } => {
                commands::context::set_purpose(&data_dir, &id, &text)
            }
            ContextCommands::AddAssumption { id, text } => {
                commands::context::add_assumption(&data_dir, &id, &text)
            }
            ContextCommands::AddTerm {
                id,
                term,
                definition,
            } => commands::context::add_term(&data_dir, &id, &term, &definition),
            ContextCommands::AddDecision {
                id,
                title,
                detail,
                date,
            } => commands::context::add_decision(&data_dir, &id, &title, &detail, date.as_deref()),
        },
        Commands::Export { id, target, branch } => {
            commands::export::run(&data_dir, &id, &target, branch.as_deref())
        }
        Commands::Targets => commands::export::targets(&data_dir),
    }
}
