//! The structured context document tracked inside each repository.
//!
//! The document (purpose, assumptions, glossary, decisions) is serialized
//! to a single deterministic TOML file at a fixed path. Reads and writes
//! go through the version-control engine's working-area file I/O; nothing
//! here commits; history is captured only when the caller chooses.

use crate::error::{CtxGitError, Result};
use crate::vcs::VcsRepo;
use serde::{Deserialize, Serialize};

/// Fixed path of the tracked context document.
pub const CONTEXT_FILE: &str = "context.toml";

/// The structured context document.
///
/// Field order is the schema's declared order; the TOML serializer keeps
/// it, so saved documents diff cleanly line by line.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextData {
    /// What this project is for.
    #[serde(default)]
    pub purpose: String,
    /// Working assumptions, in the order they were recorded.
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Project vocabulary.
    #[serde(default)]
    pub glossary: Vec<GlossaryItem>,
    /// Recorded decisions.
    #[serde(default)]
    pub decisions: Vec<Decision>,
}

/// One glossary entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GlossaryItem {
    /// The term being defined.
    pub term: String,
    /// Its definition.
    pub definition: String,
}

/// One recorded decision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Short title.
    pub title: String,
    /// Full detail.
    pub detail: String,
    /// Optional date the decision was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Three-way state of the tracked document file.
///
/// Absence is a valid state (the all-empty default document), distinct
/// from a file that exists but cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState {
    /// File exists and parses.
    Present(ContextData),
    /// File does not exist.
    Absent,
    /// File exists but is not a valid document.
    Malformed(String),
}

/// Reads the document file and classifies its state.
pub fn load_state(repo: &VcsRepo) -> Result<DocumentState> {
    match repo.read_file(CONTEXT_FILE)? {
        None => Ok(DocumentState::Absent),
        Some(raw) => match toml::from_str::<ContextData>(&raw) {
            Ok(data) => Ok(DocumentState::Present(data)),
            Err(e) => Ok(DocumentState::Malformed(e.to_string())),
        },
    }
}

/// Returns the context document, defaulting when the file is absent.
///
/// # Errors
///
/// Returns `MalformedDocument` when the file exists but cannot be parsed
/// since absence and corruption are different failures.
pub fn get(repo: &VcsRepo) -> Result<ContextData> {
    match load_state(repo)? {
        DocumentState::Present(data) => Ok(data),
        DocumentState::Absent => Ok(ContextData::default()),
        DocumentState::Malformed(reason) => Err(CtxGitError::MalformedDocument(reason)),
    }
}

/// Serializes and writes the document. Does not commit.
pub fn save(repo: &VcsRepo, data: &ContextData) -> Result<()> {
    let text = toml::to_string_pretty(data)
        .map_err(|e| CtxGitError::Serialization(e.to_string()))?;
    repo.write_file(CONTEXT_FILE, &text)
}

/// Idempotently creates the document file.
///
/// If the file already exists its parsed contents are returned unchanged;
/// otherwise the default document is written and returned. Called once at
/// repository creation, before the initial commit.
pub fn init(repo: &VcsRepo) -> Result<ContextData> {
    match load_state(repo)? {
        DocumentState::Present(data) => Ok(data),
        DocumentState::Absent => {
            let data = ContextData::default();
            save(repo, &data)?;
            Ok(data)
        }
        DocumentState::Malformed(reason) => Err(CtxGitError::MalformedDocument(reason)),
    }
}
