//! Export targets: rendering the context document into model-specific
//! prompt packs.
//!
//! Renderers are pure functions from document to text, keyed by target
//! name. The registry is the discoverable set the external interface
//! enumerates; unregistered names fail `UnknownTarget`.

use crate::context::ContextData;
use crate::error::{CtxGitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A rendered export pack.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Target the pack was rendered for.
    pub target: String,
    /// Rendered prompt text.
    pub content: String,
}

/// A named rendering profile.
pub trait PromptTemplate: Send + Sync {
    /// Target name as used in export requests (e.g. "chatgpt").
    fn name(&self) -> &'static str;

    /// Renders the document into prompt text for this model family.
    fn render(&self, ctx: &ContextData) -> String;
}

/// Registry of export targets.
pub struct ExportRegistry {
    templates: BTreeMap<&'static str, Box<dyn PromptTemplate>>,
}

impl ExportRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Creates a registry with the built-in targets.
    pub fn with_builtin_targets() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ChatGptTemplate));
        registry.register(Box::new(ClaudeTemplate));
        registry.register(Box::new(GeminiTemplate));
        registry
    }

    /// Registers a template, replacing any previous one with that name.
    pub fn register(&mut self, template: Box<dyn PromptTemplate>) {
        self.templates.insert(template.name(), template);
    }

    /// Enumerates registered target names, sorted.
    pub fn targets(&self) -> Vec<String> {
        self.templates.keys().map(|k| k.to_string()).collect()
    }

    /// Renders the document for the named target.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTarget` when the name is not registered.
    pub fn render(&self, target: &str, ctx: &ContextData) -> Result<String> {
        let template = self
            .templates
            .get(target)
            .ok_or_else(|| CtxGitError::UnknownTarget(target.to_string()))?;
        Ok(template.render(ctx))
    }
}

impl Default for ExportRegistry {
    fn default() -> Self {
        Self::with_builtin_targets()
    }
}

/// Markdown system-prompt framing for ChatGPT.
pub struct ChatGptTemplate;

impl PromptTemplate for ChatGptTemplate {
    fn name(&self) -> &'static str {
        "chatgpt"
    }

    fn render(&self, ctx: &ContextData) -> String {
        let mut out = String::new();

        out.push_str("# Project Context\n\n");
        out.push_str("Use the context below when answering questions about this project.\n\n");
        out.push_str("## Purpose\n\n");
        out.push_str(&ctx.purpose);
        out.push_str("\n\n");

        if !ctx.assumptions.is_empty() {
            out.push_str("## Assumptions\n\n");
            for assumption in &ctx.assumptions {
                out.push_str(&format!("- {}\n", assumption));
            }
            out.push('\n');
        }

        if !ctx.glossary.is_empty() {
            out.push_str("## Glossary\n\n");
            for item in &ctx.glossary {
                out.push_str(&format!("- **{}**: {}\n", item.term, item.definition));
            }
            out.push('\n');
        }

        if !ctx.decisions.is_empty() {
            out.push_str("## Decisions\n\n");
            for decision in &ctx.decisions {
                match &decision.date {
                    Some(date) => {
                        out.push_str(&format!("### {} ({})\n\n", decision.title, date))
                    }
                    None => out.push_str(&format!("### {}\n\n", decision.title)),
                }
                out.push_str(&decision.detail);
                out.push_str("\n\n");
            }
        }

        out
    }
}

/// Tag-delimited framing for Claude.
pub struct ClaudeTemplate;

impl PromptTemplate for ClaudeTemplate {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn render(&self, ctx: &ContextData) -> String {
        let mut out = String::new();

        out.push_str("<project_context>\n");
        out.push_str("<purpose>\n");
        out.push_str(&ctx.purpose);
        out.push_str("\n</purpose>\n");

        if !ctx.assumptions.is_empty() {
            out.push_str("<assumptions>\n");
            for assumption in &ctx.assumptions {
                out.push_str(&format!("- {}\n", assumption));
            }
            out.push_str("</assumptions>\n");
        }

        if !ctx.glossary.is_empty() {
            out.push_str("<glossary>\n");
            for item in &ctx.glossary {
                out.push_str(&format!("{}: {}\n", item.term, item.definition));
            }
            out.push_str("</glossary>\n");
        }

        if !ctx.decisions.is_empty() {
            out.push_str("<decisions>\n");
            for decision in &ctx.decisions {
                match &decision.date {
                    Some(date) => out.push_str(&format!("## {} ({})\n", decision.title, date)),
                    None => out.push_str(&format!("## {}\n", decision.title)),
                }
                out.push_str(&decision.detail);
                out.push('\n');
            }
            out.push_str("</decisions>\n");
        }

        out.push_str("</project_context>\n");
        out
    }
}

/// Plain labelled sections for Gemini.
pub struct GeminiTemplate;

impl PromptTemplate for GeminiTemplate {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn render(&self, ctx: &ContextData) -> String {
        let mut out = String::new();

        out.push_str("Project context for this conversation.\n\n");
        out.push_str(&format!("Purpose: {}\n", ctx.purpose));

        if !ctx.assumptions.is_empty() {
            out.push_str("\nAssumptions:\n");
            for assumption in &ctx.assumptions {
                out.push_str(&format!("* {}\n", assumption));
            }
        }

        if !ctx.glossary.is_empty() {
            out.push_str("\nGlossary:\n");
            for item in &ctx.glossary {
                out.push_str(&format!("* {}: {}\n", item.term, item.definition));
            }
        }

        if !ctx.decisions.is_empty() {
            out.push_str("\nDecisions:\n");
            for decision in &ctx.decisions {
                match &decision.date {
                    Some(date) => {
                        out.push_str(&format!("* {} ({}): {}\n", decision.title, date, decision.detail))
                    }
                    None => out.push_str(&format!("* {}: {}\n", decision.title, decision.detail)),
                }
            }
        }

        out
    }
}
