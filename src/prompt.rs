//! Prompt templates for the text operations.
//!
//! Each operation has a plain-text template under `config/prompts/`, embedded
//! at compile time. Templates use `{{key}}` placeholders; the user's text is
//! always bound to `{{input}}` and sits between marker tags
//! (`<translate_input>`, `<summarize_input>`, `<grammar_input>`) so the model
//! can tell instructions from data.
//!
//! ```text
//! translate.md       {{target_language}}, {{input}}
//! summarize.md       {{target_language}}, {{input}}
//! better_grammar.md  {{input}}
//! ```

use std::fmt;

const SEPARATOR: &str = "\n\n";

pub const TRANSLATE_TEMPLATE: &str = include_str!("../config/prompts/translate.md");
pub const SUMMARIZE_TEMPLATE: &str = include_str!("../config/prompts/summarize.md");
pub const BETTER_GRAMMAR_TEMPLATE: &str = include_str!("../config/prompts/better_grammar.md");

/// Target language named in translation and summary prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The (system instruction, user content) pair sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub system: String,
    pub user: String,
}

impl PromptSpec {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self { system: system.into(), user: user.into() }
    }
}

/// Fluent builder that joins template fragments and fills in placeholders.
///
/// Variables are substituted in registration order, each in a single pass over
/// the text produced so far, so a value is never re-scanned for placeholders
/// registered before it. Register `input` last.
#[derive(Debug, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
    vars: Vec<(String, String)>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Leading/trailing whitespace is dropped and empty
    /// fragments are skipped.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    /// Register a `{{key}}` → `value` substitution.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.push((key.to_string(), value.into()));
        self
    }

    /// Join all fragments with blank lines and apply the substitutions.
    pub fn build(self) -> String {
        let mut prompt = self.parts.join(SEPARATOR);
        for (k, v) in &self.vars {
            let placeholder = format!("{{{{{k}}}}}");
            prompt = prompt.replace(&placeholder, v);
        }
        prompt
    }
}

/// Instruction for translating `text` into `target`.
pub fn translation(target: Language, text: &str) -> String {
    PromptBuilder::new()
        .append(TRANSLATE_TEMPLATE)
        .var("target_language", target.name())
        .var("input", text)
        .build()
}

/// Instruction for a two-section (summary + brief insights) digest of `text`
/// written in `target`.
pub fn summarize(target: Language, text: &str) -> String {
    PromptBuilder::new()
        .append(SUMMARIZE_TEMPLATE)
        .var("target_language", target.name())
        .var("input", text)
        .build()
}

/// Instruction for a grammar-only correction of `text`.
pub fn better_grammar(text: &str) -> String {
    PromptBuilder::new()
        .append(BETTER_GRAMMAR_TEMPLATE)
        .var("input", text)
        .build()
}
