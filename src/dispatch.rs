//! Operation dispatch — identifier → prompt → completion.
//!
//! Operation identifiers are the strings the CLI receives
//! (`translate_zh_en`, `summarize_to_zh`, …). Unknown identifiers are rejected
//! before any network traffic.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::llm::{AzureOpenAiProvider, ProviderError};
use crate::prompt::{self, Language, PromptSpec};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unsupported operation: {0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The fixed set of text operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TranslateToEnglish,
    TranslateToChinese,
    SummarizeToEnglish,
    SummarizeToChinese,
    BetterGrammar,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::TranslateToEnglish,
        Operation::TranslateToChinese,
        Operation::SummarizeToEnglish,
        Operation::SummarizeToChinese,
        Operation::BetterGrammar,
    ];

    /// The identifier accepted on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Operation::TranslateToEnglish => "translate_zh_en",
            Operation::TranslateToChinese => "translate_en_zh",
            Operation::SummarizeToEnglish => "summarize_to_en",
            Operation::SummarizeToChinese => "summarize_to_zh",
            Operation::BetterGrammar => "better_grammar",
        }
    }

    /// One-line summary shown in `my-tools process --help`.
    pub fn description(self) -> &'static str {
        match self {
            Operation::TranslateToEnglish => "translate into English",
            Operation::TranslateToChinese => "translate into Chinese",
            Operation::SummarizeToEnglish => "summarize in English",
            Operation::SummarizeToChinese => "summarize in Chinese",
            Operation::BetterGrammar => "fix grammar, keep meaning and format",
        }
    }

    /// Build the prompt pair for `text`. The user message is `text` itself.
    pub fn prompt(self, text: &str) -> PromptSpec {
        let system = match self {
            Operation::TranslateToEnglish => prompt::translation(Language::English, text),
            Operation::TranslateToChinese => prompt::translation(Language::Chinese, text),
            Operation::SummarizeToEnglish => prompt::summarize(Language::English, text),
            Operation::SummarizeToChinese => prompt::summarize(Language::Chinese, text),
            Operation::BetterGrammar => prompt::better_grammar(text),
        };
        PromptSpec::new(system, text)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.id() == s)
            .ok_or_else(|| DispatchError::InvalidOperation(s.to_string()))
    }
}

/// Runs operations against one provider.
#[derive(Debug, Clone)]
pub struct TextProcessor {
    provider: AzureOpenAiProvider,
}

impl TextProcessor {
    pub fn new(provider: AzureOpenAiProvider) -> Self {
        Self { provider }
    }

    pub async fn run(&self, operation: Operation, text: &str) -> Result<String, DispatchError> {
        let spec = operation.prompt(text);
        tracing::debug!(%operation, text_len = text.len(), "dispatching");
        Ok(self.provider.complete(&spec.system, &spec.user).await?)
    }

    /// Parse `operation` and run it. Errors pass through unchanged.
    pub async fn process(&self, operation: &str, text: &str) -> Result<String, DispatchError> {
        let op: Operation = operation.parse()?;
        self.run(op, text).await
    }
}

/// Entry point: run the operation named `operation` on `text`.
pub async fn process_text(
    provider: &AzureOpenAiProvider,
    operation: &str,
    text: &str,
) -> Result<String, DispatchError> {
    TextProcessor::new(provider.clone()).process(operation, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.id().parse::<Operation>().unwrap(), op);
            assert_eq!(op.to_string(), op.id());
        }
    }

    #[test]
    fn unknown_identifier_is_invalid_operation() {
        for id in ["", "translate", "TRANSLATE_ZH_EN", " better_grammar", "summarize_to_fr"] {
            match id.parse::<Operation>() {
                Err(DispatchError::InvalidOperation(got)) => assert_eq!(got, id),
                other => panic!("expected InvalidOperation for {id:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn every_operation_embeds_text_once() {
        let text = "Ceci n'est pas une pipe.";
        for op in Operation::ALL {
            let spec = op.prompt(text);
            assert!(!spec.system.is_empty(), "{op}: empty instruction");
            assert_eq!(spec.system.matches(text).count(), 1, "{op}: text not embedded exactly once");
            assert_eq!(spec.user, text);
        }
    }

    #[test]
    fn operations_pick_their_template() {
        let text = "hello";
        assert!(Operation::TranslateToEnglish.prompt(text).system.contains("into English"));
        assert!(Operation::TranslateToChinese.prompt(text).system.contains("into Chinese"));
        assert!(Operation::SummarizeToEnglish.prompt(text).system.contains("summary in English"));
        assert!(Operation::SummarizeToChinese.prompt(text).system.contains("summary in Chinese"));
        assert!(Operation::BetterGrammar.prompt(text).system.contains("<grammar_input>"));
    }

    #[tokio::test]
    async fn invalid_operation_fails_before_network() {
        // Nothing listens here; reaching the network would yield Transport instead.
        let provider = AzureOpenAiProvider::new("http://127.0.0.1:9/none", "k0123456789").unwrap();
        let err = process_text(&provider, "rewrite_as_haiku", "text").await.unwrap_err();
        assert!(matches!(err, DispatchError::InvalidOperation(ref id) if id == "rewrite_as_haiku"));
        assert_eq!(err.to_string(), "unsupported operation: rewrite_as_haiku");
    }
}
