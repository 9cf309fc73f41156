//! Text tools backed by a hosted language model.
//!
//! The library is the `process` path of the `my-tools` binary:
//! [`dispatch::process_text`] turns an operation identifier and a piece of text
//! into a prompt ([`prompt`]), sends it ([`llm`]) and returns the completion.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod logger;
pub mod output;
pub mod prompt;
#[cfg(feature = "setup")]
pub mod setup;

pub use dispatch::{DispatchError, Operation, TextProcessor, process_text};
pub use llm::{AzureOpenAiProvider, ProviderError};
