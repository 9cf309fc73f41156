//! Chat completion client for the hosted model.
//!
//! One provider, one round-trip per call: no history, no streaming, no retry.
//! The provider is built once from [`Config`](crate::config::Config) and is
//! cheap to clone.

pub mod azure_openai;

use thiserror::Error;

pub use azure_openai::AzureOpenAiProvider;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP error! status: {status}{}", fmt_detail(.message))]
    Http { status: u16, message: String },

    /// Success status, but the body carried no usable choice.
    #[error("no response from AI")]
    EmptyCompletion,

    /// DNS, connect, TLS or timeout failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(String),

    /// Success status, but the body was not a chat completion.
    #[error("failed to parse response body: {0}")]
    Decode(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ProviderError {
    /// HTTP status for [`ProviderError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn fmt_detail(message: &str) -> String {
    if message.is_empty() { String::new() } else { format!(" ({message})") }
}
