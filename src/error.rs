//! Application-wide error types.
//!
//! Core failures live next to the code that raises them
//! ([`ProviderError`](crate::llm::ProviderError),
//! [`DispatchError`](crate::dispatch::DispatchError)); `AppError` wraps them
//! together with the failures of the surrounding shell (config, logging,
//! clipboard/dialog, setup).

use thiserror::Error;

use crate::dispatch::DispatchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("output error: {0}")]
    Output(String),

    #[error("setup error: {0}")]
    Setup(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
