use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] blurt_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No post content provided")]
    EmptyContent,
    #[error("Edited post content cannot be empty")]
    EmptyEditedContent,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "Backend is not configured. Run `blurt config init --backend-url <URL> --api-key <KEY>`, then `blurt auth login`."
    )]
    BackendNotConfigured,
}
