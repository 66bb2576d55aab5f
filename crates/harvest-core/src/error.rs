use thiserror::Error;

use crate::annotate::AnnotationError;
use crate::config::ConfigError;
use crate::ingest::{BatchError, TextError};
use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid document kind: {0}")]
    InvalidDocumentKind(String),

    #[error("Invalid name strategy: {0}")]
    InvalidNameStrategy(String),

    #[error("Invalid extraction strategy: {0}")]
    InvalidStrategy(String),

    #[error("Text extraction error: {0}")]
    Text(#[from] TextError),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
