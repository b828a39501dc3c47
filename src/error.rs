use thiserror::Error;

/// All errors produced by oratio-core.
#[derive(Debug, Error)]
pub enum OratioError {
    #[error("recognition engine not initialized — call initialize() first")]
    NotInitialized,

    #[error("a streaming session is already active")]
    AlreadyActive,

    #[error("no streaming session is active")]
    StreamNotActive,

    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("audio input is empty")]
    EmptyAudio,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OratioError>;
