use bluetune_core::SourceRef;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No source loaded")]
    NothingLoaded,

    #[error("Source unavailable: {0}")]
    SourceUnavailable(SourceRef),

    #[error("Playback rejected: {0}")]
    Rejected(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
