//! Core domain types and error taxonomy for BlueTune

pub mod catalog;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{ErrorSeverity, PlayerError, Result};
pub use types::{
    format_clock, parse_clock, ConnectionState, ConnectionStatus, Platform, PlaybackState, SourceRef, Track,
    TrackId, Validator, DEFAULT_VOLUME,
};
