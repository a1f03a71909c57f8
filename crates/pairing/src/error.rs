// crates/pairing/src/error.rs
//! Error types for pairing plans

use thiserror::Error;

/// Result type for pairing operations
pub type PairingResult<T> = Result<T, PairingError>;

/// Errors raised while building a pairing plan
///
/// Running a plan never fails; only malformed plans are rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PairingError {
    /// An attempt had no target to open
    #[error("Attempt {index} has an empty settings target")]
    EmptyTarget { index: usize },

    /// An attempt would expire immediately
    #[error("Attempt {index} has a zero timeout")]
    ZeroTimeout { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_target_error() {
        let err = PairingError::EmptyTarget { index: 2 };
        assert!(err.to_string().contains("2"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_zero_timeout_error() {
        let err = PairingError::ZeroTimeout { index: 0 };
        assert!(err.to_string().contains("zero timeout"));
    }
}
