//! Error taxonomy for BlueTune
//!
//! None of these errors is fatal. The coordinator recovers every one of them
//! at its boundary and turns it into a transient, dismissible message:
//! - **Informational**: nothing went wrong, the user just needs to act
//! - **Recoverable**: the request failed but retrying or connecting fixes it
//! - **UsageError**: the requested action is not legal in the current state

use crate::types::{ConnectionStatus, TrackId};
use std::fmt;
use thiserror::Error;

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Not a failure, shown as guidance
    Informational,
    /// The action failed but the user can retry
    Recoverable,
    /// The action is not allowed from the current state
    UsageError,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Informational => write!(f, "Info"),
            Self::Recoverable => write!(f, "Recoverable"),
            Self::UsageError => write!(f, "Usage error"),
        }
    }
}

/// Main error type for BlueTune
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// A connection transition was requested from a state that does not allow it
    #[error("Invalid transition: cannot {action} while {from}")]
    InvalidTransition {
        from: ConnectionStatus,
        action: &'static str,
    },

    /// Play was requested before a device connection was confirmed
    #[error("Not connected: confirm a Bluetooth device before playing")]
    NotConnected,

    /// The media transport rejected a play request
    #[error("Playback failed: {reason}")]
    PlaybackFailed { reason: String },

    /// Every automated pairing attempt ran without the settings screen taking over
    #[error("Pairing unconfirmed after {attempts} attempt(s)")]
    PairingUnconfirmed { attempts: usize },

    /// The requested track is not in the catalog
    #[error("Unknown track: {id}")]
    UnknownTrack { id: TrackId },

    /// The catalog supplied at startup is unusable
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },
}

impl PlayerError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PairingUnconfirmed { .. } => ErrorSeverity::Informational,

            Self::NotConnected | Self::PlaybackFailed { .. } => ErrorSeverity::Recoverable,

            Self::InvalidTransition { .. }
            | Self::UnknownTrack { .. }
            | Self::InvalidCatalog { .. } => ErrorSeverity::UsageError,
        }
    }

    /// Returns a user-friendly message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidTransition { from, action } => {
                format!("Can't {} right now (currently {}).", action, from)
            }
            Self::NotConnected => {
                "Connect and confirm a Bluetooth speaker before pressing play.".to_string()
            }
            Self::PlaybackFailed { .. } => {
                "This track could not be played. Try again or pick another track.".to_string()
            }
            Self::PairingUnconfirmed { .. } => {
                "Couldn't open the Bluetooth settings automatically. Follow the instructions to pair manually."
                    .to_string()
            }
            Self::UnknownTrack { id } => format!("There is no track number {}.", id),
            Self::InvalidCatalog { .. } => "The track list is misconfigured.".to_string(),
        }
    }

    /// True for errors the user resolves by retrying or connecting
    pub fn is_recoverable(&self) -> bool {
        self.severity() == ErrorSeverity::Recoverable
    }
}

/// Result type alias for BlueTune operations
pub type Result<T> = std::result::Result<T, PlayerError>;
