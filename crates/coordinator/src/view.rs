//! Observable state and user-facing messages

use bluetune_core::{ConnectionState, PlaybackState, PlayerError, Platform};
use bluetune_pairing::Generation;
use std::fmt;
use std::time::Duration;

/// Snapshot of everything the front end renders
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub connection: ConnectionState,
    pub playback: PlaybackState,
    pub platform: Platform,
    /// Sequencing ended and the user has to confirm or cancel
    pub awaiting_confirmation: bool,
    /// The yes/no confirmation prompt is showing
    pub prompt_open: bool,
}

impl ViewState {
    pub fn can_play(&self) -> bool {
        self.connection.is_connected() && !self.playback.is_playing()
    }

    pub fn can_pause(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn can_connect(&self) -> bool {
        matches!(self.connection, ConnectionState::Disconnected)
    }

    pub fn time_label(&self) -> String {
        self.playback.time_label()
    }
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    AttemptStarted {
        index: usize,
        total: usize,
        label: String,
    },
    AwaitingConfirmation,
    ManualInstructions(String),
    ConfirmPrompt,
    Connected {
        device_label: String,
    },
    Disconnected,
    TrackEnded,
    Error(PlayerError),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptStarted {
                index,
                total,
                label,
            } => write!(f, "Opening {} ({}/{})...", label, index + 1, total),
            Self::AwaitingConfirmation => {
                write!(f, "Settings opened. Pair your device, then confirm.")
            }
            Self::ManualInstructions(text) => f.write_str(text),
            Self::ConfirmPrompt => write!(f, "Did your Bluetooth device connect? (yes/no)"),
            Self::Connected { device_label } => write!(f, "Connected to {}", device_label),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::TrackEnded => write!(f, "Track finished"),
            Self::Error(error) => f.write_str(&error.user_message()),
        }
    }
}

/// A timer the driver must schedule on the coordinator's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    AttemptExpiry {
        generation: Generation,
        index: usize,
        after: Duration,
    },
    ConfirmPrompt {
        generation: Generation,
        after: Duration,
    },
}

impl TimerRequest {
    pub fn after(&self) -> Duration {
        match self {
            Self::AttemptExpiry { after, .. } | Self::ConfirmPrompt { after, .. } => *after,
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Self::AttemptExpiry { generation, .. } | Self::ConfirmPrompt { generation, .. } => {
                *generation
            }
        }
    }
}
