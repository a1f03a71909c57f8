//! Connection state machine
//!
//! `Disconnected -> Connecting -> Connected`, with cancel and disconnect
//! leading back to `Disconnected`. `Connected` is only reachable through an
//! explicit confirmation.

use bluetune_core::{ConnectionState, PlayerError, Result};
use bluetune_pairing::{Generation, GenerationCounter};
use media_engine::MediaTransport;

/// Label used when the user confirms without naming the device
pub const DEFAULT_DEVICE_LABEL: &str = "Bluetooth device";

/// Handle for one connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectAttempt {
    generation: Generation,
}

impl ConnectAttempt {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug)]
pub struct ConnectionStateMachine {
    state: ConnectionState,
    generations: GenerationCounter,
    default_label: String,
}

impl ConnectionStateMachine {
    pub fn new() -> Self {
        Self::with_default_label(DEFAULT_DEVICE_LABEL)
    }

    pub fn with_default_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            state: ConnectionState::Disconnected,
            generations: GenerationCounter::new(),
            default_label: if label.trim().is_empty() {
                DEFAULT_DEVICE_LABEL.to_string()
            } else {
                label
            },
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    /// True if timers scheduled under `generation` still apply
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generations.is_current(generation)
    }

    /// Starts a new attempt from `Disconnected`
    pub fn begin_connect(&mut self) -> Result<ConnectAttempt> {
        if !matches!(self.state, ConnectionState::Disconnected) {
            return Err(self.invalid("connect"));
        }

        let generation = self.generations.bump();
        self.state = ConnectionState::Connecting;
        log::info!("Connecting (attempt {})", generation);
        Ok(ConnectAttempt { generation })
    }

    /// Accepts the user's word that pairing worked
    ///
    /// Blank labels fall back to the default device label.
    pub fn confirm(&mut self, device_label: &str) -> Result<()> {
        if !self.state.is_connecting() {
            return Err(self.invalid("confirm"));
        }

        let label = device_label.trim();
        let device_label = if label.is_empty() {
            self.default_label.clone()
        } else {
            label.to_string()
        };

        log::info!("Connected to {}", device_label);
        self.state = ConnectionState::Connected { device_label };
        Ok(())
    }

    /// Abandons the pending attempt
    pub fn cancel(&mut self) -> Result<()> {
        if !self.state.is_connecting() {
            return Err(self.invalid("cancel"));
        }

        self.generations.bump();
        self.state = ConnectionState::Disconnected;
        log::info!("Connection attempt cancelled");
        Ok(())
    }

    /// Drops the connection or pending attempt
    ///
    /// The transport is paused before the new state is written.
    pub fn disconnect(&mut self, transport: &mut dyn MediaTransport) -> Result<()> {
        if matches!(self.state, ConnectionState::Disconnected) {
            return Err(self.invalid("disconnect"));
        }

        transport.pause();
        self.generations.bump();
        self.state = ConnectionState::Disconnected;
        log::info!("Disconnected");
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> PlayerError {
        PlayerError::InvalidTransition {
            from: self.state.status(),
            action,
        }
    }
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
