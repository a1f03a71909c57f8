// crates/pairing/src/attempt.rs
//! Pairing attempt plans

use crate::error::{PairingError, PairingResult};
use bluetune_core::Platform;
use std::time::Duration;

/// An external settings surface the host can be asked to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsTarget {
    label: String,
    uri: String,
}

impl SettingsTarget {
    /// Creates a target; the label is what the user sees while it is opening
    pub fn new(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for SettingsTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.uri)
    }
}

/// One settings invocation plus how long to wait before judging it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingAttempt {
    pub target: SettingsTarget,
    pub timeout: Duration,
}

impl PairingAttempt {
    pub fn new(target: SettingsTarget, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

/// Fallback text shown once automated attempts are exhausted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualInstructions {
    platform: Platform,
    text: String,
}

impl ManualInstructions {
    pub fn new(platform: Platform, text: impl Into<String>) -> Self {
        Self {
            platform,
            text: text.into(),
        }
    }

    /// Default wording for a platform
    pub fn for_platform(platform: Platform) -> Self {
        let text = match platform {
            Platform::Android => {
                "Open Settings > Connected devices > Pair new device, pair your speaker, \
                 then come back and confirm."
            }
            Platform::Ios => {
                "Open Settings > Bluetooth, tap your speaker under Other Devices, \
                 then come back and confirm."
            }
            Platform::Other => {
                "Pair your speaker from your system's Bluetooth settings, \
                 then come back and confirm."
            }
        };
        Self::new(platform, text)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for ManualInstructions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Ordered attempts for one connection, ending in manual instructions
///
/// Built fresh for every connection attempt and dropped once the attempt
/// completes or is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingAttemptPlan {
    attempts: Vec<PairingAttempt>,
    instructions: ManualInstructions,
}

impl PairingAttemptPlan {
    /// Builds a plan, rejecting empty targets and zero timeouts
    pub fn new(
        attempts: Vec<PairingAttempt>,
        instructions: ManualInstructions,
    ) -> PairingResult<Self> {
        for (index, attempt) in attempts.iter().enumerate() {
            if attempt.target.uri().trim().is_empty() {
                return Err(PairingError::EmptyTarget { index });
            }
            if attempt.timeout.is_zero() {
                return Err(PairingError::ZeroTimeout { index });
            }
        }

        Ok(Self {
            attempts,
            instructions,
        })
    }

    /// A plan with no automated attempts
    pub fn manual_only(instructions: ManualInstructions) -> Self {
        Self {
            attempts: Vec::new(),
            instructions,
        }
    }

    pub fn attempts(&self) -> &[PairingAttempt] {
        &self.attempts
    }

    pub fn attempt(&self, index: usize) -> Option<&PairingAttempt> {
        self.attempts.get(index)
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn instructions(&self) -> &ManualInstructions {
        &self.instructions
    }

    /// Sum of all attempt timeouts
    pub fn total_timeout(&self) -> Duration {
        self.attempts.iter().map(|a| a.timeout).sum()
    }
}
