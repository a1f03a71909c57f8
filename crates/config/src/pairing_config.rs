//! Pairing configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use bluetune_core::Platform;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Platform selection; `auto` classifies the host at startup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    #[default]
    Auto,
    Android,
    Ios,
    Other,
}

impl PlatformSetting {
    /// Resolves to a concrete platform, using `detected` for `auto`
    pub fn resolve(self, detected: Platform) -> Platform {
        match self {
            PlatformSetting::Auto => detected,
            PlatformSetting::Android => Platform::Android,
            PlatformSetting::Ios => Platform::Ios,
            PlatformSetting::Other => Platform::Other,
        }
    }
}

impl std::fmt::Display for PlatformSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformSetting::Auto => write!(f, "auto"),
            PlatformSetting::Android => write!(f, "android"),
            PlatformSetting::Ios => write!(f, "ios"),
            PlatformSetting::Other => write!(f, "other"),
        }
    }
}

impl FromStr for PlatformSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PlatformSetting::Auto),
            other => other.parse::<Platform>().map(PlatformSetting::from),
        }
    }
}

impl From<Platform> for PlatformSetting {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Android => PlatformSetting::Android,
            Platform::Ios => PlatformSetting::Ios,
            Platform::Other => PlatformSetting::Other,
        }
    }
}

/// One settings shortcut as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptConfig {
    pub label: String,
    pub uri: String,
    pub timeout_ms: u64,
}

/// Pairing behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PairingConfig {
    pub platform: PlatformSetting,

    /// Replaces the built-in Android shortcuts when non-empty
    pub android_attempts: Vec<AttemptConfig>,

    /// Replaces the built-in iOS shortcuts when non-empty
    pub ios_attempts: Vec<AttemptConfig>,

    /// Delay before asking whether the device connected
    pub prompt_grace_ms: u64,

    /// Ask at all; when false the user has to confirm unprompted
    pub auto_prompt: bool,

    /// Name used when confirming without a label
    pub default_device_label: String,
}

impl PairingConfig {
    /// Configured attempts for a platform, `None` meaning the built-ins
    pub fn attempts_for(&self, platform: Platform) -> Option<&[AttemptConfig]> {
        let attempts = match platform {
            Platform::Android => &self.android_attempts,
            Platform::Ios => &self.ios_attempts,
            Platform::Other => return None,
        };
        (!attempts.is_empty()).then_some(attempts.as_slice())
    }

    fn validate_attempts(
        attempts: &[AttemptConfig],
        field: &str,
        results: &mut Vec<Result<(), ValidationError>>,
    ) {
        for (i, attempt) in attempts.iter().enumerate() {
            results.push(Validator::not_empty(
                &attempt.uri,
                &format!("{}[{}].uri", field, i),
            ));
            results.push(Validator::in_range(
                attempt.timeout_ms,
                100,
                60_000,
                &format!("{}[{}].timeout_ms", field, i),
            ));
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            platform: PlatformSetting::Auto,
            android_attempts: Vec::new(),
            ios_attempts: Vec::new(),
            prompt_grace_ms: 3000,
            auto_prompt: true,
            default_device_label: "Bluetooth device".to_string(),
        }
    }
}

impl ConfigSection for PairingConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::in_range(self.prompt_grace_ms, 0, 60_000, "pairing.prompt_grace_ms"),
            Validator::not_empty(&self.default_device_label, "pairing.default_device_label"),
        ];

        Self::validate_attempts(&self.android_attempts, "pairing.android_attempts", &mut results);
        Self::validate_attempts(&self.ios_attempts, "pairing.ios_attempts", &mut results);

        Validator::collect_errors(results)
    }
}
