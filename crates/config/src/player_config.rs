//! Player configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use bluetune_core::DEFAULT_VOLUME;
use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting volume (0.0 - 1.0)
    pub default_volume: f32,

    /// Seconds moved by a relative seek
    pub seek_step_secs: f64,

    /// Volume change for the `+` and `-` commands
    pub volume_step: f32,

    /// How often the transport clock advances, in milliseconds
    pub tick_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            seek_step_secs: 10.0,
            volume_step: 0.1,
            tick_ms: 250,
        }
    }
}

impl ConfigSection for PlayerConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(self.default_volume, 0.0, 1.0, "player.default_volume"),
            Validator::in_range(self.seek_step_secs, 1.0, 600.0, "player.seek_step_secs"),
            Validator::in_range(self.volume_step, 0.01, 0.5, "player.volume_step"),
            Validator::in_range(self.tick_ms, 16, 1000, "player.tick_ms"),
        ])
    }
}
