//! Playback-related domain models

use crate::types::common::clamp_finite;
use crate::types::{format_clock, Track, Validator};
use serde::{Deserialize, Serialize};

/// Default output volume, matching the player's initial slider position
pub const DEFAULT_VOLUME: f32 = 0.7;

/// UI-visible transport state for the selected track
///
/// Fields are private; the coordinator owning this value is the only writer.
/// Positions and durations are in seconds. A duration of `0.0` means the
/// transport has not reported metadata yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    selected_track: Track,
    is_playing: bool,
    position_secs: f64,
    duration_secs: f64,
    volume: f32,
}

impl PlaybackState {
    /// Creates a stopped playback state for a track
    pub fn new(track: Track) -> Self {
        Self {
            selected_track: track,
            is_playing: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: DEFAULT_VOLUME,
        }
    }

    /// Sets the initial volume, clamped to `[0, 1]`
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn selected_track(&self) -> &Track {
        &self.selected_track
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Switches to another track: not playing, position reset
    ///
    /// The duration is kept until the transport reports the new track's
    /// metadata.
    pub fn select(&mut self, track: Track) {
        self.selected_track = track;
        self.is_playing = false;
        self.position_secs = 0.0;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Overwrites the position; negative and non-finite become zero
    pub fn set_position(&mut self, seconds: f64) {
        self.position_secs = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
    }

    /// Overwrites the duration; negative and non-finite become zero
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration_secs = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
    }

    /// Sets volume, clamped to `[0, 1]`. Returns the applied value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume
    }

    /// Clamps a requested seek target into the known track length
    pub fn clamp_seek(&self, seconds: f64) -> f64 {
        clamp_finite(seconds, 0.0, self.duration_secs)
    }

    /// Stops playback and rewinds to the start
    pub fn stop(&mut self) {
        self.is_playing = false;
        self.position_secs = 0.0;
    }

    /// Playback progress (0.0 to 1.0), zero while the duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }

    /// Formats as "M:SS / M:SS"
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.position_secs),
            format_clock(self.duration_secs)
        )
    }
}

impl Validator for PlaybackState {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.volume) {
            errors.push("Volume must be between 0.0 and 1.0".to_string());
        }

        if self.position_secs < 0.0 {
            errors.push("Position must not be negative".to_string());
        }

        if self.duration_secs < 0.0 {
            errors.push("Duration must not be negative".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
