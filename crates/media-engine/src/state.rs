//! Transport state management

use crate::PlaybackStatus;
use bluetune_core::SourceRef;

#[derive(Debug, Clone)]
pub struct TransportState {
    status: PlaybackStatus,
    source: Option<SourceRef>,
    position: f64,
    duration: Option<f64>,
    volume: f32,
}

impl TransportState {
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            source: None,
            position: 0.0,
            duration: None,
            volume: 1.0,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn set_status(&mut self, status: PlaybackStatus) {
        self.status = status;
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn source(&self) -> Option<&SourceRef> {
        self.source.as_ref()
    }

    /// Swaps the loaded source, stopping and rewinding
    pub fn load(&mut self, source: SourceRef, duration: Option<f64>) {
        self.source = Some(source);
        self.duration = duration;
        self.status = PlaybackStatus::Stopped;
        self.position = 0.0;
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Sets the position, bounded by the known duration
    pub fn set_position(&mut self, position: f64) {
        let upper = self.duration.unwrap_or(f64::MAX);
        self.position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, upper)
        };
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::new()
    }
}
