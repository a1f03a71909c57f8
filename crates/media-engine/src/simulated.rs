//! Clock-driven media transport
//!
//! Plays nothing audible. It knows the duration of each registered source
//! and moves the position forward whenever the owner calls `advance`, which
//! is enough to exercise the coordinator end to end without an audio device.

use crate::state::TransportState;
use crate::{EngineError, EngineResult, MediaTransport, PlaybackStatus, TransportEvent};
use bluetune_core::{parse_clock, Catalog, SourceRef};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

pub struct SimulatedTransport {
    state: TransportState,
    library: HashMap<SourceRef, f64>,
    events: VecDeque<TransportEvent>,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self {
            state: TransportState::new(),
            library: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    /// Registers every catalog track, using its duration label as the length
    ///
    /// Tracks whose label does not parse are left unregistered and will be
    /// rejected on play.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut transport = Self::new();
        for track in catalog.iter() {
            match parse_clock(&track.duration_label) {
                Some(seconds) => transport.register(track.source.clone(), seconds),
                None => log::warn!(
                    "Track {} has unparseable duration '{}', it will not play",
                    track.id,
                    track.duration_label
                ),
            }
        }
        transport
    }

    pub fn with_source(mut self, source: impl Into<String>, duration_secs: f64) -> Self {
        self.register(SourceRef::new(source), duration_secs);
        self
    }

    pub fn register(&mut self, source: SourceRef, duration_secs: f64) {
        self.library.insert(source, duration_secs.max(0.0));
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status()
    }

    pub fn position(&self) -> f64 {
        self.state.position()
    }

    pub fn volume(&self) -> f32 {
        self.state.volume()
    }

    pub fn source(&self) -> Option<&SourceRef> {
        self.state.source()
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTransport for SimulatedTransport {
    fn load(&mut self, source: &SourceRef) {
        let duration = self.library.get(source).copied();
        self.state.load(source.clone(), duration);
        self.events.clear();

        match duration {
            Some(seconds) => {
                log::debug!("Loaded {} ({:.1}s)", source, seconds);
                self.events.push_back(TransportEvent::MetadataLoaded(seconds));
            }
            None => log::debug!("Loaded {} (no metadata)", source),
        }
    }

    fn play(&mut self) -> EngineResult<()> {
        let source = self.state.source().cloned().ok_or(EngineError::NothingLoaded)?;
        if self.state.duration().is_none() {
            return Err(EngineError::SourceUnavailable(source));
        }

        self.state.set_status(PlaybackStatus::Playing);
        Ok(())
    }

    fn pause(&mut self) {
        if self.state.is_playing() {
            self.state.set_status(PlaybackStatus::Paused);
        }
    }

    fn set_position(&mut self, seconds: f64) {
        self.state.set_position(seconds);
        self.events
            .push_back(TransportEvent::TimeUpdate(self.state.position()));
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.set_volume(volume);
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        self.events.drain(..).collect()
    }

    fn advance(&mut self, elapsed: Duration) {
        if !self.state.is_playing() {
            return;
        }

        let duration = self.state.duration().unwrap_or(0.0);
        let next = self.state.position() + elapsed.as_secs_f64();

        if next >= duration {
            self.events.push_back(TransportEvent::TimeUpdate(duration));
            self.events.push_back(TransportEvent::Ended);
            self.state.set_status(PlaybackStatus::Stopped);
            self.state.set_position(0.0);
        } else {
            self.state.set_position(next);
            self.events.push_back(TransportEvent::TimeUpdate(next));
        }
    }
}
