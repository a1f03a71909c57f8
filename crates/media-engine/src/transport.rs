//! Media transport contract
//!
//! This is everything the coordinator needs from the host's media subsystem.
//! A transport wraps exactly one playable resource at a time.

use crate::EngineResult;
use bluetune_core::SourceRef;
use std::time::Duration;

/// Notification emitted by a transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    /// Current playback position in seconds
    TimeUpdate(f64),
    /// Duration of the loaded source in seconds
    MetadataLoaded(f64),
    /// Playback reached the end of the source
    Ended,
}

/// Playback primitive driven by the coordinator
///
/// Implementations must make `pause` take effect before it returns: once the
/// call completes, nothing is audible and no further `TimeUpdate` advances
/// the position.
pub trait MediaTransport: Send {
    /// Replaces the current resource. Failures surface on the next `play`.
    fn load(&mut self, source: &SourceRef);

    /// Starts or resumes playback. `Err` means the transport rejected it.
    fn play(&mut self) -> EngineResult<()>;

    fn pause(&mut self);

    fn set_position(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f32);

    /// Drains notifications queued since the last call, oldest first
    fn poll_events(&mut self) -> Vec<TransportEvent>;

    /// Advances clock-driven transports. Hosts with their own clock ignore it.
    fn advance(&mut self, _elapsed: Duration) {}
}

impl<T: MediaTransport + ?Sized> MediaTransport for Box<T> {
    fn load(&mut self, source: &SourceRef) {
        (**self).load(source)
    }

    fn play(&mut self) -> EngineResult<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn set_position(&mut self, seconds: f64) {
        (**self).set_position(seconds)
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        (**self).poll_events()
    }

    fn advance(&mut self, elapsed: Duration) {
        (**self).advance(elapsed)
    }
}
