//! Transport double that records every call
//!
//! The call log is shared, so a test can keep a handle to it after the
//! transport has been moved into the coordinator.

use crate::{EngineError, EngineResult, MediaTransport, TransportEvent};
use bluetune_core::SourceRef;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A single call made against a transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Load(SourceRef),
    Play,
    Pause,
    SetPosition(f64),
    SetVolume(f32),
}

/// Shared, append-only log of entries
///
/// Entries are generic so tests can interleave transport calls with other
/// observations in a single ordered log.
#[derive(Debug)]
pub struct CallLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for CallLog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: Clone> CallLog<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, entry: T) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl<T: Clone> Default for CallLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RecordingTransport<T = TransportCall> {
    log: CallLog<T>,
    wrap: fn(TransportCall) -> T,
    reject_play: Option<String>,
    events: VecDeque<TransportEvent>,
}

impl RecordingTransport<TransportCall> {
    pub fn new() -> Self {
        Self::with_log(CallLog::new(), |call| call)
    }
}

impl Default for RecordingTransport<TransportCall> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> RecordingTransport<T> {
    /// Records into an existing log, converting each call with `wrap`
    pub fn with_log(log: CallLog<T>, wrap: fn(TransportCall) -> T) -> Self {
        Self {
            log,
            wrap,
            reject_play: None,
            events: VecDeque::new(),
        }
    }

    pub fn log(&self) -> CallLog<T> {
        self.log.clone()
    }

    /// Makes every subsequent `play` fail with the given reason
    pub fn reject_play(&mut self, reason: impl Into<String>) {
        self.reject_play = Some(reason.into());
    }

    pub fn accept_play(&mut self) {
        self.reject_play = None;
    }

    /// Queues a notification for the next `poll_events`
    pub fn emit(&mut self, event: TransportEvent) {
        self.events.push_back(event);
    }

    fn record(&self, call: TransportCall) {
        self.log.push((self.wrap)(call));
    }
}

impl<T: Clone + Send + 'static> MediaTransport for RecordingTransport<T> {
    fn load(&mut self, source: &SourceRef) {
        self.record(TransportCall::Load(source.clone()));
    }

    fn play(&mut self) -> EngineResult<()> {
        self.record(TransportCall::Play);
        match &self.reject_play {
            Some(reason) => Err(EngineError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.record(TransportCall::Pause);
    }

    fn set_position(&mut self, seconds: f64) {
        self.record(TransportCall::SetPosition(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(TransportCall::SetVolume(volume));
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let mut transport = RecordingTransport::new();
        let log = transport.log();

        transport.load(&SourceRef::new("a.mp3"));
        transport.play().unwrap();
        transport.pause();

        assert_eq!(
            log.snapshot(),
            vec![
                TransportCall::Load(SourceRef::new("a.mp3")),
                TransportCall::Play,
                TransportCall::Pause,
            ]
        );
    }

    #[test]
    fn test_reject_play() {
        let mut transport = RecordingTransport::new();
        transport.reject_play("device busy");
        assert_eq!(
            transport.play(),
            Err(EngineError::Rejected("device busy".to_string()))
        );
        transport.accept_play();
        assert!(transport.play().is_ok());
    }

    #[test]
    fn test_shared_log_with_wrapper() {
        #[derive(Debug, Clone, PartialEq)]
        enum Entry {
            Transport(TransportCall),
            Note(&'static str),
        }

        let log = CallLog::new();
        let mut transport = RecordingTransport::with_log(log.clone(), Entry::Transport);

        log.push(Entry::Note("before"));
        transport.pause();

        assert_eq!(
            log.snapshot(),
            vec![Entry::Note("before"), Entry::Transport(TransportCall::Pause)]
        );
    }

    #[test]
    fn test_emitted_events_drain_once() {
        let mut transport = RecordingTransport::new();
        transport.emit(TransportEvent::Ended);
        assert_eq!(transport.poll_events(), vec![TransportEvent::Ended]);
        assert!(transport.poll_events().is_empty());
    }
}
