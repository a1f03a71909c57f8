//! Playback coordinator
//!
//! Owns the connection state machine, the playback state and the media
//! transport, and is the only component that touches any of them. All entry
//! points are synchronous; anything that has to happen later is handed back
//! to the caller as a [`TimerRequest`].

use crate::command::Command;
use crate::connection::{ConnectionStateMachine, DEFAULT_DEVICE_LABEL};
use crate::view::{Notice, TimerRequest, ViewState};
use bluetune_core::{
    Catalog, ConnectionState, ErrorSeverity, PlaybackState, PlayerError, Platform, Result, Track,
    TrackId, DEFAULT_VOLUME,
};
use bluetune_pairing::{
    FocusProbe, Generation, PairingSequencer, PairingStrategy, SequencerStep, SettingsInvoker,
};
use media_engine::{MediaTransport, TransportEvent};
use std::collections::VecDeque;
use std::time::Duration;

/// Grace period before the confirmation prompt appears
pub const DEFAULT_PROMPT_GRACE: Duration = Duration::from_millis(3000);

/// Tunables for the coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Delay between the end of sequencing and the confirmation prompt
    pub prompt_grace: Duration,
    /// Whether to raise the confirmation prompt at all
    pub auto_prompt: bool,
    /// Label used when the user confirms without naming a device
    pub default_device_label: String,
    pub initial_volume: f32,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            prompt_grace: DEFAULT_PROMPT_GRACE,
            auto_prompt: true,
            default_device_label: DEFAULT_DEVICE_LABEL.to_string(),
            initial_volume: DEFAULT_VOLUME,
        }
    }
}

/// Host hooks used while pairing
pub struct PairingContext {
    strategy: Box<dyn PairingStrategy>,
    invoker: Box<dyn SettingsInvoker>,
    focus: Box<dyn FocusProbe>,
}

impl PairingContext {
    pub fn new(
        strategy: Box<dyn PairingStrategy>,
        invoker: Box<dyn SettingsInvoker>,
        focus: Box<dyn FocusProbe>,
    ) -> Self {
        Self {
            strategy,
            invoker,
            focus,
        }
    }

    pub fn platform(&self) -> Platform {
        self.strategy.platform()
    }
}

type Listener = Box<dyn FnMut(&ViewState) + Send>;

pub struct PlaybackCoordinator<T: MediaTransport> {
    catalog: Catalog,
    connection: ConnectionStateMachine,
    playback: PlaybackState,
    transport: T,
    pairing: PairingContext,
    sequencer: Option<PairingSequencer>,
    options: CoordinatorOptions,
    prompt_open: bool,
    notices: VecDeque<Notice>,
    listeners: Vec<Listener>,
}

impl<T: MediaTransport> PlaybackCoordinator<T> {
    /// Creates a coordinator with the first catalog track selected
    pub fn new(
        catalog: Catalog,
        mut transport: T,
        pairing: PairingContext,
        options: CoordinatorOptions,
    ) -> Self {
        let first = catalog.first().clone();
        let playback = PlaybackState::new(first).with_volume(options.initial_volume);

        transport.load(&playback.selected_track().source);
        transport.set_volume(playback.volume());

        Self {
            catalog,
            connection: ConnectionStateMachine::with_default_label(
                options.default_device_label.clone(),
            ),
            playback,
            transport,
            pairing,
            sequencer: None,
            options,
            prompt_open: false,
            notices: VecDeque::new(),
            listeners: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn connection(&self) -> &ConnectionState {
        self.connection.state()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn platform(&self) -> Platform {
        self.pairing.platform()
    }

    /// Read-only access for status displays and tests
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Generation of the current (or last) connection attempt
    pub fn generation(&self) -> Generation {
        self.connection.generation()
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            connection: self.connection.state().clone(),
            playback: self.playback.clone(),
            platform: self.platform(),
            awaiting_confirmation: self.connection.state().is_connecting()
                && self.sequencer.as_ref().is_some_and(|s| s.is_finished()),
            prompt_open: self.prompt_open,
        }
    }

    /// Registers a listener called with a fresh view after every change
    pub fn subscribe(&mut self, listener: impl FnMut(&ViewState) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Takes all notices queued since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// `is_playing` implies a confirmed connection
    pub fn invariants_hold(&self) -> bool {
        !self.playback.is_playing() || self.connection.state().is_connected()
    }

    // Track selection and transport control

    /// Switches tracks; always allowed
    pub fn select_track(&mut self, track: Track) {
        log::info!("Selecting {}", track.display_name());
        self.transport.pause();
        self.transport.set_position(0.0);
        self.transport.load(&track.source);
        self.playback.select(track);
        self.publish();
    }

    pub fn select_track_by_id(&mut self, id: TrackId) -> Result<()> {
        let track = self.catalog.require(id)?.clone();
        self.select_track(track);
        Ok(())
    }

    pub fn request_play(&mut self) -> Result<()> {
        if !self.connection.state().is_connected() {
            self.playback.set_playing(false);
            return Err(PlayerError::NotConnected);
        }

        let result = match self.transport.play() {
            Ok(()) => {
                self.playback.set_playing(true);
                Ok(())
            }
            Err(e) => {
                log::warn!("Transport rejected play: {}", e);
                self.playback.set_playing(false);
                Err(PlayerError::PlaybackFailed {
                    reason: e.to_string(),
                })
            }
        };

        self.publish();
        result
    }

    pub fn request_pause(&mut self) {
        self.transport.pause();
        self.playback.set_playing(false);
        self.publish();
    }

    pub fn request_stop(&mut self) {
        self.transport.pause();
        self.transport.set_position(0.0);
        self.playback.stop();
        self.publish();
    }

    /// Seeks within the known duration and returns the applied position
    pub fn seek(&mut self, seconds: f64) -> f64 {
        let requested = if seconds.is_finite() { seconds } else { 0.0 };
        let target = self.playback.clamp_seek(requested);

        self.transport.set_position(target);
        self.playback.set_position(target);
        self.publish();
        target
    }

    pub fn seek_by(&mut self, delta: f64) -> f64 {
        self.seek(self.playback.position_secs() + delta)
    }

    /// Sets the volume and returns the applied value
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let applied = self.playback.set_volume(volume);
        self.transport.set_volume(applied);
        self.publish();
        applied
    }

    pub fn nudge_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(self.playback.volume() + delta)
    }

    // Connection lifecycle

    /// Starts a connection attempt and the pairing sequence behind it
    pub fn request_connect(&mut self) -> Result<Option<TimerRequest>> {
        let attempt = self.connection.begin_connect()?;
        self.prompt_open = false;

        let mut sequencer =
            PairingSequencer::new(self.pairing.strategy.plan(), attempt.generation());
        let step = sequencer.start(self.pairing.invoker.as_mut());
        self.sequencer = Some(sequencer);

        let timer = self.apply_step(step);
        self.publish();
        Ok(timer)
    }

    /// Handles a pairing attempt timer; stale generations are ignored
    pub fn on_attempt_expired(
        &mut self,
        generation: Generation,
        index: usize,
    ) -> Option<TimerRequest> {
        if !self.is_live(generation) {
            log::debug!("Dropping stale attempt expiry {} ({})", index, generation);
            return None;
        }

        let step = match self.sequencer.as_mut() {
            Some(sequencer) => sequencer.on_attempt_expired(
                index,
                self.pairing.focus.as_ref(),
                self.pairing.invoker.as_mut(),
            ),
            None => None,
        };

        let timer = self.apply_step(step);
        self.publish();
        timer
    }

    /// Raises the confirmation prompt; stale generations are ignored
    pub fn on_prompt_due(&mut self, generation: Generation) {
        let finished = self.sequencer.as_ref().is_some_and(|s| s.is_finished());
        if !self.is_live(generation) || !finished {
            log::debug!("Dropping stale confirmation prompt ({})", generation);
            return;
        }

        self.prompt_open = true;
        self.notices.push_back(Notice::ConfirmPrompt);
        self.publish();
    }

    /// Confirms pairing; the only way into `Connected`
    pub fn confirm(&mut self, device_label: Option<&str>) -> Result<()> {
        self.connection.confirm(device_label.unwrap_or(""))?;
        self.finish_attempt();

        if let Some(label) = self.connection.state().device_label() {
            self.notices.push_back(Notice::Connected {
                device_label: label.to_string(),
            });
        }
        self.publish();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.connection.cancel()?;
        self.finish_attempt();
        self.notices.push_back(Notice::Disconnected);
        self.publish();
        Ok(())
    }

    /// Pauses playback and drops the connection or pending attempt
    pub fn disconnect(&mut self) -> Result<()> {
        if matches!(self.connection.state(), ConnectionState::Disconnected) {
            return self.connection.disconnect(&mut self.transport);
        }

        self.playback.set_playing(false);
        self.connection.disconnect(&mut self.transport)?;
        self.finish_attempt();
        self.notices.push_back(Notice::Disconnected);
        self.publish();
        Ok(())
    }

    /// Answers the confirmation prompt; "no" abandons the attempt
    pub fn answer_prompt(&mut self, yes: bool, device_label: Option<&str>) -> Result<()> {
        self.prompt_open = false;
        if yes {
            self.confirm(device_label)
        } else {
            self.cancel()
        }
    }

    // Transport notifications

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::TimeUpdate(seconds) => self.playback.set_position(seconds),
            TransportEvent::MetadataLoaded(seconds) => {
                log::debug!(
                    "Duration of {} is {:.1}s",
                    self.playback.selected_track().title,
                    seconds
                );
                self.playback.set_duration(seconds);
            }
            TransportEvent::Ended => {
                log::info!("{} ended", self.playback.selected_track().title);
                self.playback.stop();
                self.notices.push_back(Notice::TrackEnded);
            }
        }
        self.publish();
    }

    /// Applies every queued transport notification; returns how many there were
    pub fn pump_transport(&mut self) -> usize {
        let events = self.transport.poll_events();
        let count = events.len();
        for event in events {
            self.handle_transport_event(event);
        }
        count
    }

    /// Moves a clock-driven transport forward, then applies its notifications
    pub fn advance_transport(&mut self, elapsed: Duration) -> usize {
        self.transport.advance(elapsed);
        self.pump_transport()
    }

    /// Runs a user command, turning failures into error notices
    pub fn dispatch(&mut self, command: Command) -> Option<TimerRequest> {
        log::debug!("Dispatching {}", command.name());

        let result = match command {
            Command::Select(id) => self.select_track_by_id(id).map(|_| None),
            Command::Connect => self.request_connect(),
            Command::Confirm(label) => self.confirm(label.as_deref()).map(|_| None),
            Command::Cancel => self.cancel().map(|_| None),
            Command::Disconnect => self.disconnect().map(|_| None),
            Command::Play => self.request_play().map(|_| None),
            Command::Pause => {
                self.request_pause();
                Ok(None)
            }
            Command::Stop => {
                self.request_stop();
                Ok(None)
            }
            Command::Seek(seconds) => {
                self.seek(seconds);
                Ok(None)
            }
            Command::SeekBy(delta) => {
                self.seek_by(delta);
                Ok(None)
            }
            Command::Volume(volume) => {
                self.set_volume(volume);
                Ok(None)
            }
            Command::VolumeBy(delta) => {
                self.nudge_volume(delta);
                Ok(None)
            }
            Command::AnswerPrompt(yes) => self.answer_prompt(yes, None).map(|_| None),
        };

        result.unwrap_or_else(|error| {
            self.report(error);
            None
        })
    }

    fn report(&mut self, error: PlayerError) {
        match error.severity() {
            ErrorSeverity::UsageError => log::warn!("{}", error),
            ErrorSeverity::Recoverable | ErrorSeverity::Informational => log::info!("{}", error),
        }
        self.notices.push_back(Notice::Error(error));
    }

    fn is_live(&self, generation: Generation) -> bool {
        self.connection.is_current(generation) && self.connection.state().is_connecting()
    }

    fn finish_attempt(&mut self) {
        self.sequencer = None;
        self.prompt_open = false;
    }

    fn apply_step(&mut self, step: Option<SequencerStep>) -> Option<TimerRequest> {
        let generation = self.connection.generation();

        match step? {
            SequencerStep::Invoke {
                index,
                total,
                target,
                timeout,
            } => {
                self.notices.push_back(Notice::AttemptStarted {
                    index,
                    total,
                    label: target.label().to_string(),
                });
                Some(TimerRequest::AttemptExpiry {
                    generation,
                    index,
                    after: timeout,
                })
            }
            SequencerStep::AwaitConfirmation { .. } => {
                self.notices.push_back(Notice::AwaitingConfirmation);
                self.prompt_timer(generation)
            }
            SequencerStep::ManualInstructions {
                text,
                attempts_made,
            } => {
                if attempts_made > 0 {
                    self.notices.push_back(Notice::Error(PlayerError::PairingUnconfirmed {
                        attempts: attempts_made,
                    }));
                }
                self.notices.push_back(Notice::ManualInstructions(text));
                self.prompt_timer(generation)
            }
        }
    }

    fn prompt_timer(&self, generation: Generation) -> Option<TimerRequest> {
        self.options.auto_prompt.then_some(TimerRequest::ConfirmPrompt {
            generation,
            after: self.options.prompt_grace,
        })
    }

    fn publish(&mut self) {
        debug_assert!(self.invariants_hold(), "playing without a connection");
        if self.listeners.is_empty() {
            return;
        }

        let view = self.view();
        for listener in &mut self.listeners {
            listener(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluetune_pairing::{strategy_for, FixedFocus, RecordingInvoker};
    use media_engine::{RecordingTransport, TransportCall};

    fn coordinator() -> PlaybackCoordinator<RecordingTransport> {
        PlaybackCoordinator::new(
            Catalog::builtin(),
            RecordingTransport::new(),
            PairingContext::new(
                strategy_for(Platform::Other),
                Box::new(RecordingInvoker::new()),
                Box::new(FixedFocus::held()),
            ),
            CoordinatorOptions::default(),
        )
    }

    fn connected() -> PlaybackCoordinator<RecordingTransport> {
        let mut coordinator = coordinator();
        coordinator.request_connect().unwrap();
        coordinator.confirm(Some("Speaker")).unwrap();
        coordinator
    }

    #[test]
    fn test_new_loads_first_track() {
        let coordinator = coordinator();
        let calls = coordinator.transport().log().snapshot();
        assert_eq!(
            calls,
            vec![
                TransportCall::Load(Catalog::builtin().first().source.clone()),
                TransportCall::SetVolume(DEFAULT_VOLUME),
            ]
        );
        assert_eq!(coordinator.playback().selected_track().id, TrackId::new(1));
    }

    #[test]
    fn test_select_unknown_track() {
        let mut coordinator = coordinator();
        let err = coordinator.select_track_by_id(TrackId::new(99)).unwrap_err();
        assert_eq!(err, PlayerError::UnknownTrack { id: TrackId::new(99) });
        assert_eq!(coordinator.playback().selected_track().id, TrackId::new(1));
    }

    #[test]
    fn test_select_resets_transport_in_order() {
        let mut coordinator = coordinator();
        let log = coordinator.transport().log();
        log.clear();

        coordinator.select_track_by_id(TrackId::new(2)).unwrap();

        let source = coordinator.catalog().require(TrackId::new(2)).unwrap().source.clone();
        assert_eq!(
            log.snapshot(),
            vec![
                TransportCall::Pause,
                TransportCall::SetPosition(0.0),
                TransportCall::Load(source),
            ]
        );
    }

    #[test]
    fn test_play_rejected_by_transport() {
        let mut coordinator = connected();
        let mut transport = RecordingTransport::new();
        transport.reject_play("blocked");
        coordinator.transport = transport;

        let err = coordinator.request_play().unwrap_err();
        assert!(matches!(err, PlayerError::PlaybackFailed { .. }));
        assert!(!coordinator.playback().is_playing());
    }

    #[test]
    fn test_manual_platform_prompts_after_grace() {
        let mut coordinator = coordinator();
        let timer = coordinator.request_connect().unwrap();

        assert_eq!(
            timer,
            Some(TimerRequest::ConfirmPrompt {
                generation: coordinator.generation(),
                after: DEFAULT_PROMPT_GRACE,
            })
        );
        let notices = coordinator.drain_notices();
        assert!(matches!(notices.as_slice(), [Notice::ManualInstructions(_)]));
        assert!(coordinator.view().awaiting_confirmation);
    }

    #[test]
    fn test_auto_prompt_disabled() {
        let mut coordinator = PlaybackCoordinator::new(
            Catalog::builtin(),
            RecordingTransport::new(),
            PairingContext::new(
                strategy_for(Platform::Other),
                Box::new(RecordingInvoker::new()),
                Box::new(FixedFocus::held()),
            ),
            CoordinatorOptions {
                auto_prompt: false,
                ..CoordinatorOptions::default()
            },
        );
        assert_eq!(coordinator.request_connect().unwrap(), None);
    }

    #[test]
    fn test_prompt_answer_no_cancels() {
        let mut coordinator = coordinator();
        let generation = coordinator.generation();
        coordinator.request_connect().unwrap();
        coordinator.on_prompt_due(coordinator.generation());
        assert!(coordinator.view().prompt_open);
        assert_ne!(generation, coordinator.generation());

        coordinator.answer_prompt(false, None).unwrap();
        assert_eq!(coordinator.connection(), &ConnectionState::Disconnected);
        assert!(!coordinator.view().prompt_open);
    }

    #[test]
    fn test_dispatch_turns_errors_into_notices() {
        let mut coordinator = coordinator();
        assert_eq!(coordinator.dispatch(Command::Play), None);
        assert_eq!(
            coordinator.drain_notices(),
            vec![Notice::Error(PlayerError::NotConnected)]
        );
    }

    #[test]
    fn test_volume_nudge_clamps() {
        let mut coordinator = coordinator();
        assert_eq!(coordinator.nudge_volume(0.5), 1.0);
        assert_eq!(
            coordinator.transport().log().snapshot().last(),
            Some(&TransportCall::SetVolume(1.0))
        );
    }

    #[test]
    fn test_listener_sees_every_change() {
        use std::sync::{Arc, Mutex};

        let mut coordinator = coordinator();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        coordinator.subscribe(move |view: &ViewState| {
            sink.lock().unwrap().push(view.connection.status());
        });

        coordinator.request_connect().unwrap();
        coordinator.confirm(None).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first().map(|s| s.to_string()), Some("connecting".to_string()));
        assert_eq!(seen.last().map(|s| s.to_string()), Some("connected".to_string()));
    }
}
