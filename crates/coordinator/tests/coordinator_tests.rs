//! Behavioural tests for the playback coordinator

use bluetune_coordinator::{
    Command, CoordinatorOptions, Notice, PairingContext, PlaybackCoordinator, TimerRequest,
    ViewState,
};
use bluetune_core::{Catalog, ConnectionState, Platform, PlayerError, TrackId};
use bluetune_pairing::{strategy_for, FixedFocus, FocusProbe, RecordingInvoker, ScriptedFocus};
use media_engine::{
    CallLog, MediaTransport, RecordingTransport, SimulatedTransport, TransportCall, TransportEvent,
};
use std::time::Duration;

fn pairing(
    platform: Platform,
    focus: impl FocusProbe + 'static,
) -> (PairingContext, RecordingInvoker) {
    let invoker = RecordingInvoker::new();
    let context = PairingContext::new(
        strategy_for(platform),
        Box::new(invoker.clone()),
        Box::new(focus),
    );
    (context, invoker)
}

fn recording() -> PlaybackCoordinator<RecordingTransport> {
    let (context, _) = pairing(Platform::Other, FixedFocus::held());
    PlaybackCoordinator::new(
        Catalog::builtin(),
        RecordingTransport::new(),
        context,
        CoordinatorOptions::default(),
    )
}

fn simulated() -> PlaybackCoordinator<SimulatedTransport> {
    let catalog = Catalog::builtin();
    let transport = SimulatedTransport::for_catalog(&catalog);
    let (context, _) = pairing(Platform::Other, FixedFocus::held());
    let mut coordinator =
        PlaybackCoordinator::new(catalog, transport, context, CoordinatorOptions::default());
    coordinator.pump_transport();
    coordinator
}

fn connect<T: MediaTransport>(coordinator: &mut PlaybackCoordinator<T>, label: &str) {
    coordinator.request_connect().unwrap();
    coordinator.confirm(Some(label)).unwrap();
}

#[test]
fn test_play_while_disconnected() {
    let mut coordinator = recording();

    assert_eq!(coordinator.request_play(), Err(PlayerError::NotConnected));
    assert!(!coordinator.playback().is_playing());
    assert!(!coordinator
        .transport()
        .log()
        .snapshot()
        .contains(&TransportCall::Play));
}

#[test]
fn test_connect_confirm_play() {
    let mut coordinator = recording();

    coordinator.request_connect().unwrap();
    assert_eq!(coordinator.connection(), &ConnectionState::Connecting);

    coordinator.confirm(Some("Speaker")).unwrap();
    assert_eq!(
        coordinator.connection(),
        &ConnectionState::Connected {
            device_label: "Speaker".to_string()
        }
    );

    coordinator.request_play().unwrap();
    assert!(coordinator.playback().is_playing());
}

#[test]
fn test_disconnect_pauses_before_state_is_observed() {
    #[derive(Debug, Clone, PartialEq)]
    enum Entry {
        Transport(TransportCall),
        Observed(ConnectionState),
    }

    let journal = CallLog::new();
    let transport = RecordingTransport::with_log(journal.clone(), Entry::Transport);
    let (context, _) = pairing(Platform::Other, FixedFocus::held());
    let mut coordinator = PlaybackCoordinator::new(
        Catalog::builtin(),
        transport,
        context,
        CoordinatorOptions::default(),
    );

    connect(&mut coordinator, "Speaker");
    coordinator.request_play().unwrap();

    let sink = journal.clone();
    coordinator.subscribe(move |view: &ViewState| {
        sink.push(Entry::Observed(view.connection.clone()));
    });
    journal.clear();

    coordinator.disconnect().unwrap();

    let entries = journal.snapshot();
    let pause = entries
        .iter()
        .position(|e| *e == Entry::Transport(TransportCall::Pause))
        .expect("transport was paused");
    let observed = entries
        .iter()
        .position(|e| *e == Entry::Observed(ConnectionState::Disconnected))
        .expect("listener saw the disconnect");

    assert!(pause < observed);
    assert_eq!(coordinator.connection(), &ConnectionState::Disconnected);
    assert!(!coordinator.playback().is_playing());
}

#[test]
fn test_stale_expiry_after_cancel_is_ignored() {
    let invoker = RecordingInvoker::new();
    let context = PairingContext::new(
        strategy_for(Platform::Android),
        Box::new(invoker.clone()),
        Box::new(FixedFocus::held()),
    );
    let mut coordinator = PlaybackCoordinator::new(
        Catalog::builtin(),
        RecordingTransport::new(),
        context,
        CoordinatorOptions::default(),
    );

    let timer = coordinator.request_connect().unwrap();
    let Some(TimerRequest::AttemptExpiry {
        generation, index, ..
    }) = timer
    else {
        panic!("expected an attempt timer, got {:?}", timer);
    };

    coordinator.cancel().unwrap();
    let before = coordinator.view();
    coordinator.drain_notices();

    assert_eq!(coordinator.on_attempt_expired(generation, index), None);
    coordinator.on_prompt_due(generation);

    assert_eq!(coordinator.view(), before);
    assert!(coordinator.drain_notices().is_empty());
    assert_eq!(invoker.count(), 1);
}

#[test]
fn test_stale_expiry_from_previous_attempt_is_ignored() {
    let (context, invoker) = pairing(Platform::Android, FixedFocus::held());
    let mut coordinator = PlaybackCoordinator::new(
        Catalog::builtin(),
        RecordingTransport::new(),
        context,
        CoordinatorOptions::default(),
    );

    let stale = coordinator.request_connect().unwrap().unwrap();
    coordinator.cancel().unwrap();
    let fresh = coordinator.request_connect().unwrap().unwrap();
    assert_ne!(stale.generation(), fresh.generation());

    assert_eq!(
        coordinator.on_attempt_expired(stale.generation(), attempt_index(stale)),
        None
    );
    assert_eq!(invoker.count(), 2);

    assert!(coordinator
        .on_attempt_expired(fresh.generation(), attempt_index(fresh))
        .is_some());
    assert_eq!(invoker.count(), 3);
}

fn attempt_index(timer: TimerRequest) -> usize {
    match timer {
        TimerRequest::AttemptExpiry { index, .. } => index,
        TimerRequest::ConfirmPrompt { .. } => panic!("expected an attempt timer"),
    }
}

#[test]
fn test_seek_is_clamped_to_duration() {
    let mut coordinator = recording();
    coordinator.handle_transport_event(TransportEvent::MetadataLoaded(200.0));

    assert_eq!(coordinator.seek(-5.0), 0.0);
    assert_eq!(coordinator.playback().position_secs(), 0.0);

    assert_eq!(coordinator.seek(500.0), 200.0);
    assert_eq!(coordinator.playback().position_secs(), 200.0);
    assert_eq!(
        coordinator.transport().log().snapshot().last(),
        Some(&TransportCall::SetPosition(200.0))
    );

    assert_eq!(coordinator.seek(f64::NAN), 0.0);
}

#[test]
fn test_ended_stops_playback() {
    let mut coordinator = recording();
    connect(&mut coordinator, "Speaker");
    coordinator.request_play().unwrap();
    coordinator.handle_transport_event(TransportEvent::MetadataLoaded(200.0));
    coordinator.handle_transport_event(TransportEvent::TimeUpdate(199.0));

    coordinator.handle_transport_event(TransportEvent::Ended);

    assert!(!coordinator.playback().is_playing());
    assert_eq!(coordinator.playback().position_secs(), 0.0);
    assert!(coordinator.drain_notices().contains(&Notice::TrackEnded));
}

#[test]
fn test_pause_is_idempotent() {
    let mut coordinator = recording();
    connect(&mut coordinator, "Speaker");
    coordinator.request_play().unwrap();

    coordinator.request_pause();
    let once = coordinator.view();
    coordinator.request_pause();

    assert_eq!(coordinator.view(), once);
    assert!(!once.playback.is_playing());
}

#[test]
fn test_select_round_trip() {
    let mut coordinator = simulated();
    connect(&mut coordinator, "Speaker");
    coordinator.request_play().unwrap();
    coordinator.advance_transport(Duration::from_secs(30));

    coordinator.select_track_by_id(TrackId::new(1)).unwrap();
    coordinator.select_track_by_id(TrackId::new(2)).unwrap();
    coordinator.select_track_by_id(TrackId::new(1)).unwrap();

    let playback = coordinator.playback();
    assert_eq!(playback.selected_track().id, TrackId::new(1));
    assert_eq!(playback.position_secs(), 0.0);
    assert!(!playback.is_playing());
}

#[test]
fn test_select_keeps_duration_until_metadata() {
    let mut coordinator = simulated();
    assert_eq!(coordinator.playback().duration_secs(), 225.0);

    coordinator.select_track_by_id(TrackId::new(2)).unwrap();
    assert_eq!(coordinator.playback().duration_secs(), 225.0);

    coordinator.pump_transport();
    assert_eq!(coordinator.playback().duration_secs(), 260.0);
}

#[test]
fn test_playing_through_simulated_transport() {
    let mut coordinator = simulated();
    connect(&mut coordinator, "Speaker");
    coordinator.request_play().unwrap();

    coordinator.advance_transport(Duration::from_secs(90));
    assert_eq!(coordinator.playback().position_secs(), 90.0);
    assert_eq!(coordinator.view().time_label(), "1:30 / 3:45");

    coordinator.advance_transport(Duration::from_secs(200));
    assert!(!coordinator.playback().is_playing());
    assert_eq!(coordinator.playback().position_secs(), 0.0);
}

#[test]
fn test_focus_lost_awaits_confirmation() {
    let (context, invoker) = pairing(Platform::Ios, ScriptedFocus::new([false], true));
    let mut coordinator = PlaybackCoordinator::new(
        Catalog::builtin(),
        RecordingTransport::new(),
        context,
        CoordinatorOptions::default(),
    );

    let first = coordinator.request_connect().unwrap().unwrap();
    let prompt = coordinator
        .on_attempt_expired(first.generation(), 0)
        .unwrap();

    assert!(matches!(prompt, TimerRequest::ConfirmPrompt { .. }));
    assert_eq!(invoker.count(), 1);
    assert!(coordinator.view().awaiting_confirmation);
    assert_eq!(coordinator.connection(), &ConnectionState::Connecting);

    coordinator.on_prompt_due(prompt.generation());
    assert!(coordinator.view().prompt_open);
    coordinator.answer_prompt(true, None).unwrap();
    assert_eq!(
        coordinator.connection().device_label(),
        Some(bluetune_coordinator::DEFAULT_DEVICE_LABEL)
    );
}

#[test]
fn test_exhausted_attempts_report_unconfirmed() {
    let (context, invoker) = pairing(Platform::Android, FixedFocus::held());
    let mut coordinator = PlaybackCoordinator::new(
        Catalog::builtin(),
        RecordingTransport::new(),
        context,
        CoordinatorOptions::default(),
    );

    let first = coordinator.request_connect().unwrap().unwrap();
    let second = coordinator.on_attempt_expired(first.generation(), 0).unwrap();
    let prompt = coordinator.on_attempt_expired(second.generation(), 1).unwrap();

    assert!(matches!(prompt, TimerRequest::ConfirmPrompt { .. }));
    assert_eq!(invoker.count(), 2);

    let notices = coordinator.drain_notices();
    assert!(notices.contains(&Notice::Error(PlayerError::PairingUnconfirmed { attempts: 2 })));
    assert!(notices
        .iter()
        .any(|n| matches!(n, Notice::ManualInstructions(_))));
    assert_eq!(coordinator.connection(), &ConnectionState::Connecting);
}

#[test]
fn test_never_connected_without_confirmation() {
    let mut coordinator = recording();
    let timer = coordinator.request_connect().unwrap().unwrap();

    coordinator.on_prompt_due(timer.generation());
    coordinator.on_prompt_due(timer.generation());

    assert_eq!(coordinator.connection(), &ConnectionState::Connecting);
    assert_eq!(coordinator.request_play(), Err(PlayerError::NotConnected));
}

#[test]
fn test_invalid_transitions_leave_state_alone() {
    let mut coordinator = recording();
    connect(&mut coordinator, "Speaker");

    assert!(matches!(
        coordinator.request_connect(),
        Err(PlayerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        coordinator.cancel(),
        Err(PlayerError::InvalidTransition { .. })
    ));
    assert!(coordinator.connection().is_connected());

    coordinator.disconnect().unwrap();
    assert!(matches!(
        coordinator.disconnect(),
        Err(PlayerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        coordinator.confirm(Some("Speaker")),
        Err(PlayerError::InvalidTransition { .. })
    ));
}

#[test]
fn test_invariants_hold_across_command_sequence() {
    let mut coordinator = simulated();
    let commands = [
        Command::Play,
        Command::Connect,
        Command::Play,
        Command::Confirm(Some("Speaker".to_string())),
        Command::Play,
        Command::SeekBy(10.0),
        Command::Select(TrackId::new(3)),
        Command::Play,
        Command::Disconnect,
        Command::Play,
        Command::Connect,
        Command::Cancel,
        Command::Play,
        Command::Connect,
        Command::AnswerPrompt(true),
        Command::Play,
        Command::Stop,
        Command::Play,
        Command::Volume(2.0),
        Command::VolumeBy(-0.25),
    ];

    for command in commands {
        coordinator.dispatch(command);
        coordinator.advance_transport(Duration::from_secs(1));

        let view = coordinator.view();
        assert!(coordinator.invariants_hold());
        assert_eq!(
            view.connection.device_label().is_some(),
            view.connection.is_connected()
        );
        assert!((0.0..=1.0).contains(&view.playback.volume()));
    }

    assert!(coordinator.playback().is_playing());
    assert_eq!(coordinator.playback().volume(), 0.75);
}
