//! Async driver for the coordinator
//!
//! A single task owns the coordinator and applies events one at a time from
//! one channel. Timers are detached tasks that only send events back; they
//! carry the generation they were scheduled under, so a timer that outlives
//! its connection attempt arrives as a no-op.

use crate::command::Command;
use crate::coordinator::PlaybackCoordinator;
use crate::view::{Notice, TimerRequest, ViewState};
use bluetune_pairing::Generation;
use media_engine::MediaTransport;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Everything the session loop reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Command(Command),
    AttemptExpired { generation: Generation, index: usize },
    PromptDue { generation: Generation },
    Shutdown,
}

impl From<TimerRequest> for SessionEvent {
    fn from(timer: TimerRequest) -> Self {
        match timer {
            TimerRequest::AttemptExpiry {
                generation, index, ..
            } => Self::AttemptExpired { generation, index },
            TimerRequest::ConfirmPrompt { generation, .. } => Self::PromptDue { generation },
        }
    }
}

/// What triggered an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCause {
    Command,
    Timer,
    Transport,
}

/// Rendered after every applied event
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub view: ViewState,
    pub notices: Vec<Notice>,
    pub cause: UpdateCause,
}

/// Sends commands into a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Returns false once the session has stopped
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(SessionEvent::Command(command)).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionEvent::Shutdown);
    }
}

pub struct Session<T: MediaTransport> {
    coordinator: PlaybackCoordinator<T>,
    tick: Duration,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<T: MediaTransport> Session<T> {
    /// `tick` is how often the transport clock advances
    pub fn new(coordinator: PlaybackCoordinator<T>, tick: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            coordinator,
            tick: tick.max(Duration::from_millis(1)),
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    /// Runs until shutdown and hands the coordinator back
    pub async fn run<F>(self, mut render: F) -> PlaybackCoordinator<T>
    where
        F: FnMut(SessionUpdate),
    {
        let Session {
            mut coordinator,
            tick,
            tx,
            mut rx,
        } = self;

        let mut ticker = time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        let mut last_tick = Instant::now();

        log::info!("Session started");
        render(snapshot(&mut coordinator, UpdateCause::Command));

        loop {
            tokio::select! {
                event = rx.recv() => {
                    let cause = match event {
                        None | Some(SessionEvent::Shutdown) => break,
                        Some(SessionEvent::Command(command)) => {
                            schedule(&tx, coordinator.dispatch(command));
                            UpdateCause::Command
                        }
                        Some(SessionEvent::AttemptExpired { generation, index }) => {
                            schedule(&tx, coordinator.on_attempt_expired(generation, index));
                            UpdateCause::Timer
                        }
                        Some(SessionEvent::PromptDue { generation }) => {
                            coordinator.on_prompt_due(generation);
                            UpdateCause::Timer
                        }
                    };
                    render(snapshot(&mut coordinator, cause));
                }
                now = ticker.tick() => {
                    let elapsed = now.duration_since(last_tick);
                    last_tick = now;
                    if coordinator.advance_transport(elapsed) > 0 {
                        render(snapshot(&mut coordinator, UpdateCause::Transport));
                    }
                }
            }
        }

        log::info!("Session stopped");
        coordinator
    }
}

fn snapshot<T: MediaTransport>(
    coordinator: &mut PlaybackCoordinator<T>,
    cause: UpdateCause,
) -> SessionUpdate {
    SessionUpdate {
        view: coordinator.view(),
        notices: coordinator.drain_notices(),
        cause,
    }
}

fn schedule(tx: &mpsc::UnboundedSender<SessionEvent>, timer: Option<TimerRequest>) {
    let Some(timer) = timer else {
        return;
    };

    let tx = tx.clone();
    tokio::spawn(async move {
        time::sleep(timer.after()).await;
        let _ = tx.send(SessionEvent::from(timer));
    });
}
