//! Connection-gated playback coordination for BlueTune
//!
//! The [`PlaybackCoordinator`] owns the connection state machine, the
//! playback state and the media transport. [`Session`] drives it from a
//! single tokio task, turning pairing timers and the transport clock into
//! events on one channel.

mod command;
mod connection;
mod coordinator;
mod session;
mod view;

pub use command::Command;
pub use connection::{ConnectAttempt, ConnectionStateMachine, DEFAULT_DEVICE_LABEL};
pub use coordinator::{
    CoordinatorOptions, PairingContext, PlaybackCoordinator, DEFAULT_PROMPT_GRACE,
};
pub use session::{Session, SessionEvent, SessionHandle, SessionUpdate, UpdateCause};
pub use view::{Notice, TimerRequest, ViewState};
