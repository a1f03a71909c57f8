//! Media Engine - media transport contract and reference transports for BlueTune
//!
//! The coordinator drives audio through the [`MediaTransport`] trait and never
//! decodes anything itself. [`SimulatedTransport`] is a clock-driven stand-in
//! used by the command-line front end; [`RecordingTransport`] records calls
//! for tests.

mod error;
mod recording;
mod simulated;
mod state;
mod transport;

pub use error::{EngineError, EngineResult};
pub use recording::{CallLog, RecordingTransport, TransportCall};
pub use simulated::SimulatedTransport;
pub use state::TransportState;
pub use transport::{MediaTransport, TransportEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}
