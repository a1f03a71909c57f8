//! Domain types for BlueTune
//!
//! - `track`: Track records and identifiers
//! - `connection`: Bluetooth connection state
//! - `playback`: UI-visible transport state
//! - `platform`: Host platform classification
//! - `common`: Shared traits and formatting helpers

mod common;
mod connection;
mod platform;
mod playback;
mod track;

pub use common::{clamp_finite, format_clock, parse_clock, Validator};
pub use connection::{ConnectionState, ConnectionStatus};
pub use platform::Platform;
pub use playback::{PlaybackState, DEFAULT_VOLUME};
pub use track::{SourceRef, Track, TrackId};
