//! User commands accepted by the coordinator

use bluetune_core::TrackId;

/// One user intent, as produced by a front end
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(TrackId),
    Connect,
    /// Confirm pairing, optionally naming the device
    Confirm(Option<String>),
    Cancel,
    Disconnect,
    Play,
    Pause,
    Stop,
    /// Absolute seek in seconds
    Seek(f64),
    /// Relative seek in seconds
    SeekBy(f64),
    Volume(f32),
    VolumeBy(f32),
    /// Answer to the confirmation prompt
    AnswerPrompt(bool),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Connect => "connect",
            Self::Confirm(_) => "confirm",
            Self::Cancel => "cancel",
            Self::Disconnect => "disconnect",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Seek(_) | Self::SeekBy(_) => "seek",
            Self::Volume(_) | Self::VolumeBy(_) => "volume",
            Self::AnswerPrompt(_) => "answer",
        }
    }
}
