// crates/cli/src/input.rs
//! Line commands typed during a play session

use bluetune_coordinator::Command;
use bluetune_core::{parse_clock, TrackId};

/// Step sizes for the relative commands
#[derive(Debug, Clone, Copy)]
pub struct Steps {
    pub seek_secs: f64,
    pub volume: f32,
}

/// What one input line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Status,
    Tracks,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Commands:
  select N          choose track N
  connect           open Bluetooth settings and start pairing
  confirm [LABEL]   confirm the device is connected
  cancel            abandon a pending connection
  disconnect        drop the connection (pauses playback)
  play | pause | stop
  seek S            jump to S seconds or m:ss; +S / -S move relative
  >  <              skip forward / back one step
  vol V             set volume, 0.0-1.0 or NN%
  +  -              volume up / down one step
  yes | no          answer the connection prompt
  tracks            list tracks
  status            show the current state
  quit              leave";

/// Parses one line; errors are messages for the user
pub fn parse_line(line: &str, steps: Steps) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "select" | "s" => Input::Command(Command::Select(parse_track(rest)?)),
        "connect" | "c" => Input::Command(Command::Connect),
        "confirm" => {
            let label = (!rest.is_empty()).then(|| rest.to_string());
            Input::Command(Command::Confirm(label))
        }
        "cancel" => Input::Command(Command::Cancel),
        "disconnect" | "d" => Input::Command(Command::Disconnect),
        "play" | "p" => Input::Command(Command::Play),
        "pause" => Input::Command(Command::Pause),
        "stop" => Input::Command(Command::Stop),
        "seek" => Input::Command(parse_seek(rest)?),
        ">" => Input::Command(Command::SeekBy(steps.seek_secs)),
        "<" => Input::Command(Command::SeekBy(-steps.seek_secs)),
        "vol" | "volume" => Input::Command(Command::Volume(parse_volume(rest)?)),
        "+" => Input::Command(Command::VolumeBy(steps.volume)),
        "-" => Input::Command(Command::VolumeBy(-steps.volume)),
        "yes" | "y" => Input::Command(Command::AnswerPrompt(true)),
        "no" | "n" => Input::Command(Command::AnswerPrompt(false)),
        "tracks" | "list" => Input::Tracks,
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(format!("Unknown command '{}', type 'help'", other)),
    };

    Ok(input)
}

fn parse_track(arg: &str) -> Result<TrackId, String> {
    arg.parse::<TrackId>()
        .map_err(|_| format!("Expected a track number, got '{}'", arg))
}

fn parse_seek(arg: &str) -> Result<Command, String> {
    let invalid = || format!("Expected seconds or m:ss, got '{}'", arg);

    if let Some(delta) = arg.strip_prefix('+') {
        return parse_seconds(delta).map(Command::SeekBy).ok_or_else(invalid);
    }
    if let Some(delta) = arg.strip_prefix('-') {
        return parse_seconds(delta)
            .map(|secs| Command::SeekBy(-secs))
            .ok_or_else(invalid);
    }

    parse_seconds(arg).map(Command::Seek).ok_or_else(invalid)
}

fn parse_seconds(arg: &str) -> Option<f64> {
    if arg.contains(':') {
        return parse_clock(arg);
    }
    arg.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}

fn parse_volume(arg: &str) -> Result<f32, String> {
    let invalid = || format!("Expected a volume between 0.0 and 1.0 or 0% and 100%, got '{}'", arg);

    match arg.strip_suffix('%') {
        Some(percent) => percent
            .trim()
            .parse::<f32>()
            .map(|p| p / 100.0)
            .map_err(|_| invalid()),
        None => arg.parse::<f32>().map_err(|_| invalid()),
    }
}
