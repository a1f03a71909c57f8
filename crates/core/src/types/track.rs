//! Track domain model

use crate::types::Validator;
use serde::{Deserialize, Serialize};

/// Unique identifier for a track in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u32);

impl TrackId {
    /// Creates a track id from its numeric value
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TrackId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

/// Opaque locator for a playable audio resource
///
/// Only the media transport interprets it; the rest of the system passes it
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry of the track catalog
///
/// `duration_label` is display text only; the authoritative duration comes
/// from the media transport once it has loaded the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub duration_label: String,
    pub source: SourceRef,
}

impl Track {
    /// Creates a new track
    pub fn new(
        id: u32,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_label: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            duration_label: duration_label.into(),
            source: SourceRef::new(source),
        }
    }

    /// Returns "Title - Artist" for one-line displays
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

impl Validator for Track {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(format!("Track {} has an empty title", self.id));
        }

        if self.source.as_str().trim().is_empty() {
            errors.push(format!("Track {} has an empty source", self.id));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_new() {
        let track = Track::new(1, "Song 1", "Artist 1", "3:45", "/songs/song1.mp3");
        assert_eq!(track.id, TrackId::new(1));
        assert_eq!(track.source.as_str(), "/songs/song1.mp3");
        assert_eq!(track.display_name(), "Song 1 - Artist 1");
    }

    #[test]
    fn test_track_id_parse() {
        assert_eq!(" 3 ".parse::<TrackId>().ok(), Some(TrackId::new(3)));
        assert!("three".parse::<TrackId>().is_err());
    }

    #[test]
    fn test_track_validation() {
        let track = Track::new(1, "Song", "Artist", "1:00", "song.mp3");
        assert!(track.is_valid());

        let untitled = Track::new(2, "  ", "Artist", "1:00", "");
        let errors = untitled.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_track_serde_shape() {
        let track = Track::new(7, "Song", "Artist", "1:00", "song.mp3");
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["source"], "song.mp3");
    }
}
