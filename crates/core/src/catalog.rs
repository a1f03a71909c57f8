//! Track catalog
//!
//! An immutable, ordered list of tracks built once at startup. There is no
//! update API; a different catalog means a new process.

use crate::error::{PlayerError, Result};
use crate::types::{Track, TrackId, Validator};
use std::collections::HashSet;

/// Ordered, immutable list of tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty lists, duplicate ids and invalid tracks
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::InvalidCatalog {
                reason: "catalog must contain at least one track".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for track in &tracks {
            if !seen.insert(track.id) {
                return Err(PlayerError::InvalidCatalog {
                    reason: format!("duplicate track id {}", track.id),
                });
            }
            if let Err(errors) = track.validate() {
                return Err(PlayerError::InvalidCatalog {
                    reason: errors.join("; "),
                });
            }
        }

        Ok(Self { tracks })
    }

    /// The three bundled demo songs
    pub fn builtin() -> Self {
        Self {
            tracks: builtin_tracks(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Looks up a track, reporting `UnknownTrack` when absent
    pub fn require(&self, id: TrackId) -> Result<&Track> {
        self.get(id).ok_or(PlayerError::UnknownTrack { id })
    }

    /// The track selected at startup
    pub fn first(&self) -> &Track {
        // `new` and `builtin` both guarantee at least one track
        &self.tracks[0]
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Bundled catalog entries
pub fn builtin_tracks() -> Vec<Track> {
    vec![
        Track::new(1, "Song 1", "Artist 1", "3:45", "/songs/song1.mp3"),
        Track::new(2, "Song 2", "Artist 2", "4:20", "/songs/song2.mp3"),
        Track::new(3, "Song 3", "Artist 3", "3:15", "/songs/song3.mp3"),
    ]
}
