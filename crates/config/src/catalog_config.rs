//! Track catalog configuration section

use crate::error::ConfigResult;
use crate::validation::{ConfigSection, ValidationError, Validator};
use bluetune_core::catalog::builtin_tracks;
use bluetune_core::{Catalog, Track, TrackId, Validator as _};
use serde::{Deserialize, Serialize};

/// Tracks offered for playback, in display order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub tracks: Vec<Track>,
}

impl CatalogConfig {
    /// Builds the immutable catalog used at runtime
    pub fn to_catalog(&self) -> ConfigResult<Catalog> {
        Ok(Catalog::new(self.tracks.clone())?)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tracks: builtin_tracks(),
        }
    }
}

impl ConfigSection for CatalogConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = Vec::new();

        if self.tracks.is_empty() {
            results.push(Err(ValidationError::new(
                "catalog.tracks",
                "must contain at least one track",
            )));
        }

        let ids: Vec<TrackId> = self.tracks.iter().map(|t| t.id).collect();
        results.push(Validator::unique(&ids, "catalog.tracks.id"));

        for (i, track) in self.tracks.iter().enumerate() {
            if let Err(problems) = track.validate() {
                for problem in problems {
                    results.push(Err(ValidationError::new(
                        format!("catalog.tracks[{}]", i),
                        problem,
                    )));
                }
            }
        }

        Validator::collect_errors(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_builtin_catalog() {
        let config = CatalogConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_catalog().unwrap(), Catalog::builtin());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let config = CatalogConfig { tracks: Vec::new() };
        assert!(config.validate().is_err());
        assert!(config.to_catalog().is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut config = CatalogConfig::default();
        config.tracks.push(Track::new(1, "Again", "Artist", "1:00", "/songs/again.mp3"));

        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "catalog.tracks.id");
    }

    #[test]
    fn test_invalid_track_reported_by_index() {
        let mut config = CatalogConfig::default();
        config.tracks.push(Track::new(9, "", "Artist", "1:00", "/songs/x.mp3"));

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().all(|e| e.field == "catalog.tracks[3]"));
    }
}
