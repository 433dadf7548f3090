//! Wallpaper settings loaded from a JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable wallpaper parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of animated blobs
    pub blob_count: usize,
    /// Shortest time a blob spends travelling to its next waypoint, in ms
    pub travel_min_ms: i64,
    /// Longest time a blob spends travelling to its next waypoint, in ms
    pub travel_max_ms: i64,
    /// Fixed RNG seed for reproducible motion; omit for a fresh run each start
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blob_count: 20,
            travel_min_ms: 8000,
            travel_max_ms: 12000,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }

    /// Blob count floored at one
    pub fn blob_count(&self) -> usize {
        self.blob_count.max(1)
    }

    /// Travel window as an ordered half-open range, at least 1 ms wide
    pub fn travel_range(&self) -> (i64, i64) {
        let (min, max) = if self.travel_min_ms <= self.travel_max_ms {
            (self.travel_min_ms, self.travel_max_ms)
        } else {
            (self.travel_max_ms, self.travel_min_ms)
        };
        let min = min.max(1);
        (min, max.max(min + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let s = Settings::default();
        assert_eq!(s.blob_count, 20);
        assert_eq!(s.travel_range(), (8000, 12000));
        assert!(s.seed.is_none());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"blob_count": 5}"#).unwrap();
        assert_eq!(s.blob_count, 5);
        assert_eq!(s.travel_min_ms, 8000);
        assert_eq!(s.travel_max_ms, 12000);
    }

    #[test]
    fn test_degenerate_ranges_are_normalized() {
        let s = Settings {
            travel_min_ms: 12000,
            travel_max_ms: 8000,
            ..Settings::default()
        };
        assert_eq!(s.travel_range(), (8000, 12000));

        let s = Settings {
            travel_min_ms: 500,
            travel_max_ms: 500,
            ..Settings::default()
        };
        let (min, max) = s.travel_range();
        assert!(min < max);

        let s = Settings {
            blob_count: 0,
            ..Settings::default()
        };
        assert_eq!(s.blob_count(), 1);
    }
}
