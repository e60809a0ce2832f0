//! Nearest-neighbor identity classification against the active gallery.

use crate::gallery::Gallery;
use crate::types::FaceEncoding;

/// Maximum acceptable Euclidean distance for a positive identification.
///
/// Calibrated for unit-normalized 10 000-dimensional pixel vectors; do
/// not reuse verbatim if the encoding scheme changes.
pub const MATCH_THRESHOLD: f32 = 0.6;

/// Outcome of classifying one probe encoding. `key` and `name` are set
/// only on a positive match; `distance` always carries the best distance
/// found (+∞ against an empty gallery) for diagnostics.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub key: Option<String>,
    pub name: Option<String>,
    pub distance: f32,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        self.key.is_some()
    }
}

/// Strategy for classifying a probe encoding against a gallery.
pub trait Matcher {
    fn classify(&self, probe: &FaceEncoding, gallery: &Gallery) -> MatchOutcome;
}

/// Linear-scan Euclidean nearest neighbor with a fixed accept threshold.
pub struct NearestNeighborMatcher {
    threshold: f32,
}

impl NearestNeighborMatcher {
    pub fn new() -> NearestNeighborMatcher {
        NearestNeighborMatcher {
            threshold: MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f32) -> NearestNeighborMatcher {
        NearestNeighborMatcher { threshold }
    }
}

impl Default for NearestNeighborMatcher {
    fn default() -> Self {
        NearestNeighborMatcher::new()
    }
}

impl Matcher for NearestNeighborMatcher {
    fn classify(&self, probe: &FaceEncoding, gallery: &Gallery) -> MatchOutcome {
        let mut best_distance = f32::INFINITY;
        let mut best_idx: Option<usize> = None;

        // Strict < keeps the first entry in gallery order on exact ties.
        for (i, entry) in gallery.entries().iter().enumerate() {
            let distance = probe.distance(&entry.encoding);
            if distance < best_distance {
                best_distance = distance;
                best_idx = Some(i);
            }
        }

        match best_idx {
            Some(idx) if best_distance < self.threshold => {
                let entry = &gallery.entries()[idx];
                MatchOutcome {
                    key: Some(entry.key.clone()),
                    name: Some(entry.name.clone()),
                    distance: best_distance,
                }
            }
            _ => MatchOutcome {
                key: None,
                name: None,
                distance: best_distance,
            },
        }
    }
}
