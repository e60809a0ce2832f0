//! Tenant-scoped known-face gallery, rebuilt wholesale from roster
//! snapshots.
//!
//! A `Gallery` is an owned value: `rebuild` produces a fresh instance the
//! caller swaps in, so readers never observe a partially built gallery
//! and tenants never share one unless the caller chooses to.

use crate::codec;
use crate::types::FaceEncoding;
use serde::Deserialize;

/// One roster record from the identity store: key and display name, plus
/// the stored encoding text if the identity has been enrolled.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub key: String,
    pub name: String,
    pub encoding: Option<String>,
}

/// A loaded identity ready for matching.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub key: String,
    pub name: String,
    pub encoding: FaceEncoding,
}

/// Per-rebuild load accounting, for caller-level reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// The active set of known identities for one tenant.
///
/// Entries keep roster order; the matcher's first-wins tie-break makes
/// that order part of the contract. The empty gallery is a valid state
/// (before the first rebuild, or for a tenant with no enrollments).
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    /// The state before any rebuild.
    pub fn empty() -> Gallery {
        Gallery::default()
    }

    /// Build a replacement gallery from a roster snapshot.
    ///
    /// A record with an absent, unparsable, wrong-dimension, or zero-norm
    /// encoding is logged and skipped, never aborting the rebuild. Stored
    /// encodings are re-normalized on load regardless of how they were
    /// written.
    pub fn rebuild(roster: &[RosterEntry]) -> (Gallery, RebuildReport) {
        let mut entries = Vec::with_capacity(roster.len());
        let mut report = RebuildReport::default();

        for record in roster {
            let Some(text) = record.encoding.as_deref() else {
                tracing::warn!(key = %record.key, name = %record.name, "no stored encoding, skipping");
                report.failed += 1;
                continue;
            };

            match codec::deserialize(text) {
                Ok(encoding) => {
                    entries.push(GalleryEntry {
                        key: record.key.clone(),
                        name: record.name.clone(),
                        encoding,
                    });
                    report.succeeded += 1;
                }
                Err(err) => {
                    tracing::warn!(key = %record.key, name = %record.name, error = %err, "corrupt stored encoding, skipping");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            loaded = report.succeeded,
            skipped = report.failed,
            total = roster.len(),
            "gallery rebuilt"
        );

        (Gallery { entries }, report)
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<GalleryEntry>) -> Gallery {
        Gallery { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in roster order.
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&GalleryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}
