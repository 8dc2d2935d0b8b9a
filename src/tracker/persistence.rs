//! Miss eviction and persistence gating.

use log::debug;

use crate::tracker::track::Track;
use crate::tracker::track_state::TrackState;
use crate::tracker::track_store::TrackStore;

/// Evicts tracks that have been missing too long and decides which of the
/// remaining tracks are reliable enough to be reported.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceEvaluator {
    pub max_consecutive_miss: u32,
    pub min_persistence_ratio: f32,
}

impl PersistenceEvaluator {
    pub fn new(max_consecutive_miss: u32, min_persistence_ratio: f32) -> Self {
        Self {
            max_consecutive_miss,
            min_persistence_ratio,
        }
    }

    pub fn is_stale(&self, track: &Track) -> bool {
        track.consecutive_misses > self.max_consecutive_miss
    }

    pub fn passes_gate(&self, track: &Track) -> bool {
        track.persistence_ratio() >= self.min_persistence_ratio
    }

    /// Run one frame of evaluation over the store.
    ///
    /// Returns the evicted tracks, smallest id first.
    pub fn evaluate(&self, store: &mut TrackStore) -> Vec<Track> {
        let mut stale: Vec<_> = store
            .iter()
            .filter(|t| self.is_stale(t))
            .map(|t| t.id)
            .collect();
        stale.sort_unstable();

        let removed: Vec<Track> = stale
            .into_iter()
            .filter_map(|id| store.free(id).ok())
            .inspect(|t| {
                debug!(
                    "track {} evicted after {} missed frames",
                    t.id, t.consecutive_misses
                )
            })
            .collect();

        for track in store.iter_mut() {
            track.reportable = self.passes_gate(track);
            if track.reportable && track.state == TrackState::Candidate {
                track.state = TrackState::Tracked;
                debug!(
                    "track {} confirmed (persistence {:.2})",
                    track.id,
                    track.persistence_ratio()
                );
            }
        }

        removed
    }
}
