//! Stillness counting and the abandonment alarm.

use log::{debug, info};

use crate::tracker::track::{Track, TrackId};
use crate::tracker::track_state::{Motion, TrackState};
use crate::tracker::track_store::TrackStore;

/// Alarm transitions produced by one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmChanges {
    /// Tracks that became `Abandoned` this frame
    pub raised: Vec<TrackId>,
    /// Abandoned tracks that moved and fell back to `Tracked`
    pub cleared: Vec<TrackId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Raised,
    Cleared,
}

#[derive(Debug, Clone, Copy)]
pub struct StationarityClassifier {
    pub alarm_count: u32,
}

impl StationarityClassifier {
    pub fn new(alarm_count: u32) -> Self {
        Self { alarm_count }
    }

    fn classify(&self, track: &mut Track) -> Option<Transition> {
        let mut transition = None;

        match track.motion {
            // The first sighting opens the stationary run.
            Motion::Spawned => track.stationary_run = 1,
            Motion::Still => track.stationary_run = track.stationary_run.saturating_add(1),
            Motion::Moved => {
                track.stationary_run = 0;
                if track.state == TrackState::Abandoned {
                    track.state = TrackState::Tracked;
                    transition = Some(Transition::Cleared);
                }
            }
            // Position is unknown, so the run is neither advanced nor broken.
            Motion::Missed => return None,
        }

        if track.state == TrackState::Tracked && track.stationary_run >= self.alarm_count {
            track.state = TrackState::Abandoned;
            transition = Some(Transition::Raised);
        }

        transition
    }

    /// Update every live track observed this frame.
    pub fn classify_all(&self, store: &mut TrackStore) -> AlarmChanges {
        let mut changes = AlarmChanges::default();

        for track in store.iter_mut() {
            match self.classify(track) {
                Some(Transition::Raised) => {
                    info!(
                        "track {} abandoned at ({:.1}, {:.1}) after {} still frames",
                        track.id, track.centroid.row, track.centroid.col, track.stationary_run
                    );
                    changes.raised.push(track.id);
                }
                Some(Transition::Cleared) => {
                    debug!("track {} moved, abandonment cleared", track.id);
                    changes.cleared.push(track.id);
                }
                None => {}
            }
        }

        changes.raised.sort_unstable();
        changes.cleared.sort_unstable();
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::bbox::BBox;
    use crate::tracker::matching::Blob;

    fn tracked(motion: Motion, run: u32) -> Track {
        let mut track = Track::new(1, &Blob::from_bbox(BBox::new(0.0, 0.0, 10.0, 10.0)), 1);
        track.state = TrackState::Tracked;
        track.motion = motion;
        track.stationary_run = run;
        track
    }

    #[test]
    fn test_spawn_opens_run() {
        let classifier = StationarityClassifier::new(5);
        let mut track = tracked(Motion::Spawned, 0);
        track.state = TrackState::Candidate;
        assert_eq!(classifier.classify(&mut track), None);
        assert_eq!(track.stationary_run, 1);
    }

    #[test]
    fn test_alarm_raised_at_threshold() {
        let classifier = StationarityClassifier::new(5);
        let mut track = tracked(Motion::Still, 3);
        assert_eq!(classifier.classify(&mut track), None);
        assert_eq!(track.state, TrackState::Tracked);

        assert_eq!(classifier.classify(&mut track), Some(Transition::Raised));
        assert_eq!(track.stationary_run, 5);
        assert_eq!(track.state, TrackState::Abandoned);

        // Stays abandoned without re-raising.
        assert_eq!(classifier.classify(&mut track), None);
        assert_eq!(track.state, TrackState::Abandoned);
    }

    #[test]
    fn test_candidate_never_abandoned() {
        let classifier = StationarityClassifier::new(2);
        let mut track = tracked(Motion::Still, 10);
        track.state = TrackState::Candidate;
        assert_eq!(classifier.classify(&mut track), None);
        assert_eq!(track.state, TrackState::Candidate);
        assert_eq!(track.stationary_run, 11);
    }

    #[test]
    fn test_movement_clears_alarm() {
        let classifier = StationarityClassifier::new(2);
        let mut track = tracked(Motion::Moved, 10);
        track.state = TrackState::Abandoned;
        assert_eq!(classifier.classify(&mut track), Some(Transition::Cleared));
        assert_eq!(track.state, TrackState::Tracked);
        assert_eq!(track.stationary_run, 0);
    }

    #[test]
    fn test_miss_leaves_run_untouched() {
        let classifier = StationarityClassifier::new(2);
        let mut track = tracked(Motion::Missed, 7);
        track.state = TrackState::Abandoned;
        assert_eq!(classifier.classify(&mut track), None);
        assert_eq!(track.stationary_run, 7);
        assert_eq!(track.state, TrackState::Abandoned);
    }

    #[test]
    fn test_classify_all_reports_changes() {
        let classifier = StationarityClassifier::new(1);
        let mut store = TrackStore::new(2);
        let id = store
            .allocate(&Blob::from_bbox(BBox::new(0.0, 0.0, 10.0, 10.0)), 1)
            .unwrap();
        store.get_mut(id).unwrap().state = TrackState::Tracked;

        let changes = classifier.classify_all(&mut store);
        assert_eq!(changes.raised, vec![id]);
        assert!(changes.cleared.is_empty());
    }
}
