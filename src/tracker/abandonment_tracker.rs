//! Main abandoned-object tracker.

use log::{debug, warn};

use crate::tracker::error::ConfigError;
use crate::tracker::matching::{self, AssignmentResult, AssignmentStrategy, Blob, Tolerance};
use crate::tracker::persistence::PersistenceEvaluator;
use crate::tracker::report::{self, BoxBuffer, FrameReport};
use crate::tracker::stationarity::StationarityClassifier;
use crate::tracker::track::{Track, TrackId};
use crate::tracker::track_store::TrackStore;

/// Configuration for the AbandonmentTracker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Maximum number of simultaneously tracked objects
    pub max_num_obj: usize,
    /// Consecutive still frames required to raise the abandonment alarm
    pub alarm_count: u32,
    /// Consecutive missed frames tolerated before a track is evicted
    pub max_consecutive_miss: u32,
    /// Area change tolerance, in percent of the previous area
    pub area_change_fraction: f32,
    /// Centroid displacement tolerance, in percent of the previous box diagonal
    pub centroid_change_fraction: f32,
    /// Minimum frames-seen / frames-existed ratio for a track to be reported
    pub min_persistence_ratio: f32,
    /// Factor widening the stillness tolerances into the match gate
    pub match_gate_scale: f32,
    pub assignment: AssignmentStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_num_obj: 200,
            alarm_count: 45,
            max_consecutive_miss: 4,
            area_change_fraction: 13.0,
            centroid_change_fraction: 18.0,
            min_persistence_ratio: 0.7,
            match_gate_scale: 2.0,
            assignment: AssignmentStrategy::Greedy,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_num_obj == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.alarm_count == 0 {
            return Err(ConfigError::ZeroAlarmCount);
        }
        for (name, value) in [
            ("area_change_fraction", self.area_change_fraction),
            ("centroid_change_fraction", self.centroid_change_fraction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidFraction { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.min_persistence_ratio) {
            return Err(ConfigError::InvalidPersistenceRatio(
                self.min_persistence_ratio,
            ));
        }
        if !self.match_gate_scale.is_finite() || self.match_gate_scale < 1.0 {
            return Err(ConfigError::InvalidGateScale(self.match_gate_scale));
        }
        Ok(())
    }

    /// Tolerance deciding whether a matched track stood still.
    pub fn stillness(&self) -> Tolerance {
        Tolerance::new(self.area_change_fraction, self.centroid_change_fraction)
    }

    /// Tolerance deciding whether a blob may be matched to a track at all.
    pub fn match_gate(&self) -> Tolerance {
        self.stillness().scaled(self.match_gate_scale)
    }
}

/// Frame-sequential tracker flagging blobs that stay still too long.
///
/// Each call to [`update`](Self::update) consumes one frame of blobs, in
/// capture order, and runs association, eviction and classification as a
/// single step.
#[derive(Debug, Clone)]
pub struct AbandonmentTracker {
    store: TrackStore,
    frame_id: u32,
    config: TrackerConfig,
    evaluator: PersistenceEvaluator,
    classifier: StationarityClassifier,
}

impl AbandonmentTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: TrackStore::new(config.max_num_obj),
            frame_id: 0,
            evaluator: PersistenceEvaluator::new(
                config.max_consecutive_miss,
                config.min_persistence_ratio,
            ),
            classifier: StationarityClassifier::new(config.alarm_count),
            config,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of frames processed in this session.
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.store.get(id)
    }

    /// Live tracks, smallest id first.
    pub fn tracks(&self) -> Vec<&Track> {
        self.store.sorted()
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    /// Boxes of reportable abandoned tracks.
    pub fn abandoned_boxes(&self) -> BoxBuffer {
        report::abandoned_boxes(&self.store)
    }

    /// Boxes of all reportable tracks.
    pub fn all_tracked_boxes(&self) -> BoxBuffer {
        report::all_tracked_boxes(&self.store)
    }

    /// Discard the session: all tracks, the id counter and the frame counter.
    pub fn reset(&mut self) {
        self.store.clear();
        self.frame_id = 0;
    }

    /// Process the first `count` blobs of `blobs` as one frame.
    pub fn update_with_count(&mut self, blobs: &[Blob], count: usize) -> FrameReport {
        if count > blobs.len() {
            warn!(
                "frame {}: blob count {} exceeds the {} blobs supplied",
                self.frame_id + 1,
                count,
                blobs.len()
            );
        }
        self.update(&blobs[..count.min(blobs.len())])
    }

    /// Process one frame of blobs.
    pub fn update(&mut self, blobs: &[Blob]) -> FrameReport {
        self.frame_id += 1;
        let frame_id = self.frame_id;

        // Step 1: Discard malformed blobs
        let detections: Vec<Blob> = blobs.iter().filter(|b| b.is_valid()).copied().collect();
        let mut dropped = blobs.len() - detections.len();
        if dropped > 0 {
            warn!("frame {frame_id}: dropped {dropped} blobs with invalid geometry");
        }

        // Step 2: Associate against a snapshot of the live tracks
        let track_ids = self.store.ids_ascending();
        let track_geometry: Vec<Blob> = self
            .store
            .sorted()
            .into_iter()
            .map(Track::geometry)
            .collect();
        let dists =
            matching::gated_distance(&track_geometry, &detections, &self.config.match_gate());

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = self.config.assignment.assign(&dists);

        // Step 3: Apply the association
        let stillness = self.config.stillness();
        for (itrack, idet) in matches {
            if let Some(track) = self.store.get_mut(track_ids[itrack]) {
                track.observe(&detections[idet], &stillness, frame_id);
            }
        }
        for itrack in unmatched_tracks {
            if let Some(track) = self.store.get_mut(track_ids[itrack]) {
                track.mark_missed();
            }
        }

        // Step 4: Spawn candidates for unmatched detections
        for idet in unmatched_detections {
            match self.store.allocate(&detections[idet], frame_id) {
                Ok(id) => debug!("frame {frame_id}: new track {id}"),
                Err(err) => {
                    debug!("frame {frame_id}: detection {idet} dropped: {err}");
                    dropped += 1;
                }
            }
        }

        // Step 5: Evict stale tracks and gate the rest
        let removed: Vec<TrackId> = self
            .evaluator
            .evaluate(&mut self.store)
            .into_iter()
            .map(|t| t.id)
            .collect();

        // Step 6: Stillness and alarms
        let changes = self.classifier.classify_all(&mut self.store);

        let abandoned_boxes = self.abandoned_boxes();
        debug!(
            "frame {}: {} live tracks, {} abandoned",
            frame_id,
            self.store.len(),
            abandoned_boxes.count()
        );

        FrameReport {
            frame_id,
            abandoned_boxes,
            raised: changes.raised,
            cleared: changes.cleared,
            removed,
            dropped_detections: dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::bbox::{BBox, Centroid};
    use crate::tracker::track_state::TrackState;

    fn blob(area: f32, row: f32, col: f32) -> Blob {
        Blob::new(
            area,
            Centroid::new(row, col),
            BBox::from_center(Centroid::new(row, col), 40.0, 30.0),
        )
    }

    fn config() -> TrackerConfig {
        TrackerConfig {
            max_num_obj: 4,
            alarm_count: 3,
            max_consecutive_miss: 2,
            area_change_fraction: 15.0,
            centroid_change_fraction: 20.0,
            min_persistence_ratio: 0.7,
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(TrackerConfig::default().validate().is_ok());

        let bad = TrackerConfig {
            max_num_obj: 0,
            ..config()
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroCapacity));

        let bad = TrackerConfig {
            area_change_fraction: -1.0,
            ..config()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidFraction {
                name: "area_change_fraction",
                ..
            })
        ));

        let bad = TrackerConfig {
            min_persistence_ratio: 1.5,
            ..config()
        };
        assert!(AbandonmentTracker::new(bad).is_err());

        let bad = TrackerConfig {
            match_gate_scale: 0.5,
            ..config()
        };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidGateScale(0.5)));
    }

    #[test]
    fn test_empty_frame_misses_every_track() {
        let mut tracker = AbandonmentTracker::new(config()).unwrap();
        tracker.update(&[blob(500.0, 100.0, 100.0), blob(500.0, 300.0, 300.0)]);

        let report = tracker.update(&[]);
        assert_eq!(report.frame_id, 2);
        assert_eq!(tracker.tracks().len(), 2);
        for track in tracker.tracks() {
            assert_eq!(track.consecutive_misses, 1);
            assert_eq!((track.frames_seen, track.frames_existed), (1, 2));
        }
    }

    #[test]
    fn test_capacity_exceeded_drops_extra_blobs() {
        let mut tracker = AbandonmentTracker::new(TrackerConfig {
            max_num_obj: 2,
            ..config()
        })
        .unwrap();

        let blobs = [
            blob(500.0, 100.0, 100.0),
            blob(500.0, 300.0, 300.0),
            blob(500.0, 500.0, 500.0),
        ];
        let report = tracker.update(&blobs);
        assert_eq!(report.dropped_detections, 1);
        assert_eq!(tracker.tracks().len(), 2);
        // The earliest detections win the free slots.
        assert_eq!(tracker.tracks()[1].centroid, Centroid::new(300.0, 300.0));

        let report = tracker.update(&blobs);
        assert_eq!(report.dropped_detections, 1);
        assert!(tracker.tracks().iter().all(|t| t.consecutive_misses == 0));
    }

    #[test]
    fn test_invalid_blobs_are_dropped() {
        let mut tracker = AbandonmentTracker::new(config()).unwrap();
        let report = tracker.update(&[blob(f32::NAN, 1.0, 1.0), blob(500.0, 100.0, 100.0)]);
        assert_eq!(report.dropped_detections, 1);
        assert_eq!(tracker.tracks().len(), 1);
    }

    #[test]
    fn test_count_is_clamped() {
        let mut tracker = AbandonmentTracker::new(config()).unwrap();
        let blobs = [blob(500.0, 100.0, 100.0), blob(500.0, 300.0, 300.0)];

        tracker.update_with_count(&blobs, 1);
        assert_eq!(tracker.tracks().len(), 1);

        tracker.update_with_count(&blobs, 10);
        assert_eq!(tracker.tracks().len(), 2);
    }

    #[test]
    fn test_nearest_blob_wins() {
        let mut tracker = AbandonmentTracker::new(config()).unwrap();
        tracker.update(&[blob(500.0, 100.0, 100.0)]);

        // Both inside the gate; the closer one keeps the track.
        tracker.update(&[blob(500.0, 108.0, 100.0), blob(500.0, 102.0, 100.0)]);
        let tracks = tracker.tracks();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[0].centroid, Centroid::new(102.0, 100.0));
        assert_eq!(tracks[1].centroid, Centroid::new(108.0, 100.0));
        assert_eq!(tracks[1].state, TrackState::Tracked);
    }

    #[test]
    fn test_equidistant_blobs_go_to_lowest_index() {
        let mut tracker = AbandonmentTracker::new(config()).unwrap();
        tracker.update(&[blob(500.0, 100.0, 100.0)]);

        tracker.update(&[blob(500.0, 104.0, 100.0), blob(500.0, 96.0, 100.0)]);
        assert_eq!(
            tracker.track(1).map(|t| t.centroid),
            Some(Centroid::new(104.0, 100.0))
        );
    }

    #[test]
    fn test_reset_restarts_session() {
        let mut tracker = AbandonmentTracker::new(config()).unwrap();
        tracker.update(&[blob(500.0, 100.0, 100.0)]);
        tracker.update(&[blob(500.0, 100.0, 100.0)]);

        tracker.reset();
        assert_eq!(tracker.frame_id(), 0);
        assert!(tracker.tracks().is_empty());

        tracker.update(&[blob(500.0, 100.0, 100.0)]);
        assert_eq!(tracker.tracks()[0].id, 1);
    }

    #[test]
    fn test_optimal_assignment_keeps_both_tracks() {
        let mut tracker = AbandonmentTracker::new(TrackerConfig {
            assignment: AssignmentStrategy::Optimal,
            ..config()
        })
        .unwrap();
        tracker.update(&[blob(500.0, 100.0, 100.0), blob(500.0, 100.0, 112.0)]);

        // Greedy pairs track 1 with the blob at col 104 (total 22); the
        // optimal assignment crosses over (total 14).
        tracker.update(&[blob(500.0, 100.0, 104.0), blob(500.0, 100.0, 94.0)]);
        assert_eq!(tracker.tracks().len(), 2);
        assert_eq!(
            tracker.track(1).map(|t| t.centroid),
            Some(Centroid::new(100.0, 94.0))
        );
        assert_eq!(
            tracker.track(2).map(|t| t.centroid),
            Some(Centroid::new(100.0, 104.0))
        );
    }
}
