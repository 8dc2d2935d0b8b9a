//! Single tracked object.

use crate::tracker::bbox::{BBox, Centroid};
use crate::tracker::matching::{Blob, Tolerance};
use crate::tracker::track_state::{Motion, TrackState};

/// Stable track identifier, unique within a tracking session.
pub type TrackId = u64;

/// Single tracked object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,
    /// Current track state
    pub state: TrackState,
    /// Last known blob area
    pub area: f32,
    /// Last known centroid
    pub centroid: Centroid,
    /// Last known bounding box
    pub bbox: BBox,
    /// Frames in which the track was matched, including the spawning frame
    pub frames_seen: u32,
    /// Frames since the track was spawned, including the spawning frame
    pub frames_existed: u32,
    /// Consecutive frames without a matching blob
    pub consecutive_misses: u32,
    /// Consecutive matched frames within the stillness tolerance
    pub stationary_run: u32,
    /// Whether the track passed the persistence gate this frame
    pub reportable: bool,
    /// What the latest frame did to the track
    pub motion: Motion,
    /// Frame ID when the track was spawned
    pub start_frame: u32,
    /// Frame ID of the latest match
    pub last_seen_frame: u32,
}

impl Track {
    /// Create a new candidate track from an unmatched blob.
    pub fn new(id: TrackId, blob: &Blob, frame_id: u32) -> Self {
        Self {
            id,
            state: TrackState::Candidate,
            area: blob.area,
            centroid: blob.centroid,
            bbox: blob.bbox,
            frames_seen: 1,
            frames_existed: 1,
            consecutive_misses: 0,
            stationary_run: 0,
            reportable: false,
            motion: Motion::Spawned,
            start_frame: frame_id,
            last_seen_frame: frame_id,
        }
    }

    /// Last observed geometry.
    pub fn geometry(&self) -> Blob {
        Blob::new(self.area, self.centroid, self.bbox)
    }

    /// Fraction of the track's lifetime in which it was matched.
    pub fn persistence_ratio(&self) -> f32 {
        if self.frames_existed == 0 {
            return 0.0;
        }
        self.frames_seen as f32 / self.frames_existed as f32
    }

    pub fn is_live(&self) -> bool {
        self.state != TrackState::Removed
    }

    pub fn is_abandoned(&self) -> bool {
        self.state == TrackState::Abandoned
    }

    /// Apply a matched blob. `stillness` decides whether this frame counts
    /// as stationary relative to the previous geometry.
    pub fn observe(&mut self, blob: &Blob, stillness: &Tolerance, frame_id: u32) {
        self.motion = if stillness.admits(&self.geometry(), blob) {
            Motion::Still
        } else {
            Motion::Moved
        };

        self.area = blob.area;
        self.centroid = blob.centroid;
        self.bbox = blob.bbox;
        self.frames_seen = self.frames_seen.saturating_add(1);
        self.frames_existed = self.frames_existed.saturating_add(1);
        self.consecutive_misses = 0;
        self.last_seen_frame = frame_id;
    }

    /// Record a frame without a matching blob. Geometry is retained.
    pub fn mark_missed(&mut self) {
        self.motion = Motion::Missed;
        self.consecutive_misses = self.consecutive_misses.saturating_add(1);
        self.frames_existed = self.frames_existed.saturating_add(1);
    }

    pub fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
        self.reportable = false;
    }
}
