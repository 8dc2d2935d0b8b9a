//! Abandoned-object detection for fixed-camera video.
//!
//! Blob measurements from an upstream segmentation stage are tracked across
//! frames. Tracks that stay still for long enough are reported as abandoned,
//! together with their bounding boxes for overlay drawing.

pub mod integration;
pub mod tracker;

pub use integration::{AbandonmentPipeline, BlobBuilder, BlobSource, IntoBlobs};
pub use tracker::{
    AbandonmentTracker, AssignmentStrategy, BBox, Blob, BoxBuffer, Centroid, ConfigError,
    FrameReport, Track, TrackId, TrackState, TrackerConfig,
};
