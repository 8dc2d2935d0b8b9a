//! AbandonmentPipeline for combining segmentation with tracking.

use crate::tracker::{AbandonmentTracker, BoxBuffer, ConfigError, FrameReport, TrackerConfig};

use super::BlobSource;

/// Bundles a segmentation stage with the abandonment tracker.
///
/// Frames must be passed in capture order; the tracker's miss counts and
/// stationary runs are defined over consecutive frames.
pub struct AbandonmentPipeline<S: BlobSource> {
    source: S,
    tracker: AbandonmentTracker,
}

impl<S: BlobSource> AbandonmentPipeline<S> {
    /// Create a new pipeline with the given blob source and tracker config.
    pub fn new(source: S, config: TrackerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            tracker: AbandonmentTracker::new(config)?,
        })
    }

    /// Create a new pipeline with the default tracker configuration.
    pub fn with_default_config(source: S) -> Result<Self, ConfigError> {
        Self::new(source, TrackerConfig::default())
    }

    /// Segment a single frame and advance the tracker.
    ///
    /// Only segmentation can fail; tracking always produces a report.
    pub fn process_frame(
        &mut self,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameReport, S::Error> {
        let blobs = self.source.detect(frame, width, height)?;
        Ok(self.tracker.update(&blobs))
    }

    /// Boxes of every reportable object, for the "all objects" view.
    pub fn all_tracked_boxes(&self) -> BoxBuffer {
        self.tracker.all_tracked_boxes()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn tracker(&self) -> &AbandonmentTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut AbandonmentTracker {
        &mut self.tracker
    }
}
