//! Trait for the segmentation stage that feeds the tracker.

use crate::tracker::{BBox, Blob};

/// Trait for foreground segmentation and blob analysis backends.
///
/// Implement this trait to connect background subtraction, morphology and
/// connected-component analysis to the tracker.
///
/// # Example
///
/// ```ignore
/// use abandoned_rs::{BlobSource, Blob};
///
/// struct BackgroundDiff {
///     // Reference frame, thresholds, ...
/// }
///
/// impl BlobSource for BackgroundDiff {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &[u8], width: u32, height: u32) -> Result<Vec<Blob>, Self::Error> {
///         // Segment the frame and measure the blobs
///         Ok(vec![])
///     }
/// }
/// ```
pub trait BlobSource {
    /// Error type for segmentation failures.
    type Error;

    /// Segment one frame and return its blobs.
    ///
    /// # Arguments
    /// * `frame` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Blob>, Self::Error>;
}

/// Helper trait for converting segmentation-specific outputs to `Blob`s.
pub trait IntoBlobs {
    /// Convert the output into a vector of blobs.
    fn into_blobs(self) -> Vec<Blob>;
}

impl IntoBlobs for Vec<Blob> {
    fn into_blobs(self) -> Vec<Blob> {
        self
    }
}

/// Parallel area / centroid / box arrays, as emitted by blob analysis.
impl IntoBlobs for (Vec<f32>, Vec<(f32, f32)>, Vec<[f32; 4]>) {
    fn into_blobs(self) -> Vec<Blob> {
        let (areas, centroids, boxes) = self;
        areas
            .into_iter()
            .zip(centroids)
            .zip(boxes)
            .map(|((area, centroid), [top, left, height, width])| {
                Blob::new(area, centroid.into(), BBox::new(top, left, height, width))
            })
            .collect()
    }
}
