//! Builder for creating Blob objects from various box conventions.

use crate::tracker::{BBox, Blob, Centroid};

/// Builder for creating `Blob` objects from various input formats.
///
/// Area defaults to the box area and the centroid to the box center, which
/// suits detectors that only report boxes.
#[derive(Debug, Clone, Default)]
pub struct BlobBuilder {
    bbox: BBox,
    area: Option<f32>,
    centroid: Option<Centroid>,
}

impl BlobBuilder {
    /// Create a new blob builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLHW format (top, left, height, width).
    pub fn tlhw(mut self, top: f32, left: f32, height: f32, width: f32) -> Self {
        self.bbox = BBox::new(top, left, height, width);
        self
    }

    /// Set bounding box from its corners (top, left, bottom, right).
    pub fn corners(mut self, top: f32, left: f32, bottom: f32, right: f32) -> Self {
        self.bbox = BBox::from_corners(top, left, bottom, right);
        self
    }

    /// Set bounding box from its center (row, col) and size.
    pub fn center_size(mut self, row: f32, col: f32, height: f32, width: f32) -> Self {
        self.bbox = BBox::from_center(Centroid::new(row, col), height, width);
        self
    }

    /// Set the foreground pixel count.
    pub fn area(mut self, area: f32) -> Self {
        self.area = Some(area);
        self
    }

    /// Set the center of mass (row, col).
    pub fn centroid(mut self, row: f32, col: f32) -> Self {
        self.centroid = Some(Centroid::new(row, col));
        self
    }

    /// Build the final `Blob`.
    pub fn build(self) -> Blob {
        Blob::new(
            self.area.unwrap_or_else(|| self.bbox.area()),
            self.centroid.unwrap_or_else(|| self.bbox.center()),
            self.bbox,
        )
    }
}
