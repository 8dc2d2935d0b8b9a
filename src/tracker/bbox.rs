/// Axis-aligned bounding box in image coordinates.
///
/// Boxes are stored the way blob analysis reports them:
/// - TLHW: top row, left column, height, width
///
/// Conversions to and from corner pairs and center/size boxes are provided
/// for callers whose segmentation stage uses another convention.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    /// Top row
    pub top: f32,
    /// Left column
    pub left: f32,
    /// Height in rows
    pub height: f32,
    /// Width in columns
    pub width: f32,
}

impl BBox {
    /// Create a new BBox from top, left, height and width (TLHW format).
    #[inline]
    pub fn new(top: f32, left: f32, height: f32, width: f32) -> Self {
        Self {
            top,
            left,
            height,
            width,
        }
    }

    /// Create a BBox from its top-left and bottom-right corners.
    #[inline]
    pub fn from_corners(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            height: bottom - top,
            width: right - left,
        }
    }

    /// Create a BBox from its center point and size.
    #[inline]
    pub fn from_center(center: Centroid, height: f32, width: f32) -> Self {
        Self {
            top: center.row - height / 2.0,
            left: center.col - width / 2.0,
            height,
            width,
        }
    }

    /// Convert to TLHW format: (top, left, height, width).
    #[inline]
    pub fn to_tlhw(&self) -> [f32; 4] {
        [self.top, self.left, self.height, self.width]
    }

    /// Convert to corner format: (top, left, bottom, right).
    #[inline]
    pub fn to_corners(&self) -> [f32; 4] {
        [
            self.top,
            self.left,
            self.top + self.height,
            self.left + self.width,
        ]
    }

    #[inline]
    pub fn center(&self) -> Centroid {
        Centroid::new(self.top + self.height / 2.0, self.left + self.width / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Length of the box diagonal. Centroid tolerances are expressed as a
    /// fraction of this length.
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.height.is_finite()
            && self.width.is_finite()
    }
}

/// Blob center of mass as (row, column).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Centroid {
    pub row: f32,
    pub col: f32,
}

impl Centroid {
    #[inline]
    pub fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn to_point(self) -> nalgebra::Point2<f32> {
        nalgebra::Point2::new(self.row, self.col)
    }

    /// Euclidean distance to another centroid.
    #[inline]
    pub fn distance(&self, other: &Centroid) -> f32 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }

    pub fn is_finite(&self) -> bool {
        self.row.is_finite() && self.col.is_finite()
    }
}

impl From<(f32, f32)> for Centroid {
    fn from((row, col): (f32, f32)) -> Self {
        Self::new(row, col)
    }
}
