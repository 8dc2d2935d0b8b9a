//! Matching utilities for blob tracking.

use ndarray::Array2;

use crate::tracker::bbox::{BBox, Centroid};

/// Cost assigned to track/blob pairs outside the match gate, and to padding
/// cells of the square matrix handed to the linear assignment solver.
pub const GATED_COST: f32 = 1e6;

/// Blob input for the tracker, as produced by blob analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blob {
    /// Foreground pixel count
    pub area: f32,
    /// Center of mass (row, column)
    pub centroid: Centroid,
    /// Bounding box (top, left, height, width)
    pub bbox: BBox,
}

impl Blob {
    pub fn new(area: f32, centroid: Centroid, bbox: BBox) -> Self {
        Self {
            area,
            centroid,
            bbox,
        }
    }

    /// Blob covering its whole bounding box, centered in it.
    pub fn from_bbox(bbox: BBox) -> Self {
        Self {
            area: bbox.area(),
            centroid: bbox.center(),
            bbox,
        }
    }

    /// Finite geometry and a non-negative area.
    pub fn is_valid(&self) -> bool {
        self.area.is_finite()
            && self.area >= 0.0
            && self.centroid.is_finite()
            && self.bbox.is_finite()
    }
}

/// Fractional change tolerances, in percent.
///
/// Area changes are measured against the previous area, centroid
/// displacement against the diagonal of the previous bounding box. Both
/// bounds are inclusive, and a zero reference only admits a zero change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub area_percent: f32,
    pub centroid_percent: f32,
}

impl Tolerance {
    pub fn new(area_percent: f32, centroid_percent: f32) -> Self {
        Self {
            area_percent,
            centroid_percent,
        }
    }

    /// Same tolerance with both bounds multiplied by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            area_percent: self.area_percent * factor,
            centroid_percent: self.centroid_percent * factor,
        }
    }

    #[inline]
    pub fn area_within(&self, previous: f32, current: f32) -> bool {
        (current - previous).abs() <= previous.abs() * self.area_percent / 100.0
    }

    #[inline]
    pub fn centroid_within(
        &self,
        previous: &Centroid,
        reference: &BBox,
        current: &Centroid,
    ) -> bool {
        previous.distance(current) <= reference.diagonal() * self.centroid_percent / 100.0
    }

    /// Whether `current` is within tolerance of the `previous` observation.
    pub fn admits(&self, previous: &Blob, current: &Blob) -> bool {
        self.area_within(previous.area, current.area)
            && self.centroid_within(&previous.centroid, &previous.bbox, &current.centroid)
    }
}

/// Compute the gated centroid-distance matrix between tracks and blobs.
///
/// Rows follow `tracks`, columns follow `blobs`. Pairs that fail `gate`
/// get [`GATED_COST`].
pub fn gated_distance(tracks: &[Blob], blobs: &[Blob], gate: &Tolerance) -> Array2<f32> {
    let mut dists = Array2::from_elem((tracks.len(), blobs.len()), GATED_COST);
    for (i, t) in tracks.iter().enumerate() {
        for (j, b) in blobs.iter().enumerate() {
            if gate.admits(t, b) {
                dists[[i, j]] = t.centroid.distance(&b.centroid);
            }
        }
    }
    dists
}

/// How tracks are assigned to blobs once the cost matrix is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentStrategy {
    /// Rows in order each take their nearest unclaimed column.
    #[default]
    Greedy,
    /// Minimum total distance (Jonker-Volgenant).
    Optimal,
}

impl AssignmentStrategy {
    pub fn assign(self, cost_matrix: &Array2<f32>) -> AssignmentResult {
        match self {
            AssignmentStrategy::Greedy => greedy_assignment(cost_matrix),
            AssignmentStrategy::Optimal => linear_assignment(cost_matrix),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_matched = vec![false; num_rows];
        let mut col_matched = vec![false; num_cols];
        for &(row, col) in &matches {
            row_matched[row] = true;
            col_matched[col] = true;
        }

        Self {
            matches,
            unmatched_tracks: unmatched_indices(&row_matched),
            unmatched_detections: unmatched_indices(&col_matched),
        }
    }
}

fn unmatched_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &matched)| if matched { None } else { Some(i) })
        .collect()
}

/// Greedy nearest-neighbour assignment.
///
/// Rows are visited in index order; each takes the cheapest column not yet
/// claimed, with ties going to the lowest column index.
pub fn greedy_assignment(cost_matrix: &Array2<f32>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();
    let mut claimed = vec![false; num_cols];
    let mut matches = Vec::new();

    for row in 0..num_rows {
        let mut best: Option<(usize, f32)> = None;
        for col in 0..num_cols {
            if claimed[col] {
                continue;
            }
            let cost = cost_matrix[[row, col]];
            if cost >= GATED_COST {
                continue;
            }
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((col, cost));
            }
        }

        if let Some((col, _)) = best {
            claimed[col] = true;
            matches.push((row, col));
        }
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

/// Minimum-cost assignment over the gated matrix.
///
/// Pairs whose cost is [`GATED_COST`] are never reported as matches.
pub fn linear_assignment(cost_matrix: &Array2<f32>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult::from_matches(Vec::new(), num_rows, num_cols);
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), GATED_COST as f64);
    for i in 0..num_rows {
        for j in 0..num_cols {
            padded[[i, j]] = cost_matrix[[i, j]] as f64;
        }
    }

    let mut matches = Vec::new();
    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
                if col_idx < num_cols && cost_matrix[[row_idx, col_idx]] < GATED_COST {
                    matches.push((row_idx, col_idx));
                }
            }
        }
        Err(err) => {
            log::warn!("linear assignment failed ({err:?}), falling back to greedy matching");
            return greedy_assignment(cost_matrix);
        }
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}
