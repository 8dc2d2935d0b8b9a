//! Per-frame outputs handed to the rendering stage.

use crate::tracker::bbox::BBox;
use crate::tracker::track::{Track, TrackId};
use crate::tracker::track_store::TrackStore;

/// Fixed-length box buffer, as consumed by overlay drawing.
///
/// Holds exactly `capacity` boxes: the first `count` are valid, ordered by
/// ascending track id, and the rest are zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxBuffer {
    boxes: Vec<BBox>,
    count: usize,
}

impl BoxBuffer {
    pub fn empty(capacity: usize) -> Self {
        Self {
            boxes: vec![BBox::default(); capacity],
            count: 0,
        }
    }

    /// Fill from tracks already sorted by id. Tracks beyond `capacity` are
    /// ignored, which cannot happen when the buffer matches the store.
    fn from_sorted<'a>(capacity: usize, tracks: impl Iterator<Item = &'a Track>) -> Self {
        let mut buffer = Self::empty(capacity);
        for (slot, track) in buffer.boxes.iter_mut().zip(tracks) {
            *slot = track.bbox;
            buffer.count += 1;
        }
        buffer
    }

    /// Number of valid boxes.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.boxes.len()
    }

    /// The whole buffer, zero-filled past `count`.
    pub fn boxes(&self) -> &[BBox] {
        &self.boxes
    }

    /// Only the valid boxes.
    pub fn valid(&self) -> &[BBox] {
        &self.boxes[..self.count]
    }
}

/// Boxes of reportable abandoned tracks.
pub fn abandoned_boxes(store: &TrackStore) -> BoxBuffer {
    BoxBuffer::from_sorted(
        store.capacity(),
        store
            .sorted()
            .into_iter()
            .filter(|t| t.reportable && t.is_abandoned()),
    )
}

/// Boxes of every reportable track, abandoned or not.
pub fn all_tracked_boxes(store: &TrackStore) -> BoxBuffer {
    BoxBuffer::from_sorted(
        store.capacity(),
        store.sorted().into_iter().filter(|t| t.reportable),
    )
}

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameReport {
    /// 1-based frame counter within the session
    pub frame_id: u32,
    /// Boxes of reportable abandoned tracks
    pub abandoned_boxes: BoxBuffer,
    /// Tracks raised to abandoned this frame
    pub raised: Vec<TrackId>,
    /// Abandoned tracks that moved this frame
    pub cleared: Vec<TrackId>,
    /// Tracks evicted this frame
    pub removed: Vec<TrackId>,
    /// Detections discarded as malformed or for lack of capacity
    pub dropped_detections: usize,
}

impl FrameReport {
    pub fn abandoned_count(&self) -> usize {
        self.abandoned_boxes.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::matching::Blob;
    use crate::tracker::track_state::TrackState;

    #[test]
    fn test_projections_are_sorted_and_zero_filled() {
        let mut store = TrackStore::new(4);
        let boxes = [
            BBox::new(0.0, 0.0, 10.0, 10.0),
            BBox::new(50.0, 50.0, 10.0, 10.0),
            BBox::new(90.0, 90.0, 10.0, 10.0),
        ];
        let ids: Vec<TrackId> = boxes
            .iter()
            .map(|b| store.allocate(&Blob::from_bbox(*b), 1).unwrap())
            .collect();

        for (i, id) in ids.iter().enumerate() {
            let track = store.get_mut(*id).unwrap();
            track.reportable = i != 1;
            track.state = TrackState::Abandoned;
        }

        let abandoned = abandoned_boxes(&store);
        assert_eq!(abandoned.count(), 2);
        assert_eq!(abandoned.capacity(), 4);
        assert_eq!(abandoned.valid(), &[boxes[0], boxes[2]]);
        assert_eq!(abandoned.boxes()[2], BBox::default());
        assert_eq!(abandoned.boxes()[3], BBox::default());

        store.get_mut(ids[2]).unwrap().state = TrackState::Tracked;
        let all = all_tracked_boxes(&store);
        assert_eq!(all.valid(), &[boxes[0], boxes[2]]);
        assert_eq!(abandoned_boxes(&store).valid(), &[boxes[0]]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = BoxBuffer::empty(3);
        assert_eq!(buffer.count(), 0);
        assert!(buffer.valid().is_empty());
        assert_eq!(buffer.boxes().len(), 3);
    }
}
