//! Fixed-capacity arena of tracks.

use std::collections::HashMap;

use crate::tracker::error::StoreError;
use crate::tracker::matching::Blob;
use crate::tracker::track::{Track, TrackId};

/// Fixed-capacity arena of live tracks with free-slot recycling.
///
/// Slot indices are an internal detail; tracks are addressed by id. Ids come
/// from a per-store counter and are never handed out twice in one session.
#[derive(Debug, Clone)]
pub struct TrackStore {
    slots: Vec<Option<Track>>,
    free_slots: Vec<usize>,
    index: HashMap<TrackId, usize>,
    next_id: TrackId,
}

impl TrackStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            // Popped from the back, so slot 0 is used first.
            free_slots: (0..capacity).rev().collect(),
            index: HashMap::with_capacity(capacity),
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.free_slots.is_empty()
    }

    /// Spawn a candidate track for `blob` in a free slot.
    pub fn allocate(&mut self, blob: &Blob, frame_id: u32) -> Result<TrackId, StoreError> {
        let slot = self.free_slots.pop().ok_or(StoreError::CapacityExceeded {
            capacity: self.capacity(),
        })?;

        let id = self.next_id;
        self.next_id += 1;
        self.slots[slot] = Some(Track::new(id, blob, frame_id));
        self.index.insert(id, slot);
        Ok(id)
    }

    /// Evict a track and recycle its slot. Returns the tombstoned track.
    pub fn free(&mut self, id: TrackId) -> Result<Track, StoreError> {
        let slot = self.index.remove(&id).ok_or(StoreError::UnknownTrack(id))?;
        let mut track = self.slots[slot]
            .take()
            .ok_or(StoreError::UnknownTrack(id))?;
        track.mark_removed();
        self.free_slots.push(slot);
        Ok(track)
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].as_ref()
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].as_mut()
    }

    /// Live tracks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Ids of all live tracks, smallest first.
    pub fn ids_ascending(&self) -> Vec<TrackId> {
        let mut ids: Vec<TrackId> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Live tracks sorted by id.
    pub fn sorted(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.iter().collect();
        tracks.sort_unstable_by_key(|t| t.id);
        tracks
    }

    /// Drop every track and restart the id counter.
    pub fn clear(&mut self) {
        *self = Self::new(self.capacity());
    }
}
