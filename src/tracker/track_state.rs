/// Track state enumeration for the abandonment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackState {
    /// Newly created track, not yet through the persistence gate
    #[default]
    Candidate,
    /// Persistent object that is not (or no longer) stationary long enough
    Tracked,
    /// Stationary for at least `alarm_count` matched frames
    Abandoned,
    /// Evicted from the store
    Removed,
}

/// What the most recent frame did to a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motion {
    /// Created from an unmatched detection this frame
    #[default]
    Spawned,
    /// Matched a detection within the stillness tolerances
    Still,
    /// Matched a detection outside the stillness tolerances
    Moved,
    /// No detection matched this frame
    Missed,
}

impl Motion {
    /// Whether the track received a detection this frame.
    #[inline]
    pub fn is_observed(self) -> bool {
        !matches!(self, Motion::Missed)
    }
}
