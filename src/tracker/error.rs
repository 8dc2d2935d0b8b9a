//! Error types for the tracker.

use thiserror::Error;

use crate::tracker::track::TrackId;

/// Rejected tracker configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_num_obj must be at least 1")]
    ZeroCapacity,
    #[error("alarm_count must be at least 1")]
    ZeroAlarmCount,
    #[error("{name} must be a finite, non-negative percentage, got {value}")]
    InvalidFraction { name: &'static str, value: f32 },
    #[error("min_persistence_ratio must lie in [0, 1], got {0}")]
    InvalidPersistenceRatio(f32),
    #[error("match_gate_scale must be finite and at least 1, got {0}")]
    InvalidGateScale(f32),
}

/// Track store bookkeeping failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("track store is full ({capacity} live tracks)")]
    CapacityExceeded { capacity: usize },
    #[error("no live track with id {0}")]
    UnknownTrack(TrackId),
}
