mod abandonment_tracker;
mod bbox;
mod error;
mod matching;
mod persistence;
mod report;
mod stationarity;
mod track;
mod track_state;
mod track_store;

pub use abandonment_tracker::{AbandonmentTracker, TrackerConfig};
pub use bbox::{BBox, Centroid};
pub use error::{ConfigError, StoreError};
pub use matching::{AssignmentStrategy, Blob, Tolerance};
pub use persistence::PersistenceEvaluator;
pub use report::{BoxBuffer, FrameReport};
pub use stationarity::{AlarmChanges, StationarityClassifier};
pub use track::{Track, TrackId};
pub use track_state::{Motion, TrackState};
pub use track_store::TrackStore;
