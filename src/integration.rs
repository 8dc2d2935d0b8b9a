//! Integration module for connecting segmentation stages with the tracker.
//!
//! The tracker only consumes blob measurements. This module provides the
//! traits and helpers that let a background-subtraction and blob-analysis
//! stage feed it frame by frame.

mod builder;
mod detector;
mod pipeline;

pub use builder::BlobBuilder;
pub use detector::{BlobSource, IntoBlobs};
pub use pipeline::AbandonmentPipeline;
