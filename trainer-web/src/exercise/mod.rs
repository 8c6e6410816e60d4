//! Exercise module - profiles and per-frame classification
//!
//! Exercises are data (`ExerciseProfile`) consumed by one classifier.

mod catalog;
mod classifier;
mod phase;
mod profile;

pub use catalog::{Catalog, ExerciseId, ExerciseSummary};
pub use classifier::{
    ClassificationResult, ExerciseClassifier, FrameQuality, LOW_VISIBILITY_FEEDBACK, MAX_FORM_SCORE,
};
pub use phase::Phase;
pub use profile::{
    Cycle, ExerciseProfile, IdealRange, JointTriple, MeasuredAngle, PhaseThresholds,
    MAX_MEASURED_ANGLES,
};
