//! Trainer Web - exercise rep counting and form scoring from pose landmarks
//!
//! Entry point for the WASM module. Only contains:
//! - Module declarations and re-exports
//! - the wasm_bindgen start hook
//!
//! Frames of MediaPipe Pose landmarks flow through the classifier of the
//! selected exercise (phase, form score, feedback) into a debounced rep
//! counter. JavaScript drives it through `WorkoutTracker`; native callers
//! use `WorkoutSession` directly.

mod bridge;
pub mod config;
pub mod error;
pub mod exercise;
mod logging;
pub mod physics;
pub mod pose;
pub mod session;

use wasm_bindgen::prelude::*;

pub use bridge::{decode_landmarks, exercise_catalog_json, WorkoutTracker};
pub use config::TrainerConfig;
pub use error::{AngleError, ConfigError};
pub use exercise::{
    Catalog, ClassificationResult, ExerciseClassifier, ExerciseId, ExerciseProfile, FrameQuality,
    Phase,
};
pub use pose::{Frame, Landmark, PoseLandmarks};
pub use session::{RepCounter, SessionState, SharedSession, WorkoutSession};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
    log::info!("trainer-web {} loaded", env!("CARGO_PKG_VERSION"));
}
