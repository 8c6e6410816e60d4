//! JS-facing workout tracker
//!
//! JavaScript owns one `WorkoutTracker` per camera session, pushes each
//! MediaPipe result into it and reads the display fields back.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::landmarks::decode_landmarks;
use crate::config::TrainerConfig;
use crate::exercise::{Catalog, ExerciseId};
use crate::pose::Frame;
use crate::session::WorkoutSession;

#[wasm_bindgen]
pub struct WorkoutTracker {
    session: WorkoutSession,
}

#[wasm_bindgen]
impl WorkoutTracker {
    /// Tracker with default settings for `exercise` ("pushup", "squat", ...)
    #[wasm_bindgen(constructor)]
    pub fn new(exercise: &str) -> Result<WorkoutTracker, JsError> {
        let exercise: ExerciseId = exercise.parse()?;
        let session = WorkoutSession::new(exercise, TrainerConfig::default())?;
        Ok(Self { session })
    }

    /// Tracker configured from a TOML document (see `TrainerConfig`)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(exercise: &str, config_toml: &str) -> Result<WorkoutTracker, JsError> {
        let exercise: ExerciseId = exercise.parse()?;
        let config = TrainerConfig::from_toml_str(config_toml)?;
        let session = WorkoutSession::new(exercise, config)?;
        Ok(Self { session })
    }

    /// Feed one detection captured at `timestamp_ms` (performance or epoch
    /// milliseconds, as long as they are monotonic). Returns the rep count
    /// for the current set.
    pub fn update_landmarks(&mut self, data: &[f32], timestamp_ms: f64) -> u32 {
        let frame = decode_landmarks(data)
            .map(|landmarks| Frame::new(landmarks, timestamp_ms / 1000.0));
        self.session.process_frame(frame.as_ref()).rep_count_this_set
    }

    /// Same as `update_landmarks`, stamped with the current wall clock
    pub fn update_landmarks_now(&mut self, data: &[f32]) -> u32 {
        self.update_landmarks(data, js_sys::Date::now())
    }

    /// Detector produced nothing this frame
    pub fn frame_missed(&mut self) {
        self.session.process_frame(None);
    }

    pub fn select_exercise(&mut self, id: &str) -> Result<(), JsError> {
        self.session.select_exercise(id)?;
        Ok(())
    }

    pub fn set_confidence_threshold(&mut self, threshold: f32) -> Result<(), JsError> {
        self.session.set_confidence_threshold(threshold)?;
        Ok(())
    }

    pub fn set_feedback_sensitivity(&mut self, sensitivity: f32) -> Result<(), JsError> {
        self.session.set_feedback_sensitivity(sensitivity)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn complete_set(&mut self) {
        self.session.complete_set();
    }

    #[wasm_bindgen(getter)]
    pub fn rep_count(&self) -> u32 {
        self.session.state().rep_count_this_set
    }

    #[wasm_bindgen(getter)]
    pub fn set_count(&self) -> u32 {
        self.session.state().set_count
    }

    #[wasm_bindgen(getter)]
    pub fn total_reps(&self) -> u32 {
        self.session.state().total_reps
    }

    #[wasm_bindgen(getter)]
    pub fn form_score(&self) -> u8 {
        self.session.state().form_score
    }

    /// Feedback line for display ("Ready to start!" when there is none)
    #[wasm_bindgen(getter)]
    pub fn feedback(&self) -> String {
        self.session.state().display_feedback().to_string()
    }

    /// Seconds
    #[wasm_bindgen(getter)]
    pub fn average_rep_duration(&self) -> f64 {
        self.session.state().average_rep_duration
    }

    /// "ready", "down" or "up"
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.session.state().phase.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn exercise(&self) -> String {
        self.session.state().exercise.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn exercise_name(&self) -> String {
        self.session.state().exercise_name.clone()
    }

    /// Whole session state as one JSON object
    pub fn snapshot_json(&self) -> String {
        to_json(self.session.state())
    }
}

/// `[{ "id": "pushup", "name": "Push-up" }, ...]` for the exercise picker
#[wasm_bindgen]
pub fn exercise_catalog_json() -> String {
    to_json(&Catalog::builtin().summaries())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::warn!("failed to serialize for JS: {}", err);
        "{}".to_string()
    })
}
