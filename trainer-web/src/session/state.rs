//! Session snapshot and its shared read handle

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::exercise::{ExerciseId, Phase, MAX_FORM_SCORE};

/// Shown while there is no form feedback to give
pub const IDLE_FEEDBACK: &str = "Ready to start!";

/// Everything a display needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub exercise: ExerciseId,
    pub exercise_name: String,
    pub rep_count_this_set: u32,
    pub set_count: u32,
    pub total_reps: u32,
    pub form_score: u8,
    pub feedback: String,
    /// Seconds
    pub average_rep_duration: f64,
    pub phase: Phase,
}

impl SessionState {
    pub fn new(exercise: ExerciseId, exercise_name: &str) -> Self {
        Self {
            exercise,
            exercise_name: exercise_name.to_string(),
            rep_count_this_set: 0,
            set_count: 1,
            total_reps: 0,
            form_score: MAX_FORM_SCORE,
            feedback: String::new(),
            average_rep_duration: 0.0,
            phase: Phase::Ready,
        }
    }

    pub fn display_feedback(&self) -> &str {
        if self.feedback.is_empty() {
            IDLE_FEEDBACK
        } else {
            &self.feedback
        }
    }
}

/// Single-writer, many-reader view of the latest snapshot.
///
/// The writer swaps whole snapshots under the lock so a reader sees either
/// the previous frame or the next one, never a mix.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<SessionState>>,
}

impl SharedSession {
    pub fn new(initial: SessionState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub(crate) fn publish(&self, state: &SessionState) {
        self.inner.write().clone_from(state);
    }

    pub fn read(&self) -> SessionState {
        self.inner.read().clone()
    }

    pub fn rep_count_this_set(&self) -> u32 {
        self.inner.read().rep_count_this_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_feedback_placeholder() {
        let mut state = SessionState::new(ExerciseId::Squat, "Squat");
        assert_eq!(state.display_feedback(), "Ready to start!");
        state.feedback = "Keep your chest up".to_string();
        assert_eq!(state.display_feedback(), "Keep your chest up");
    }

    #[test]
    fn test_initial_values() {
        let state = SessionState::new(ExerciseId::PushUp, "Push-up");
        assert_eq!(state.set_count, 1);
        assert_eq!(state.form_score, 100);
        assert_eq!(state.phase, Phase::Ready);
    }

    #[test]
    fn test_shared_session_sees_published_snapshot() {
        let shared = SharedSession::new(SessionState::new(ExerciseId::Curl, "Bicep Curl"));
        let reader = shared.clone();

        let mut next = shared.read();
        next.rep_count_this_set = 4;
        next.total_reps = 4;
        shared.publish(&next);

        assert_eq!(reader.rep_count_this_set(), 4);
        assert_eq!(reader.read(), next);
    }

    #[test]
    fn test_serializes_lowercase_ids() {
        let state = SessionState::new(ExerciseId::PullUp, "Pull-up");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["exercise"], "pullup");
        assert_eq!(json["phase"], "ready");
        assert_eq!(json["set_count"], 1);
    }
}
