//! Workout session - the single writer of session state
//!
//! Owns the classifier and rep counter for the selected exercise, folds each
//! frame through them and publishes the resulting snapshot.

use std::sync::atomic::{AtomicBool, Ordering};

use super::rep_counter::RepCounter;
use super::state::{SessionState, SharedSession};
use crate::config::TrainerConfig;
use crate::error::ConfigError;
use crate::exercise::{Catalog, ExerciseClassifier, ExerciseId, FrameQuality, MAX_FORM_SCORE};
use crate::pose::Frame;

pub struct WorkoutSession {
    config: TrainerConfig,
    catalog: Catalog,
    classifier: ExerciseClassifier,
    counter: RepCounter,
    state: SessionState,
    publisher: Option<SharedSession>,
}

impl WorkoutSession {
    /// Session on the built-in catalog
    pub fn new(exercise: ExerciseId, config: TrainerConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(exercise, config, Catalog::builtin())
    }

    pub fn with_catalog(
        exercise: ExerciseId,
        config: TrainerConfig,
        catalog: Catalog,
    ) -> Result<Self, ConfigError> {
        let profile = catalog.get(exercise).clone();
        let state = SessionState::new(exercise, &profile.name);
        let classifier = ExerciseClassifier::new(profile, &config)?;

        log::info!("session started: {} ({})", state.exercise_name, exercise);

        Ok(Self {
            counter: RepCounter::new(config.debounce_secs),
            config,
            catalog,
            classifier,
            state,
            publisher: None,
        })
    }

    /// Mirror every update into `shared`
    pub fn with_publisher(mut self, shared: SharedSession) -> Self {
        shared.publish(&self.state);
        self.publisher = Some(shared);
        self
    }

    /// Read handle on this session, created on first use
    pub fn shared(&mut self) -> SharedSession {
        match &self.publisher {
            Some(shared) => shared.clone(),
            None => {
                let shared = SharedSession::new(self.state.clone());
                self.publisher = Some(shared.clone());
                shared
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fold one frame into the session. `None` means no frame could be
    /// acquired; the session is left exactly as it was.
    pub fn process_frame(&mut self, frame: Option<&Frame>) -> &SessionState {
        let Some(frame) = frame else {
            return &self.state;
        };

        let result = self.classifier.classify(
            &frame.landmarks,
            self.counter.phase(),
            self.state.form_score,
        );
        if result.quality == FrameQuality::LowConfidence {
            log::trace!("low confidence frame at {:.3}s", frame.timestamp);
        }
        self.counter.observe(result.phase, frame.timestamp);

        self.state.form_score = result.form_score;
        self.state.feedback = result.feedback;
        self.sync_counter();
        self.publish();
        &self.state
    }

    /// Process frames until the source ends or `stop` is raised.
    /// Returns the number of frames taken from the source.
    pub fn run<I, F>(&mut self, frames: I, stop: &AtomicBool, mut on_update: F) -> usize
    where
        I: IntoIterator<Item = Option<Frame>>,
        F: FnMut(&SessionState),
    {
        let mut processed = 0;
        for frame in frames {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let state = self.process_frame(frame.as_ref());
            on_update(state);
            processed += 1;
        }
        log::info!(
            "session loop ended after {} frames ({} reps total)",
            processed,
            self.state.total_reps
        );
        processed
    }

    /// Switch exercise, keeping rep and set history. An unknown id or an
    /// invalid profile leaves the session untouched.
    pub fn select_exercise(&mut self, id: &str) -> Result<(), ConfigError> {
        let exercise: ExerciseId = id.parse()?;
        let profile = self.catalog.get(exercise).clone();
        let classifier = ExerciseClassifier::new(profile, &self.config)?;

        self.state.exercise = exercise;
        self.state.exercise_name = classifier.profile().name.clone();
        self.classifier = classifier;
        self.counter.rearm();
        self.state.form_score = MAX_FORM_SCORE;
        self.state.feedback.clear();
        self.sync_counter();
        self.publish();

        log::info!("exercise selected: {}", self.state.exercise_name);
        Ok(())
    }

    pub fn set_confidence_threshold(&mut self, threshold: f32) -> Result<(), ConfigError> {
        self.classifier.set_confidence_threshold(threshold)?;
        self.config.confidence_threshold = threshold;
        log::info!("confidence threshold set to {:.2}", threshold);
        Ok(())
    }

    pub fn set_feedback_sensitivity(&mut self, sensitivity: f32) -> Result<(), ConfigError> {
        self.classifier.set_feedback_sensitivity(sensitivity)?;
        self.config.feedback_sensitivity = sensitivity;
        log::info!("feedback sensitivity set to {:.2}", sensitivity);
        Ok(())
    }

    /// Fresh session on the current exercise
    pub fn reset(&mut self) {
        self.counter.reset();
        self.classifier.clear_angle_cache();
        self.state = SessionState::new(self.state.exercise, &self.classifier.profile().name);
        self.publish();
        log::info!("session reset");
    }

    /// Close the current set and start the next one
    pub fn complete_set(&mut self) {
        let finished = self.state.rep_count_this_set;
        self.counter.complete_set();
        self.sync_counter();
        self.publish();
        log::info!(
            "set complete with {} reps, starting set {}",
            finished,
            self.state.set_count
        );
    }

    fn sync_counter(&mut self) {
        let counter = self.counter.state();
        self.state.phase = counter.phase;
        self.state.rep_count_this_set = counter.rep_count_this_set;
        self.state.total_reps = counter.total_reps;
        self.state.set_count = counter.set_count;
        self.state.average_rep_duration = counter.average_rep_duration;
    }

    fn publish(&self) {
        if let Some(shared) = &self.publisher {
            shared.publish(&self.state);
        }
    }
}
