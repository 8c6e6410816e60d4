//! Repetition counter with debounce
//!
//! Counts only `down → up` transitions, and only when more than the
//! debounce interval has passed since the previous counted rep. This
//! suppresses double counts from phase flicker that survived hysteresis.

use serde::Serialize;

use crate::exercise::Phase;

/// Counter state, owned exclusively by `RepCounter`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepCounterState {
    pub phase: Phase,
    pub rep_count_this_set: u32,
    pub total_reps: u32,
    /// Starts at 1
    pub set_count: u32,
    /// Last counted rep, or the first frame seen until a rep is counted
    pub last_rep_timestamp: Option<f64>,
    /// Seconds; 0.0 until the first set has two reps
    pub average_rep_duration: f64,
}

impl Default for RepCounterState {
    fn default() -> Self {
        Self {
            phase: Phase::Ready,
            rep_count_this_set: 0,
            total_reps: 0,
            set_count: 1,
            last_rep_timestamp: None,
            average_rep_duration: 0.0,
        }
    }
}

/// Phase-transition counter, independent of the active exercise
#[derive(Debug, Clone)]
pub struct RepCounter {
    state: RepCounterState,
    /// Minimum seconds between counted reps
    debounce_secs: f64,
}

impl RepCounter {
    pub fn new(debounce_secs: f64) -> Self {
        Self {
            state: RepCounterState::default(),
            debounce_secs,
        }
    }

    pub fn state(&self) -> &RepCounterState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn set_debounce(&mut self, debounce_secs: f64) {
        self.debounce_secs = debounce_secs;
    }

    /// Fold one frame's phase in. Returns true if a rep was counted.
    pub fn observe(&mut self, phase: Phase, timestamp: f64) -> bool {
        // Timer starts with the first frame of the session
        let anchor = *self.state.last_rep_timestamp.get_or_insert(timestamp);

        let previous = self.state.phase;
        let next = match (previous, phase) {
            // A rep needs the full down→up arc
            (Phase::Ready, Phase::Up) => Phase::Ready,
            // Ready is only re-entered through reset()
            (_, Phase::Ready) => previous,
            (_, next) => next,
        };
        self.state.phase = next;

        if previous != Phase::Down || next != Phase::Up {
            return false;
        }

        let elapsed = timestamp - anchor;
        if !(elapsed > self.debounce_secs) {
            log::trace!("rep suppressed: {:.2}s since last rep", elapsed);
            return false;
        }

        self.state.rep_count_this_set += 1;
        self.state.total_reps += 1;

        // Moving average with factor 0.5, skipped for a set's first rep
        if self.state.rep_count_this_set > 1 {
            self.state.average_rep_duration = (self.state.average_rep_duration + elapsed) / 2.0;
        }
        self.state.last_rep_timestamp = Some(timestamp);

        log::debug!(
            "rep {} of set {} ({} total, avg {:.1}s)",
            self.state.rep_count_this_set,
            self.state.set_count,
            self.state.total_reps,
            self.state.average_rep_duration
        );
        true
    }

    /// Start a new set, keeping totals and pace
    pub fn complete_set(&mut self) {
        self.state.set_count += 1;
        self.state.rep_count_this_set = 0;
        self.state.phase = Phase::Ready;
    }

    /// Back to a fresh session
    pub fn reset(&mut self) {
        self.state = RepCounterState::default();
    }

    /// Return to ready without touching counts (exercise switch)
    pub fn rearm(&mut self) {
        self.state.phase = Phase::Ready;
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
