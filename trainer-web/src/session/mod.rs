//! Session module - rep counting and the per-frame workout loop
//!
//! Re-exports only. All logic in submodules.

mod rep_counter;
mod state;
mod workout;

pub use rep_counter::{RepCounter, RepCounterState};
pub use state::{SessionState, SharedSession, IDLE_FEEDBACK};
pub use workout::WorkoutSession;
