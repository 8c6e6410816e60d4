//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod tracker;

pub use landmarks::decode_landmarks;
pub use tracker::{exercise_catalog_json, WorkoutTracker};
