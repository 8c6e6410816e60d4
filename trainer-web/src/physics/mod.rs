//! Physics module - joint geometry and landmark reliability
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod confidence_gate;

pub use angles::calculate_joint_angle;
pub use confidence_gate::ConfidenceGate;
