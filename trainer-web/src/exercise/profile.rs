//! Exercise profiles - which angles to measure and how to judge them
//!
//! A profile is pure data. The first measured angle is the primary angle
//! and drives the phase through two thresholds with a dead zone between
//! them. Every angle carrying an `IdealRange` contributes to the score.

use serde::{Deserialize, Serialize};

use super::catalog::ExerciseId;
use super::phase::Phase;
use crate::error::ConfigError;
use crate::pose::POSE_LANDMARK_COUNT;

/// Most angles a single profile may measure
pub const MAX_MEASURED_ANGLES: usize = 3;

/// Angle at `vertex` between the rays to `a` and `c` (MediaPipe indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointTriple {
    pub a: usize,
    pub vertex: usize,
    pub c: usize,
}

impl JointTriple {
    pub const fn new(a: usize, vertex: usize, c: usize) -> Self {
        Self { a, vertex, c }
    }

    pub fn joints(&self) -> [usize; 3] {
        [self.a, self.vertex, self.c]
    }
}

/// How the primary angle maps onto a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    /// Rep finishes with the joint opening (push-up, squat, press).
    /// Down at or below `down`, up at or above `up`.
    Extension,
    /// Rep finishes with the joint closing (curl, pull-up, row).
    /// Down at or above `down`, up at or below `up`.
    Flexion,
    /// Held pose (plank). Down while at or above `down`, never up.
    Isometric,
}

/// Phase thresholds in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    pub down: f32,
    pub up: f32,
}

impl PhaseThresholds {
    pub const fn new(down: f32, up: f32) -> Self {
        Self { down, up }
    }
}

/// Acceptable range for one angle and what to say when it is missed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub min: f32,
    pub max: f32,
    /// Degrees outside the range tolerated before feedback fires
    #[serde(default)]
    pub tolerance: f32,
    /// Penalty points per degree outside the range, at default sensitivity
    pub weight: f32,
    #[serde(default)]
    pub too_low: String,
    #[serde(default)]
    pub too_high: String,
}

impl IdealRange {
    pub fn new(min: f32, max: f32, tolerance: f32, weight: f32) -> Self {
        Self {
            min,
            max,
            tolerance,
            weight,
            too_low: String::new(),
            too_high: String::new(),
        }
    }

    pub fn too_low(mut self, message: &str) -> Self {
        self.too_low = message.to_string();
        self
    }

    pub fn too_high(mut self, message: &str) -> Self {
        self.too_high = message.to_string();
        self
    }

    /// Degrees outside [min, max]; negative below, positive above, 0 inside
    pub fn deviation(&self, angle: f32) -> f32 {
        if angle < self.min {
            angle - self.min
        } else if angle > self.max {
            angle - self.max
        } else {
            0.0
        }
    }

    /// Message for a deviation's side of the range
    pub fn message_for(&self, deviation: f32) -> &str {
        if deviation < 0.0 {
            &self.too_low
        } else {
            &self.too_high
        }
    }
}

/// One angle a profile measures each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredAngle {
    pub label: String,
    pub joints: JointTriple,
    #[serde(default)]
    pub ideal: Option<IdealRange>,
}

impl MeasuredAngle {
    pub fn new(label: &str, joints: JointTriple) -> Self {
        Self {
            label: label.to_string(),
            joints,
            ideal: None,
        }
    }

    pub fn scored(mut self, ideal: IdealRange) -> Self {
        self.ideal = Some(ideal);
        self
    }
}

/// Immutable per-exercise configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProfile {
    pub id: ExerciseId,
    pub name: String,
    pub cycle: Cycle,
    pub thresholds: PhaseThresholds,
    /// Primary angle first
    pub angles: Vec<MeasuredAngle>,
}

impl ExerciseProfile {
    pub fn primary(&self) -> Option<&MeasuredAngle> {
        self.angles.first()
    }

    /// Every joint any measured angle touches, deduplicated in order
    pub fn required_joints(&self) -> Vec<usize> {
        let mut joints = Vec::with_capacity(self.angles.len() * 3);
        for joint in self.angles.iter().flat_map(|angle| angle.joints.joints()) {
            if !joints.contains(&joint) {
                joints.push(joint);
            }
        }
        joints
    }

    /// Hysteresis step: angles in the dead zone keep `previous`
    pub fn next_phase(&self, primary_angle: f32, previous: Phase) -> Phase {
        let PhaseThresholds { down, up } = self.thresholds;
        match self.cycle {
            Cycle::Extension => {
                if primary_angle <= down {
                    Phase::Down
                } else if primary_angle >= up {
                    Phase::Up
                } else {
                    previous
                }
            }
            Cycle::Flexion => {
                if primary_angle >= down {
                    Phase::Down
                } else if primary_angle <= up {
                    Phase::Up
                } else {
                    previous
                }
            }
            Cycle::Isometric => {
                if primary_angle >= down {
                    Phase::Down
                } else {
                    previous
                }
            }
        }
    }

    /// Reject profiles the classifier must not run against
    pub fn validate(&self, hysteresis_margin: f32) -> Result<(), ConfigError> {
        let name = self.id.as_str();

        if self.angles.is_empty() || self.angles.len() > MAX_MEASURED_ANGLES {
            return Err(ConfigError::profile(
                name,
                format!(
                    "expected 1-{} measured angles, got {}",
                    MAX_MEASURED_ANGLES,
                    self.angles.len()
                ),
            ));
        }

        let PhaseThresholds { down, up } = self.thresholds;
        for (label, value) in [("down_threshold", down), ("up_threshold", up)] {
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::profile(
                    name,
                    format!("{} {} is outside 0-180 degrees", label, value),
                ));
            }
        }

        let gap = match self.cycle {
            Cycle::Extension => Some(up - down),
            Cycle::Flexion => Some(down - up),
            Cycle::Isometric => None,
        };
        if let Some(gap) = gap {
            if gap < hysteresis_margin {
                return Err(ConfigError::profile(
                    name,
                    format!(
                        "hysteresis gap {:.1} is below the {:.1} degree margin (down {}, up {})",
                        gap, hysteresis_margin, down, up
                    ),
                ));
            }
        }

        for angle in &self.angles {
            let unknown = angle
                .joints
                .joints()
                .into_iter()
                .find(|&j| j >= POSE_LANDMARK_COUNT);
            if let Some(joint) = unknown {
                return Err(ConfigError::profile(
                    name,
                    format!("angle '{}' references unknown joint {}", angle.label, joint),
                ));
            }
            if let Some(ideal) = &angle.ideal {
                if !(ideal.min <= ideal.max) {
                    return Err(ConfigError::profile(
                        name,
                        format!("angle '{}' has an empty ideal range", angle.label),
                    ));
                }
                if !(ideal.weight >= 0.0 && ideal.tolerance >= 0.0) {
                    return Err(ConfigError::profile(
                        name,
                        format!("angle '{}' has a negative weight or tolerance", angle.label),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{LEFT_ELBOW, LEFT_HIP, LEFT_SHOULDER, LEFT_WRIST};

    fn profile(cycle: Cycle, down: f32, up: f32) -> ExerciseProfile {
        ExerciseProfile {
            id: ExerciseId::PushUp,
            name: "Test".to_string(),
            cycle,
            thresholds: PhaseThresholds::new(down, up),
            angles: vec![MeasuredAngle::new(
                "elbow",
                JointTriple::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            )],
        }
    }

    #[test]
    fn test_extension_hysteresis() {
        let p = profile(Cycle::Extension, 100.0, 150.0);
        assert_eq!(p.next_phase(90.0, Phase::Ready), Phase::Down);
        assert_eq!(p.next_phase(100.0, Phase::Up), Phase::Down);
        assert_eq!(p.next_phase(150.0, Phase::Down), Phase::Up);
        assert_eq!(p.next_phase(125.0, Phase::Down), Phase::Down);
        assert_eq!(p.next_phase(125.0, Phase::Up), Phase::Up);
        assert_eq!(p.next_phase(125.0, Phase::Ready), Phase::Ready);
    }

    #[test]
    fn test_flexion_hysteresis() {
        let p = profile(Cycle::Flexion, 150.0, 60.0);
        assert_eq!(p.next_phase(165.0, Phase::Ready), Phase::Down);
        assert_eq!(p.next_phase(40.0, Phase::Down), Phase::Up);
        assert_eq!(p.next_phase(100.0, Phase::Up), Phase::Up);
    }

    #[test]
    fn test_isometric_never_up() {
        let p = profile(Cycle::Isometric, 150.0, 180.0);
        assert_eq!(p.next_phase(175.0, Phase::Ready), Phase::Down);
        assert_eq!(p.next_phase(120.0, Phase::Down), Phase::Down);
        assert_eq!(p.next_phase(120.0, Phase::Ready), Phase::Ready);
    }

    #[test]
    fn test_validate_rejects_narrow_gap() {
        assert!(profile(Cycle::Extension, 100.0, 150.0).validate(15.0).is_ok());
        assert!(profile(Cycle::Extension, 140.0, 150.0).validate(15.0).is_err());
        assert!(profile(Cycle::Extension, 150.0, 100.0).validate(0.0).is_err());
        assert!(profile(Cycle::Flexion, 150.0, 60.0).validate(15.0).is_ok());
        assert!(profile(Cycle::Flexion, 60.0, 150.0).validate(15.0).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_angles() {
        let mut p = profile(Cycle::Extension, 100.0, 150.0);
        p.angles.clear();
        assert!(p.validate(15.0).is_err());

        let mut p = profile(Cycle::Extension, 100.0, 150.0);
        p.angles[0].joints.c = 40;
        assert!(p.validate(15.0).is_err());

        let mut p = profile(Cycle::Extension, 100.0, 150.0);
        p.angles[0].ideal = Some(IdealRange::new(170.0, 160.0, 0.0, 1.0));
        assert!(p.validate(15.0).is_err());

        let mut p = profile(Cycle::Extension, 100.0, 150.0);
        p.angles = vec![p.angles[0].clone(); 4];
        assert!(p.validate(15.0).is_err());
    }

    #[test]
    fn test_required_joints_deduplicated() {
        let mut p = profile(Cycle::Extension, 100.0, 150.0);
        p.angles.push(MeasuredAngle::new(
            "shoulder",
            JointTriple::new(LEFT_HIP, LEFT_SHOULDER, LEFT_ELBOW),
        ));
        assert_eq!(
            p.required_joints(),
            vec![LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP]
        );
    }

    #[test]
    fn test_ideal_range_deviation() {
        let ideal = IdealRange::new(160.0, 180.0, 5.0, 1.0)
            .too_low("Keep your back straight")
            .too_high("unused");
        assert_eq!(ideal.deviation(170.0), 0.0);
        assert_eq!(ideal.deviation(150.0), -10.0);
        assert_eq!(ideal.message_for(-10.0), "Keep your back straight");
        let narrow = IdealRange::new(0.0, 30.0, 0.0, 1.0);
        assert_eq!(narrow.deviation(45.0), 15.0);
    }
}
