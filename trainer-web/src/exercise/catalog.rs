//! Built-in exercise catalog
//!
//! Eight profiles, all measured on the left side of the body (the side a
//! camera placed to the user's left sees best). Thresholds are in degrees.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::{
    Cycle, ExerciseProfile, IdealRange, JointTriple, MeasuredAngle, PhaseThresholds,
};
use crate::error::ConfigError;
use crate::pose::*;

/// Externally selected exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseId {
    #[serde(rename = "pushup")]
    PushUp,
    #[serde(rename = "squat")]
    Squat,
    #[serde(rename = "curl")]
    Curl,
    #[serde(rename = "plank")]
    Plank,
    #[serde(rename = "pullup")]
    PullUp,
    #[serde(rename = "lunge")]
    Lunge,
    #[serde(rename = "press")]
    Press,
    #[serde(rename = "row")]
    Row,
}

impl ExerciseId {
    pub const ALL: [ExerciseId; 8] = [
        ExerciseId::PushUp,
        ExerciseId::Squat,
        ExerciseId::Curl,
        ExerciseId::Plank,
        ExerciseId::PullUp,
        ExerciseId::Lunge,
        ExerciseId::Press,
        ExerciseId::Row,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseId::PushUp => "pushup",
            ExerciseId::Squat => "squat",
            ExerciseId::Curl => "curl",
            ExerciseId::Plank => "plank",
            ExerciseId::PullUp => "pullup",
            ExerciseId::Lunge => "lunge",
            ExerciseId::Press => "press",
            ExerciseId::Row => "row",
        }
    }

    fn index(&self) -> usize {
        match self {
            ExerciseId::PushUp => 0,
            ExerciseId::Squat => 1,
            ExerciseId::Curl => 2,
            ExerciseId::Plank => 3,
            ExerciseId::PullUp => 4,
            ExerciseId::Lunge => 5,
            ExerciseId::Press => 6,
            ExerciseId::Row => 7,
        }
    }
}

impl FromStr for ExerciseId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownExercise(s.to_string()))
    }
}

impl std::fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BUILT-IN PROFILES
// ============================================================================

const LEFT_ELBOW_ANGLE: JointTriple = JointTriple::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST);
const LEFT_KNEE_ANGLE: JointTriple = JointTriple::new(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE);
const LEFT_BODY_LINE: JointTriple = JointTriple::new(LEFT_SHOULDER, LEFT_HIP, LEFT_ANKLE);
const LEFT_HIP_ANGLE: JointTriple = JointTriple::new(LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE);

fn push_up() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::PushUp,
        name: "Push-up".to_string(),
        cycle: Cycle::Extension,
        thresholds: PhaseThresholds::new(100.0, 150.0),
        angles: vec![
            MeasuredAngle::new("elbow", LEFT_ELBOW_ANGLE),
            MeasuredAngle::new("body_line", LEFT_BODY_LINE).scored(
                IdealRange::new(160.0, 180.0, 5.0, 2.0).too_low("Keep your back straight"),
            ),
        ],
    }
}

fn squat() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::Squat,
        name: "Squat".to_string(),
        cycle: Cycle::Extension,
        thresholds: PhaseThresholds::new(100.0, 160.0),
        angles: vec![
            MeasuredAngle::new("knee", LEFT_KNEE_ANGLE),
            MeasuredAngle::new("torso", LEFT_HIP_ANGLE).scored(
                IdealRange::new(50.0, 180.0, 5.0, 1.5).too_low("Keep your chest up"),
            ),
        ],
    }
}

fn curl() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::Curl,
        name: "Bicep Curl".to_string(),
        cycle: Cycle::Flexion,
        thresholds: PhaseThresholds::new(150.0, 50.0),
        angles: vec![
            MeasuredAngle::new("elbow", LEFT_ELBOW_ANGLE),
            MeasuredAngle::new("upper_arm", JointTriple::new(LEFT_HIP, LEFT_SHOULDER, LEFT_ELBOW))
                .scored(
                    IdealRange::new(0.0, 25.0, 5.0, 1.5)
                        .too_high("Keep your elbows close to your body"),
                ),
        ],
    }
}

fn plank() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::Plank,
        name: "Plank".to_string(),
        cycle: Cycle::Isometric,
        // Body roughly horizontal and straight enough to count as holding
        thresholds: PhaseThresholds::new(140.0, 180.0),
        angles: vec![MeasuredAngle::new("body_line", LEFT_BODY_LINE).scored(
            IdealRange::new(165.0, 180.0, 5.0, 2.5).too_low("Keep your body in a straight line"),
        )],
    }
}

fn pull_up() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::PullUp,
        name: "Pull-up".to_string(),
        cycle: Cycle::Flexion,
        thresholds: PhaseThresholds::new(150.0, 70.0),
        angles: vec![
            MeasuredAngle::new("elbow", LEFT_ELBOW_ANGLE),
            MeasuredAngle::new("hip", LEFT_HIP_ANGLE).scored(
                IdealRange::new(150.0, 180.0, 10.0, 1.0).too_low("Avoid swinging your legs"),
            ),
        ],
    }
}

fn lunge() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::Lunge,
        name: "Lunge".to_string(),
        cycle: Cycle::Extension,
        thresholds: PhaseThresholds::new(100.0, 160.0),
        angles: vec![
            MeasuredAngle::new("front_knee", LEFT_KNEE_ANGLE),
            // Same joints as the phase angle, judged for depth
            MeasuredAngle::new("knee_depth", LEFT_KNEE_ANGLE).scored(
                IdealRange::new(75.0, 180.0, 5.0, 1.0)
                    .too_low("Don't drop your front knee too far"),
            ),
            MeasuredAngle::new("neck_line", JointTriple::new(LEFT_EAR, LEFT_SHOULDER, LEFT_HIP))
                .scored(
                    IdealRange::new(150.0, 180.0, 10.0, 1.0).too_low("Keep your torso upright"),
                ),
        ],
    }
}

fn press() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::Press,
        name: "Overhead Press".to_string(),
        cycle: Cycle::Extension,
        thresholds: PhaseThresholds::new(90.0, 160.0),
        angles: vec![
            MeasuredAngle::new("elbow", LEFT_ELBOW_ANGLE),
            MeasuredAngle::new("torso", LEFT_HIP_ANGLE).scored(
                IdealRange::new(165.0, 180.0, 5.0, 2.0).too_low("Don't arch your lower back"),
            ),
        ],
    }
}

fn row() -> ExerciseProfile {
    ExerciseProfile {
        id: ExerciseId::Row,
        name: "Bent-over Row".to_string(),
        cycle: Cycle::Flexion,
        thresholds: PhaseThresholds::new(150.0, 90.0),
        angles: vec![
            MeasuredAngle::new("elbow", LEFT_ELBOW_ANGLE),
            MeasuredAngle::new("hinge", LEFT_HIP_ANGLE).scored(
                IdealRange::new(70.0, 130.0, 10.0, 1.0)
                    .too_low("Don't bend over too far")
                    .too_high("Hinge forward at the hips"),
            ),
        ],
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Entry for the exercise picker
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseSummary {
    pub id: &'static str,
    pub name: String,
}

#[derive(Deserialize)]
struct ProfileOverrides {
    #[serde(default)]
    profile: Vec<ExerciseProfile>,
}

/// All profiles, one per `ExerciseId`, in `ExerciseId::ALL` order
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: Vec<ExerciseProfile>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                push_up(),
                squat(),
                curl(),
                plank(),
                pull_up(),
                lunge(),
                press(),
                row(),
            ],
        }
    }

    /// Built-ins with `[[profile]]` tables from TOML replacing their entries
    pub fn with_overrides_toml(
        content: &str,
        hysteresis_margin: f32,
    ) -> Result<Self, ConfigError> {
        let overrides: ProfileOverrides = toml::from_str(content)?;
        let mut catalog = Self::builtin();
        for profile in overrides.profile {
            catalog.replace(profile, hysteresis_margin)?;
        }
        Ok(catalog)
    }

    pub fn get(&self, id: ExerciseId) -> &ExerciseProfile {
        &self.profiles[id.index()]
    }

    /// Look up by external string id
    pub fn lookup(&self, id: &str) -> Result<&ExerciseProfile, ConfigError> {
        let id: ExerciseId = id.parse()?;
        Ok(self.get(id))
    }

    /// Swap in a tuned profile; invalid profiles leave the catalog unchanged
    pub fn replace(
        &mut self,
        profile: ExerciseProfile,
        hysteresis_margin: f32,
    ) -> Result<(), ConfigError> {
        profile.validate(hysteresis_margin)?;
        let index = profile.id.index();
        self.profiles[index] = profile;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseProfile> {
        self.profiles.iter()
    }

    pub fn summaries(&self) -> Vec<ExerciseSummary> {
        self.profiles
            .iter()
            .map(|profile| ExerciseSummary {
                id: profile.id.as_str(),
                name: profile.name.clone(),
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
