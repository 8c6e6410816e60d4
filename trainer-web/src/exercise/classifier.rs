//! Per-frame exercise classification
//!
//! One algorithm for every exercise, parameterized by `ExerciseProfile`:
//! gate on visibility, measure angles, step the phase with hysteresis,
//! score deviations from ideal ranges, pick the worst deviation's message.

use serde::Serialize;

use super::phase::Phase;
use super::profile::ExerciseProfile;
use crate::config::{check_unit, TrainerConfig, DEFAULT_FEEDBACK_SENSITIVITY};
use crate::error::{AngleError, ConfigError};
use crate::physics::{calculate_joint_angle, ConfidenceGate};
use crate::pose::PoseLandmarks;

/// Feedback shown while required joints are occluded
pub const LOW_VISIBILITY_FEEDBACK: &str = "Pose not fully visible";

pub const MAX_FORM_SCORE: u8 = 100;

/// Whether a result reflects this frame or carries the previous one forward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameQuality {
    Reliable,
    LowConfidence,
}

/// Output of one `classify` call
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub phase: Phase,
    /// 0-100
    pub form_score: u8,
    /// Empty when every angle is within tolerance
    pub feedback: String,
    pub quality: FrameQuality,
}

impl ClassificationResult {
    /// Value before any frame has been classified
    pub fn initial() -> Self {
        Self {
            phase: Phase::Ready,
            form_score: MAX_FORM_SCORE,
            feedback: String::new(),
            quality: FrameQuality::Reliable,
        }
    }

    fn low_confidence(previous_phase: Phase, previous_score: u8) -> Self {
        Self {
            phase: previous_phase,
            form_score: previous_score.min(MAX_FORM_SCORE),
            feedback: LOW_VISIBILITY_FEEDBACK.to_string(),
            quality: FrameQuality::LowConfidence,
        }
    }
}

/// Classifier bound to one validated profile
#[derive(Debug, Clone)]
pub struct ExerciseClassifier {
    profile: ExerciseProfile,
    gate: ConfidenceGate,
    required_joints: Vec<usize>,
    penalty_scale: f32,
    /// Last good angle per measured angle, substituted for degenerate geometry
    last_valid: Vec<Option<f32>>,
}

impl ExerciseClassifier {
    /// Fails if the profile is malformed under this config's margin
    pub fn new(profile: ExerciseProfile, config: &TrainerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        profile.validate(config.hysteresis_margin)?;

        let required_joints = profile.required_joints();
        let last_valid = vec![None; profile.angles.len()];

        Ok(Self {
            gate: ConfidenceGate::new(config.confidence_threshold),
            penalty_scale: config.penalty_scale(),
            required_joints,
            last_valid,
            profile,
        })
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    /// Rejects values outside 0-1 (NaN included) and keeps the old threshold
    pub fn set_confidence_threshold(&mut self, threshold: f32) -> Result<(), ConfigError> {
        check_unit("confidence_threshold", threshold)?;
        self.gate.set_threshold(threshold);
        Ok(())
    }

    pub fn set_feedback_sensitivity(&mut self, sensitivity: f32) -> Result<(), ConfigError> {
        check_unit("feedback_sensitivity", sensitivity)?;
        self.penalty_scale = sensitivity / DEFAULT_FEEDBACK_SENSITIVITY;
        Ok(())
    }

    /// Forget substituted angles (new set, new session)
    pub fn clear_angle_cache(&mut self) {
        self.last_valid.iter_mut().for_each(|angle| *angle = None);
    }

    /// Classify one frame against the caller-held previous phase and score
    pub fn classify(
        &mut self,
        landmarks: &PoseLandmarks,
        previous_phase: Phase,
        previous_score: u8,
    ) -> ClassificationResult {
        // 1. Visibility gate
        if let Some(joint) = self
            .gate
            .first_occluded(landmarks, self.required_joints.iter().copied())
        {
            log::trace!("{}: joint {} below visibility threshold", self.profile.id, joint);
            return ClassificationResult::low_confidence(previous_phase, previous_score);
        }

        // 2. Angles, reusing the last valid one for degenerate geometry
        let mut angles = Vec::with_capacity(self.profile.angles.len());
        for (i, measured) in self.profile.angles.iter().enumerate() {
            let triple = measured.joints;
            let angle = match calculate_joint_angle(
                landmarks.get(triple.a).position(),
                landmarks.get(triple.vertex).position(),
                landmarks.get(triple.c).position(),
            ) {
                Ok(angle) => {
                    self.last_valid[i] = Some(angle);
                    angle
                }
                Err(AngleError::UndefinedAngle) => match self.last_valid[i] {
                    Some(angle) => angle,
                    None => {
                        log::trace!(
                            "{}: '{}' undefined with no prior angle",
                            self.profile.id,
                            measured.label
                        );
                        return ClassificationResult::low_confidence(previous_phase, previous_score);
                    }
                },
            };
            angles.push(angle);
        }

        // 3. Phase with hysteresis on the primary angle
        let phase = self.profile.next_phase(angles[0], previous_phase);

        // 4. Score and feedback
        let (form_score, feedback) = self.score(&angles);

        ClassificationResult {
            phase,
            form_score,
            feedback,
            quality: FrameQuality::Reliable,
        }
    }

    /// Score from 100 down by weighted deviation; message of the worst offender
    fn score(&self, angles: &[f32]) -> (u8, String) {
        let mut total_penalty = 0.0f32;
        let mut worst: Option<(f32, &str)> = None;

        for (measured, &angle) in self.profile.angles.iter().zip(angles) {
            let Some(ideal) = &measured.ideal else {
                continue;
            };
            let deviation = ideal.deviation(angle);
            let penalty = deviation.abs() * ideal.weight * self.penalty_scale;
            total_penalty += penalty;

            if deviation.abs() > ideal.tolerance {
                let message = ideal.message_for(deviation);
                if !message.is_empty() && worst.map_or(true, |(p, _)| penalty > p) {
                    worst = Some((penalty, message));
                }
            }
        }

        let score = (f32::from(MAX_FORM_SCORE) - total_penalty)
            .round()
            .clamp(0.0, f32::from(MAX_FORM_SCORE)) as u8;
        let feedback = worst.map(|(_, message)| message.to_string()).unwrap_or_default();

        (score, feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::catalog::{Catalog, ExerciseId};
    use crate::pose::*;
    use proptest::prelude::*;

    /// Place a joint `angle_deg` away from the ray vertex→a, in the x/y plane
    fn ray_end(vertex: (f32, f32), a: (f32, f32), angle_deg: f32) -> (f32, f32) {
        let base = (a.1 - vertex.1).atan2(a.0 - vertex.0);
        let theta = base + angle_deg.to_radians();
        (vertex.0 + 0.2 * theta.cos(), vertex.1 + 0.2 * theta.sin())
    }

    fn visible(p: (f32, f32)) -> Landmark {
        Landmark::new(p.0, p.1, 0.0, 0.99)
    }

    /// Side-view push-up pose with the given elbow and body-line angles
    fn pushup_pose(elbow_deg: f32, body_deg: f32) -> PoseLandmarks {
        let mut pose = PoseLandmarks::default();
        let hip = (0.5, 0.5);
        let shoulder = (0.3, 0.5);
        let ankle = ray_end(hip, shoulder, body_deg);
        let elbow = (0.3, 0.65);
        let wrist = ray_end(elbow, shoulder, elbow_deg);
        pose.set(LEFT_SHOULDER, visible(shoulder));
        pose.set(LEFT_HIP, visible(hip));
        pose.set(LEFT_ANKLE, visible(ankle));
        pose.set(LEFT_ELBOW, visible(elbow));
        pose.set(LEFT_WRIST, visible(wrist));
        pose
    }

    fn classifier(id: ExerciseId) -> ExerciseClassifier {
        let profile = Catalog::builtin().get(id).clone();
        ExerciseClassifier::new(profile, &TrainerConfig::default()).unwrap()
    }

    #[test]
    fn test_pushup_phases() {
        let mut c = classifier(ExerciseId::PushUp);
        let down = c.classify(&pushup_pose(90.0, 175.0), Phase::Ready, 100);
        assert_eq!(down.phase, Phase::Down);
        assert_eq!(down.quality, FrameQuality::Reliable);

        let up = c.classify(&pushup_pose(170.0, 175.0), Phase::Down, down.form_score);
        assert_eq!(up.phase, Phase::Up);

        let dead_zone = c.classify(&pushup_pose(125.0, 175.0), Phase::Up, up.form_score);
        assert_eq!(dead_zone.phase, Phase::Up);
    }

    #[test]
    fn test_good_form_scores_full() {
        let mut c = classifier(ExerciseId::PushUp);
        let result = c.classify(&pushup_pose(90.0, 175.0), Phase::Ready, 100);
        assert_eq!(result.form_score, 100);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_sagging_back_penalized() {
        let mut c = classifier(ExerciseId::PushUp);
        // 20° below the ideal range at weight 2.0
        let result = c.classify(&pushup_pose(90.0, 140.0), Phase::Ready, 100);
        assert!((59..=61).contains(&result.form_score), "score {}", result.form_score);
        assert_eq!(result.feedback, "Keep your back straight");
    }

    #[test]
    fn test_within_tolerance_no_feedback() {
        let mut c = classifier(ExerciseId::PushUp);
        let result = c.classify(&pushup_pose(90.0, 157.0), Phase::Ready, 100);
        assert!(result.form_score < 100);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_sensitivity_scales_penalty() {
        let mut lenient = classifier(ExerciseId::PushUp);
        lenient.set_feedback_sensitivity(0.25).unwrap();
        let mut strict = classifier(ExerciseId::PushUp);
        strict.set_feedback_sensitivity(1.0).unwrap();

        let pose = pushup_pose(90.0, 150.0);
        let lenient_score = lenient.classify(&pose, Phase::Ready, 100).form_score;
        let strict_score = strict.classify(&pose, Phase::Ready, 100).form_score;
        assert!(strict_score < lenient_score);
        assert!((89..=91).contains(&lenient_score));
        assert!((59..=61).contains(&strict_score));
    }

    #[test]
    fn test_setters_reject_out_of_range() {
        let mut c = classifier(ExerciseId::PushUp);
        assert!(c.set_feedback_sensitivity(f32::NAN).is_err());
        assert!(c.set_feedback_sensitivity(1.5).is_err());
        assert!(c.set_confidence_threshold(f32::NAN).is_err());
        assert!(c.set_confidence_threshold(-0.2).is_err());

        // Previous values stay in force
        let result = c.classify(&pushup_pose(90.0, 140.0), Phase::Ready, 100);
        assert!((59..=61).contains(&result.form_score), "score {}", result.form_score);
    }

    /// Side-view lunge: upright torso, front knee bent to `knee_deg`.
    /// Only left-side joints are visible.
    fn lunge_pose(knee_deg: f32) -> PoseLandmarks {
        let mut pose = PoseLandmarks::default();
        let knee = (0.7, 0.5);
        let shin = (180.0 - knee_deg).to_radians();
        pose.set(LEFT_EAR, visible((0.5, 0.2)));
        pose.set(LEFT_SHOULDER, visible((0.5, 0.3)));
        pose.set(LEFT_HIP, visible((0.5, 0.5)));
        pose.set(LEFT_KNEE, visible(knee));
        pose.set(
            LEFT_ANKLE,
            visible((knee.0 + 0.2 * shin.cos(), knee.1 + 0.2 * shin.sin())),
        );
        pose
    }

    #[test]
    fn test_lunge_phases_from_left_side() {
        let mut c = classifier(ExerciseId::Lunge);

        let down = c.classify(&lunge_pose(90.0), Phase::Ready, 100);
        assert_eq!(down.quality, FrameQuality::Reliable);
        assert_eq!(down.phase, Phase::Down);
        assert_eq!(down.form_score, 100);
        assert!(down.feedback.is_empty());

        let up = c.classify(&lunge_pose(170.0), Phase::Down, down.form_score);
        assert_eq!(up.phase, Phase::Up);
        assert_eq!(up.form_score, 100);
    }

    #[test]
    fn test_lunge_too_deep() {
        let mut c = classifier(ExerciseId::Lunge);
        // 15° below the depth range at weight 1.0
        let result = c.classify(&lunge_pose(60.0), Phase::Ready, 100);
        assert_eq!(result.phase, Phase::Down);
        assert!((84..=86).contains(&result.form_score), "score {}", result.form_score);
        assert_eq!(result.feedback, "Don't drop your front knee too far");
    }

    #[test]
    fn test_low_confidence_freezes_state() {
        let mut c = classifier(ExerciseId::PushUp);
        let mut pose = pushup_pose(90.0, 175.0);
        let elbow = pose.get(LEFT_ELBOW);
        pose.set(LEFT_ELBOW, Landmark { visibility: 0.05, ..elbow });

        let result = c.classify(&pose, Phase::Up, 72);
        assert_eq!(result.phase, Phase::Up);
        assert_eq!(result.form_score, 72);
        assert_eq!(result.feedback, LOW_VISIBILITY_FEEDBACK);
        assert_eq!(result.quality, FrameQuality::LowConfidence);
    }

    #[test]
    fn test_degenerate_angle_reuses_last_valid() {
        let mut c = classifier(ExerciseId::PushUp);
        let first = c.classify(&pushup_pose(90.0, 175.0), Phase::Ready, 100);
        assert_eq!(first.phase, Phase::Down);

        // Wrist collapses onto the elbow: elbow angle undefined
        let mut pose = pushup_pose(170.0, 175.0);
        let elbow = pose.get(LEFT_ELBOW);
        pose.set(LEFT_WRIST, elbow);
        let result = c.classify(&pose, Phase::Down, 100);
        assert_eq!(result.quality, FrameQuality::Reliable);
        assert_eq!(result.phase, Phase::Down);
    }

    #[test]
    fn test_degenerate_without_history_is_low_confidence() {
        let mut c = classifier(ExerciseId::PushUp);
        let mut pose = pushup_pose(90.0, 175.0);
        let elbow = pose.get(LEFT_ELBOW);
        pose.set(LEFT_WRIST, elbow);
        let result = c.classify(&pose, Phase::Ready, 100);
        assert_eq!(result.quality, FrameQuality::LowConfidence);
        assert_eq!(result.phase, Phase::Ready);

        c.classify(&pushup_pose(90.0, 175.0), Phase::Ready, 100);
        c.clear_angle_cache();
        assert_eq!(
            c.classify(&pose, Phase::Down, 100).quality,
            FrameQuality::LowConfidence
        );
    }

    #[test]
    fn test_plank_only_holds() {
        let mut c = classifier(ExerciseId::Plank);
        let straight = c.classify(&pushup_pose(170.0, 178.0), Phase::Ready, 100);
        assert_eq!(straight.phase, Phase::Down);
        assert_eq!(straight.form_score, 100);

        let sagging = c.classify(&pushup_pose(170.0, 150.0), Phase::Down, 100);
        assert_eq!(sagging.phase, Phase::Down);
        assert!(sagging.form_score < 100);
        assert_eq!(sagging.feedback, "Keep your body in a straight line");
    }

    #[test]
    fn test_rejects_invalid_profile() {
        let mut profile = Catalog::builtin().get(ExerciseId::PushUp).clone();
        profile.thresholds.up = profile.thresholds.down;
        assert!(matches!(
            ExerciseClassifier::new(profile, &TrainerConfig::default()),
            Err(ConfigError::InvalidProfile { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_score_bounded(
            elbow in 0.0f32..180.0,
            body in 0.0f32..180.0,
            sensitivity in 0.0f32..=1.0,
        ) {
            let mut c = classifier(ExerciseId::PushUp);
            c.set_feedback_sensitivity(sensitivity).unwrap();
            let result = c.classify(&pushup_pose(elbow, body), Phase::Ready, 100);
            prop_assert!(result.form_score <= 100);
        }

        #[test]
        fn prop_dead_zone_never_flips(
            angles in proptest::collection::vec(101.0f32..149.0, 1..40),
            start_up in any::<bool>(),
        ) {
            let mut c = classifier(ExerciseId::PushUp);
            let start = if start_up { Phase::Up } else { Phase::Down };
            let mut phase = start;
            for angle in angles {
                phase = c.classify(&pushup_pose(angle, 175.0), phase, 100).phase;
                prop_assert_eq!(phase, start);
            }
        }
    }
}
