//! Confidence Gate - first check on every frame
//!
//! When any joint an exercise depends on is below the visibility threshold,
//! the frame is not trusted. Occlusion and fast motion make this routine.

use crate::pose::PoseLandmarks;

/// Visibility gate over the joints one exercise requires
#[derive(Debug, Clone)]
pub struct ConfidenceGate {
    /// Minimum visibility to accept raw data
    threshold: f32,
}

impl ConfidenceGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Set confidence threshold
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the first required joint below threshold, if any
    pub fn first_occluded(
        &self,
        landmarks: &PoseLandmarks,
        joints: impl IntoIterator<Item = usize>,
    ) -> Option<usize> {
        // Inverted comparison so NaN visibility counts as occluded
        joints
            .into_iter()
            .find(|&joint| !(landmarks.get(joint).visibility >= self.threshold))
    }

    /// True when every required joint is visible enough
    pub fn passes(
        &self,
        landmarks: &PoseLandmarks,
        joints: impl IntoIterator<Item = usize>,
    ) -> bool {
        self.first_occluded(landmarks, joints).is_none()
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(0.5)
    }
}
