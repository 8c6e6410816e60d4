//! Pose landmark data model
//!
//! One frame of MediaPipe Pose output: 33 joints, each with a normalized
//! position and a visibility score. Joints the detector lost are reported
//! with near-zero visibility rather than omitted.

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

// ============================================================================
// LANDMARK DATA STRUCTURES
// ============================================================================

/// A single 3D landmark point (normalized coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized
    pub y: f32,          // 0-1 normalized
    pub z: f32,          // Relative depth
    pub visibility: f32, // 0-1 detector confidence
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn position(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// All 33 joints of one detection
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarks {
    points: [Landmark; POSE_LANDMARK_COUNT],
}

impl PoseLandmarks {
    pub fn new(points: [Landmark; POSE_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Get a joint by MediaPipe index. Out-of-range ids read as invisible.
    pub fn get(&self, joint: usize) -> Landmark {
        self.points.get(joint).copied().unwrap_or_default()
    }

    /// Overwrite a joint, ignoring out-of-range ids
    pub fn set(&mut self, joint: usize, landmark: Landmark) {
        if let Some(slot) = self.points.get_mut(joint) {
            *slot = landmark;
        }
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.points
    }
}

impl Default for PoseLandmarks {
    fn default() -> Self {
        Self::new([Landmark::default(); POSE_LANDMARK_COUNT])
    }
}

/// One detector output with its capture time
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub landmarks: PoseLandmarks,
    /// Capture time in seconds
    pub timestamp: f64,
}

impl Frame {
    pub fn new(landmarks: PoseLandmarks, timestamp: f64) -> Self {
        Self { landmarks, timestamp }
    }
}
