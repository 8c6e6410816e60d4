//! Flat landmark buffers from JavaScript
//!
//! MediaPipe results arrive as a `Float32Array`: either 132 values
//! (33 × x, y, z, visibility) or 99 values (33 × x, y, z) when the caller
//! has no visibility scores.

use crate::pose::{Landmark, PoseLandmarks, POSE_LANDMARK_COUNT};

/// Stride with visibility
pub const STRIDE_WITH_VISIBILITY: usize = 4;
/// Stride without visibility
pub const STRIDE_POSITION_ONLY: usize = 3;

/// Decode one frame's landmarks, or `None` for a buffer of the wrong length
pub fn decode_landmarks(data: &[f32]) -> Option<PoseLandmarks> {
    let stride = match data.len() {
        n if n == POSE_LANDMARK_COUNT * STRIDE_WITH_VISIBILITY => STRIDE_WITH_VISIBILITY,
        n if n == POSE_LANDMARK_COUNT * STRIDE_POSITION_ONLY => STRIDE_POSITION_ONLY,
        n => {
            log::warn!(
                "Invalid landmark data length: {} (expected {} or {})",
                n,
                POSE_LANDMARK_COUNT * STRIDE_WITH_VISIBILITY,
                POSE_LANDMARK_COUNT * STRIDE_POSITION_ONLY
            );
            return None;
        }
    };

    let mut landmarks = PoseLandmarks::default();
    for (i, chunk) in data.chunks_exact(stride).enumerate() {
        let visibility = chunk.get(3).copied().unwrap_or(1.0);
        landmarks.set(i, Landmark::new(chunk[0], chunk[1], chunk[2], visibility));
    }
    Some(landmarks)
}
