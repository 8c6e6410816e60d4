//! Joint angle calculation using dot product
//!
//! Calculates the angle at a vertex joint using the rays
//! vertex→a and vertex→c (e.g. elbow→shoulder and elbow→wrist).

use crate::error::AngleError;

/// Rays shorter than this are treated as coincident points
const MIN_RAY_LENGTH: f32 = 0.0001;

/// Calculate the angle at `vertex` in degrees, within 0°-180°
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// - 180° = straight line through the vertex (locked-out joint)
/// - 90° = right angle
/// - 0° = fully folded
pub fn calculate_joint_angle(
    a: (f32, f32, f32),
    vertex: (f32, f32, f32),
    c: (f32, f32, f32),
) -> Result<f32, AngleError> {
    // Vector from vertex to a
    let v1 = (a.0 - vertex.0, a.1 - vertex.1, a.2 - vertex.2);

    // Vector from vertex to c
    let v2 = (c.0 - vertex.0, c.1 - vertex.1, c.2 - vertex.2);

    let dot = v1.0 * v2.0 + v1.1 * v2.1 + v1.2 * v2.2;

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1 + v1.2 * v1.2).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1 + v2.2 * v2.2).sqrt();

    // NaN magnitudes fail this comparison too
    if !(mag1 >= MIN_RAY_LENGTH && mag2 >= MIN_RAY_LENGTH) || !dot.is_finite() {
        return Err(AngleError::UndefinedAngle);
    }

    // Float overshoot can push the ratio just past ±1
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);

    Ok(cos_angle.acos().to_degrees().clamp(0.0, 180.0))
}
