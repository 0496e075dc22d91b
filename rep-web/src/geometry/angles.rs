//! Joint angle and displacement math
//!
//! Angles come from the law of cosines over the three side lengths of the
//! triangle formed by two limb segments, so they are always the interior
//! angle at the vertex in the range 0°..=180°.

use nalgebra::Point2;

/// Segments shorter than this are treated as collapsed joints
const MIN_SEGMENT: f32 = 1e-4;

/// Euclidean distance between two landmarks
pub fn distance(a: Point2<f32>, b: Point2<f32>) -> f32 {
    nalgebra::distance(&a, &b)
}

/// Angle at vertex `b` formed by `a`-`b`-`c`, in degrees
///
/// Returns `None` when either limb segment has zero length or a coordinate
/// is not finite. Callers skip the frame in that case.
///
/// - 180° = fully straight (knee locked, arm extended)
/// - 90°  = right-angle bend
pub fn angle(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> Option<f32> {
    let ab = distance(a, b);
    let bc = distance(b, c);
    let ac = distance(a, c);

    if !(ab >= MIN_SEGMENT && bc >= MIN_SEGMENT) {
        return None;
    }

    let cos_angle = (ab * ab + bc * bc - ac * ac) / (2.0 * ab * bc);
    if !cos_angle.is_finite() {
        return None;
    }

    // Rounding pushes collinear limbs slightly outside acos' domain
    Some(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Standard range clamp. NaN collapses to `min`.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Vertical sag of the shoulder-hip-ankle line
///
/// Sum of the vertical offsets between consecutive points. Near zero when
/// the body is held as a straight horizontal plank.
pub fn body_line_deviation(shoulder: Point2<f32>, hip: Point2<f32>, ankle: Point2<f32>) -> f32 {
    (shoulder.y - hip.y).abs() + (hip.y - ankle.y).abs()
}
