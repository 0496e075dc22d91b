//! Geometry module - landmarks and joint math
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod landmarks;

pub use angles::{angle, body_line_deviation, clamp, distance};
pub use landmarks::{
    Frame, Landmark, Pose,
    LANDMARK_COUNT, FLAT_XYZ_LEN, FLAT_XYZV_LEN,
    RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE,
};
