//! Per-frame measurements for one exercise profile

use crate::error::{RepError, Result};
use crate::geometry::{angle, Pose};

use super::profile::ExerciseProfile;

/// Geometry extracted from a single frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMetrics {
    /// Tracked joint angle in degrees
    pub angle: f32,
    /// Anchor landmark height (normalized, grows downward)
    pub anchor_y: f32,
    /// All down-phase posture gates pass
    pub down_gates: bool,
    /// All up-phase posture gates pass
    pub up_gates: bool,
    /// All body-line gates in the profile pass (true when there are none)
    pub straight: bool,
}

impl FrameMetrics {
    pub fn measure(profile: &ExerciseProfile, pose: &Pose) -> Result<Self> {
        let joint = profile.joint;
        let angle = angle(
            pose.point(joint.proximal),
            pose.point(joint.vertex),
            pose.point(joint.distal),
        )
        .ok_or(RepError::DegenerateGeometry { vertex: joint.vertex })?;

        let anchor_y = pose.get(profile.anchor).y;
        if !anchor_y.is_finite() {
            return Err(RepError::DegenerateGeometry { vertex: profile.anchor });
        }

        let straight = profile
            .down_gates
            .iter()
            .chain(&profile.up_gates)
            .filter(|gate| gate.is_body_line())
            .all(|gate| gate.passes(pose));

        Ok(Self {
            angle,
            anchor_y,
            down_gates: profile.down_gates.iter().all(|gate| gate.passes(pose)),
            up_gates: profile.up_gates.iter().all(|gate| gate.passes(pose)),
            straight,
        })
    }
}
