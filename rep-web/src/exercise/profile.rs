//! Per-exercise detection tables
//!
//! Every exercise is described as data: which three landmarks form the
//! tracked joint, which landmark anchors the displacement baseline, the
//! angle/displacement thresholds for each phase, posture gates, and the
//! quality score model. `ExerciseSession` runs the same algorithm over
//! any profile.

use crate::geometry::{
    body_line_deviation, Pose,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

use super::kind::ExerciseKind;
use super::quality::{ScoreModel, StabilityTerm};

/// Three landmarks forming the joint whose angle drives the phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointTriple {
    pub proximal: usize,
    pub vertex: usize,
    pub distal: usize,
}

/// Extra posture requirement on top of the angle/displacement test
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PostureGate {
    /// `landmark` must sit lower in the image than `reference`
    Below { landmark: usize, reference: usize },
    /// Shoulder-hip-ankle line must stay within `max_deviation` of flat
    BodyLine {
        shoulder: usize,
        hip: usize,
        ankle: usize,
        max_deviation: f32,
    },
}

impl PostureGate {
    pub fn passes(&self, pose: &Pose) -> bool {
        match *self {
            PostureGate::Below { landmark, reference } => {
                // Image y grows downward
                pose.get(landmark).y > pose.get(reference).y
            }
            PostureGate::BodyLine { shoulder, hip, ankle, max_deviation } => {
                body_line_deviation(pose.point(shoulder), pose.point(hip), pose.point(ankle))
                    < max_deviation
            }
        }
    }

    pub fn landmarks(&self) -> Vec<usize> {
        match *self {
            PostureGate::Below { landmark, reference } => vec![landmark, reference],
            PostureGate::BodyLine { shoulder, hip, ankle, .. } => vec![shoulder, hip, ankle],
        }
    }

    pub fn is_body_line(&self) -> bool {
        matches!(self, PostureGate::BodyLine { .. })
    }
}

/// Fully extended position used to re-anchor the baseline between reps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lockout {
    pub angle_above: f32,
    pub drop_below: f32,
}

/// Thresholds for the simple detector that flips on angle alone
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdBand {
    pub down_below: f32,
    pub up_above: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    pub joint: JointTriple,
    /// Landmark whose y is tracked against the cycle baseline
    pub anchor: usize,

    /// Down: angle below this...
    pub down_angle_below: f32,
    /// ...and anchor dropped more than this below baseline
    pub down_drop_above: f32,
    pub down_gates: Vec<PostureGate>,

    /// Up: angle above this...
    pub up_angle_above: f32,
    /// ...and anchor back within this of baseline
    pub up_drop_below: f32,
    pub up_gates: Vec<PostureGate>,

    pub lockout: Option<Lockout>,
    pub threshold_band: ThresholdBand,
    pub score: ScoreModel,
}

impl ExerciseProfile {
    pub fn for_kind(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Squat => Self::squat(),
            ExerciseKind::PushUp => Self::push_up(),
        }
    }

    pub fn squat() -> Self {
        Self {
            kind: ExerciseKind::Squat,
            joint: JointTriple {
                proximal: RIGHT_HIP,
                vertex: RIGHT_KNEE,
                distal: RIGHT_ANKLE,
            },
            anchor: RIGHT_HIP,
            down_angle_below: 90.0,
            down_drop_above: 0.05,
            down_gates: vec![PostureGate::Below {
                landmark: RIGHT_HIP,
                reference: RIGHT_KNEE,
            }],
            up_angle_above: 170.0,
            up_drop_below: 0.02,
            up_gates: Vec::new(),
            lockout: None,
            threshold_band: ThresholdBand {
                down_below: 90.0,
                up_above: 160.0,
            },
            score: ScoreModel {
                depth_weight: 0.4,
                stability_weight: 0.3,
                speed_weight: 0.3,
                stability: StabilityTerm::HoldStreak { points_per_frame: 8.0 },
                ..ScoreModel::default()
            },
        }
    }

    pub fn push_up() -> Self {
        let body_line = PostureGate::BodyLine {
            shoulder: RIGHT_SHOULDER,
            hip: RIGHT_HIP,
            ankle: RIGHT_ANKLE,
            max_deviation: 0.10,
        };

        Self {
            kind: ExerciseKind::PushUp,
            joint: JointTriple {
                proximal: RIGHT_SHOULDER,
                vertex: RIGHT_ELBOW,
                distal: RIGHT_WRIST,
            },
            anchor: RIGHT_SHOULDER,
            down_angle_below: 80.0,
            down_drop_above: 0.06,
            down_gates: vec![body_line],
            up_angle_above: 170.0,
            up_drop_below: 0.02,
            up_gates: vec![body_line],
            lockout: Some(Lockout {
                angle_above: 175.0,
                drop_below: 0.01,
            }),
            threshold_band: ThresholdBand {
                down_below: 90.0,
                up_above: 160.0,
            },
            score: ScoreModel {
                depth_weight: 0.4,
                stability_weight: 0.4,
                speed_weight: 0.2,
                stability: StabilityTerm::BodyLine,
                ..ScoreModel::default()
            },
        }
    }

    /// Every landmark the profile reads, deduplicated
    pub fn required_landmarks(&self) -> Vec<usize> {
        let mut indices = vec![
            self.joint.proximal,
            self.joint.vertex,
            self.joint.distal,
            self.anchor,
        ];
        for gate in self.down_gates.iter().chain(&self.up_gates) {
            indices.extend(gate.landmarks());
        }
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
