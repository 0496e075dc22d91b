//! Synthetic pose builders for tests

use crate::geometry::{
    Frame, Landmark, Pose,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Thigh and shin length used by the squat builder
const LEG_SEGMENT: f32 = 0.2;
/// Upper arm and forearm length used by the push-up builder
const ARM_SEGMENT: f32 = 0.15;

/// Side-on squatter with the given knee angle and hip height
///
/// Shin hangs straight down from the knee. The thigh is rotated away from
/// the shin by `knee_angle`, so angles under 90° put the hip below the knee.
pub fn squat_pose(knee_angle: f32, hip_y: f32) -> Pose {
    let theta = knee_angle.to_radians();
    let knee = Landmark::new(0.5, hip_y - LEG_SEGMENT * theta.cos());
    let hip = Landmark::new(0.5 + LEG_SEGMENT * theta.sin(), hip_y);
    let ankle = Landmark::new(0.5, knee.y + LEG_SEGMENT);

    let mut pose = Pose::default();
    pose.set(RIGHT_HIP, hip);
    pose.set(RIGHT_KNEE, knee);
    pose.set(RIGHT_ANKLE, ankle);
    pose
}

/// Side-on push-up with the given elbow angle and shoulder height
///
/// `sag` lowers the hip below the shoulder-ankle line to break the plank.
pub fn push_up_pose(elbow_angle: f32, shoulder_y: f32, sag: f32) -> Pose {
    let theta = elbow_angle.to_radians();
    // Upper arm hangs straight down from the shoulder
    let shoulder = Landmark::new(0.3, shoulder_y);
    let elbow = Landmark::new(0.3, shoulder_y + ARM_SEGMENT);
    let wrist = Landmark::new(
        elbow.x + ARM_SEGMENT * theta.sin(),
        elbow.y - ARM_SEGMENT * theta.cos(),
    );

    let mut pose = Pose::default();
    pose.set(RIGHT_SHOULDER, shoulder);
    pose.set(RIGHT_ELBOW, elbow);
    pose.set(RIGHT_WRIST, wrist);
    pose.set(RIGHT_HIP, Landmark::new(0.6, shoulder_y + sag));
    pose.set(RIGHT_ANKLE, Landmark::new(0.9, shoulder_y));
    pose
}

pub fn squat_frame(knee_angle: f32, hip_y: f32, timestamp_ms: f64) -> Frame {
    Frame::new(Some(squat_pose(knee_angle, hip_y)), timestamp_ms)
}

pub fn push_up_frame(elbow_angle: f32, shoulder_y: f32, timestamp_ms: f64) -> Frame {
    Frame::new(Some(push_up_pose(elbow_angle, shoulder_y, 0.0)), timestamp_ms)
}
