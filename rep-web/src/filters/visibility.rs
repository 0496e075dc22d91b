//! Visibility gate
//!
//! MediaPipe keeps emitting coordinates for joints it can't see, guessed
//! from the rest of the body. When any landmark a profile reads is below
//! the threshold, the frame is treated as having no pose.

use crate::error::{RepError, Result};
use crate::geometry::Pose;

pub struct VisibilityGate {
    /// Minimum visibility to accept a landmark
    threshold: f32,
}

impl VisibilityGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Pass when every listed landmark is visible enough
    pub fn check(&self, pose: &Pose, indices: &[usize]) -> Result<()> {
        let hidden = indices
            .iter()
            .any(|&index| !(pose.get(index).visibility >= self.threshold));

        if hidden {
            Err(RepError::MissingLandmarks)
        } else {
            Ok(())
        }
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(0.5)
    }
}
