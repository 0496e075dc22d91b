//! Pose landmark storage
//!
//! Holds one frame of MediaPipe Pose output and decodes the flat
//! `Float32Array` layout the JS side sends.

use nalgebra::Point2;

use crate::error::RepError;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

pub const RIGHT_SHOULDER: usize = 12;
pub const RIGHT_ELBOW: usize = 14;
pub const RIGHT_WRIST: usize = 16;
pub const RIGHT_HIP: usize = 24;
pub const RIGHT_KNEE: usize = 26;
pub const RIGHT_ANKLE: usize = 28;

/// Flat length for `[x, y, z]` per landmark
pub const FLAT_XYZ_LEN: usize = LANDMARK_COUNT * 3;
/// Flat length for `[x, y, z, visibility]` per landmark
pub const FLAT_XYZV_LEN: usize = LANDMARK_COUNT * 4;

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single landmark point (normalized image coordinates, y grows downward)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized
    pub y: f32,          // 0-1 normalized
    pub z: f32,          // Relative depth, unused by rep detection
    pub visibility: f32, // 0-1, 1.0 when the estimator doesn't report it
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    pub fn point(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Full landmark set for one detected person
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Pose {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Decode the flat array sent from JavaScript
    ///
    /// Accepts 99 values (x, y, z) or 132 values (x, y, z, visibility).
    /// An empty array means the estimator found no pose this frame.
    pub fn from_flat(data: &[f32]) -> Result<Option<Self>, RepError> {
        let stride = match data.len() {
            0 => return Ok(None),
            FLAT_XYZ_LEN => 3,
            FLAT_XYZV_LEN => 4,
            len => return Err(RepError::MalformedFrame { len }),
        };

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (landmark, chunk) in landmarks.iter_mut().zip(data.chunks_exact(stride)) {
            *landmark = Landmark {
                x: chunk[0],
                y: chunk[1],
                z: chunk[2],
                visibility: if stride == 4 { chunk[3] } else { 1.0 },
            };
        }

        Ok(Some(Self { landmarks }))
    }

    /// Get a landmark by index. Panics on an index outside the topology.
    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn point(&self, index: usize) -> Point2<f32> {
        self.landmarks[index].point()
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        self.landmarks[index] = landmark;
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); LANDMARK_COUNT],
        }
    }
}

/// One arrival from the pose estimator
#[derive(Clone, Debug)]
pub struct Frame {
    /// `None` when no person was detected
    pub pose: Option<Pose>,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: f64,
}

impl Frame {
    pub fn new(pose: Option<Pose>, timestamp_ms: f64) -> Self {
        Self { pose, timestamp_ms }
    }

    pub fn empty(timestamp_ms: f64) -> Self {
        Self::new(None, timestamp_ms)
    }
}
