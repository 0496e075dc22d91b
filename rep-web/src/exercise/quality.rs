//! Rep quality scoring
//!
//! Weighted sum of depth, stability and speed terms. Each term is clamped
//! to [60, 100] before weighting, so with weights summing to 1 the result
//! never leaves that band either.

use crate::geometry::clamp;

pub const TERM_FLOOR: f32 = 60.0;
pub const TERM_CEILING: f32 = 100.0;

/// What the stability term rewards
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StabilityTerm {
    /// Frames the bottom position was held, times `points_per_frame`
    HoldStreak { points_per_frame: f32 },
    /// Full marks for a straight body line, floor otherwise
    BodyLine,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreModel {
    pub depth_weight: f32,
    pub stability_weight: f32,
    pub speed_weight: f32,
    /// Displacement at which the depth term reaches zero before clamping
    pub depth_reference: f32,
    /// Points per normalized unit of displacement below `depth_reference`
    pub depth_gain: f32,
    /// Milliseconds per speed point
    pub speed_divisor_ms: f64,
    pub stability: StabilityTerm,
}

impl Default for ScoreModel {
    fn default() -> Self {
        Self {
            depth_weight: 0.4,
            stability_weight: 0.3,
            speed_weight: 0.3,
            depth_reference: 0.12,
            depth_gain: 800.0,
            speed_divisor_ms: 10.0,
            stability: StabilityTerm::HoldStreak { points_per_frame: 8.0 },
        }
    }
}

/// Measurements taken at the moment a rep completes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityInputs {
    /// Anchor displacement from baseline on the completing frame
    pub drop: f32,
    /// Longest run of down-condition frames during the bottom phase
    pub hold_frames: u32,
    /// Body line gate result on the completing frame
    pub straight: bool,
    pub elapsed_ms: f64,
}

/// Individual clamped terms, kept for debugging and the session summary
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityBreakdown {
    pub depth: f32,
    pub stability: f32,
    pub speed: f32,
}

impl ScoreModel {
    pub fn breakdown(&self, inputs: &QualityInputs) -> QualityBreakdown {
        let depth = clamp(
            (self.depth_reference - inputs.drop) * self.depth_gain,
            TERM_FLOOR,
            TERM_CEILING,
        );

        let stability = match self.stability {
            StabilityTerm::HoldStreak { points_per_frame } => clamp(
                inputs.hold_frames as f32 * points_per_frame,
                TERM_FLOOR,
                TERM_CEILING,
            ),
            StabilityTerm::BodyLine => {
                if inputs.straight {
                    TERM_CEILING
                } else {
                    TERM_FLOOR
                }
            }
        };

        let speed = clamp(
            (inputs.elapsed_ms / self.speed_divisor_ms) as f32,
            TERM_FLOOR,
            TERM_CEILING,
        );

        QualityBreakdown { depth, stability, speed }
    }

    /// Rounded weighted score in 0..=100
    pub fn score(&self, inputs: &QualityInputs) -> u8 {
        let terms = self.breakdown(inputs);
        let weighted = terms.depth * self.depth_weight
            + terms.stability * self.stability_weight
            + terms.speed * self.speed_weight;
        clamp(weighted.round(), 0.0, 100.0) as u8
    }
}
