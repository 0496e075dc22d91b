//! Threshold detector - minimum viable fallback
//!
//! Flips phase the instant the joint angle crosses the band edges. No
//! stability streak, no debounce, no baseline. The gap between the two
//! thresholds is the only hysteresis.

use super::events::Phase;
use super::profile::ThresholdBand;

pub struct ThresholdDetector {
    band: ThresholdBand,
    phase: Phase,
}

impl ThresholdDetector {
    pub fn new(band: ThresholdBand) -> Self {
        Self {
            band,
            phase: Phase::Up,
        }
    }

    /// Feed one joint angle. Returns the newly entered phase, if any.
    pub fn update(&mut self, angle: f32) -> Option<Phase> {
        match self.phase {
            Phase::Up if angle < self.band.down_below => {
                self.phase = Phase::Down;
                Some(Phase::Down)
            }
            Phase::Down if angle > self.band.up_above => {
                self.phase = Phase::Up;
                Some(Phase::Up)
            }
            _ => None,
        }
    }
}
