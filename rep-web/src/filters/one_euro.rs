//! One Euro smoothing for the measured signals
//!
//! Holds at the bottom of a rep produce a slow signal that gets heavy
//! smoothing; the drive back up is fast and passes with little lag.
//! Optional stage between geometry and the state machine.

use std::f32::consts::TAU;

use crate::config::SmoothingConfig;
use crate::exercise::FrameMetrics;

/// Cutoff (Hz) for the rate-of-change estimate
const RATE_CUTOFF_HZ: f32 = 1.0;

/// Last accepted sample
#[derive(Clone, Copy, Debug)]
struct Sample {
    timestamp_ms: f64,
    value: f32,
    /// Smoothed rate of change, units per second
    rate: f32,
}

/// Adaptive low-pass filter for one scalar signal
#[derive(Clone, Debug)]
pub struct OneEuroFilter {
    config: SmoothingConfig,
    last: Option<Sample>,
}

/// Exponential smoothing weight for a cutoff over an interval
fn alpha(dt_s: f32, cutoff_hz: f32) -> f32 {
    let r = TAU * cutoff_hz * dt_s;
    r / (r + 1.0)
}

fn blend(alpha: f32, new: f32, old: f32) -> f32 {
    alpha * new + (1.0 - alpha) * old
}

impl OneEuroFilter {
    pub fn new(config: SmoothingConfig) -> Self {
        Self { config, last: None }
    }

    /// Smooth `value` observed at `timestamp_ms`
    ///
    /// The first sample passes through. A sample that does not move the
    /// clock forward returns the previous output unchanged.
    pub fn filter(&mut self, timestamp_ms: f64, value: f32) -> f32 {
        let Some(last) = self.last else {
            self.last = Some(Sample { timestamp_ms, value, rate: 0.0 });
            return value;
        };

        let dt_s = ((timestamp_ms - last.timestamp_ms) / 1000.0) as f32;
        if !(dt_s > 0.0) {
            return last.value;
        }

        let rate = blend(
            alpha(dt_s, RATE_CUTOFF_HZ),
            (value - last.value) / dt_s,
            last.rate,
        );
        let cutoff = self.config.min_cutoff + self.config.beta * rate.abs();
        let smoothed = blend(alpha(dt_s, cutoff), value, last.value);

        self.last = Some(Sample {
            timestamp_ms,
            value: smoothed,
            rate,
        });
        smoothed
    }
}

/// Smooths the two continuous signals the state machine thresholds on
///
/// Gate results are booleans from the raw frame and pass through as is.
pub struct MetricsSmoother {
    angle: OneEuroFilter,
    anchor_y: OneEuroFilter,
}

impl MetricsSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            angle: OneEuroFilter::new(config),
            anchor_y: OneEuroFilter::new(config),
        }
    }

    pub fn apply(&mut self, timestamp_ms: f64, metrics: FrameMetrics) -> FrameMetrics {
        FrameMetrics {
            angle: self.angle.filter(timestamp_ms, metrics.angle),
            anchor_y: self.anchor_y.filter(timestamp_ms, metrics.anchor_y),
            ..metrics
        }
    }
}
