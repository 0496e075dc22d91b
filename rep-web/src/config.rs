//! Rep counter configuration
//!
//! All fields have defaults, so the host can pass a partial JSON object
//! such as `{"min_rep_time_ms": 1200}`.

use serde::{Deserialize, Serialize};

use crate::error::{RepError, Result};

/// How phase changes are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Stability streaks, displacement baselines, debounce and quality scoring
    #[default]
    Stabilized,
    /// Phase flips as soon as the joint angle crosses a threshold. No quality.
    Threshold,
}

/// Which elapsed time feeds the speed term of the quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedScoring {
    /// Measured after the rep timestamp is updated, so the term sits at its floor
    #[default]
    AsRecorded,
    /// Time since the previous rep (or since the first frame for rep one)
    SincePreviousRep,
}

/// Which down streak feeds the stability term of the quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityScoring {
    /// Longest down streak held while in Down
    #[default]
    LongestHold,
    /// Down streak on the completing frame. Up frames have already cleared
    /// it, so the term sits at its floor.
    AtCompletion,
}

/// One Euro filter parameters for the joint angle and anchor height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    pub min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    pub beta: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.007,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepConfig {
    /// Consecutive frames a phase condition must hold before transitioning
    pub stable_frames: u32,
    /// Minimum time between two counted reps
    pub min_rep_time_ms: f64,
    /// Landmarks below this visibility make the frame unusable
    pub min_visibility: f32,
    pub mode: DetectionMode,
    pub speed_scoring: SpeedScoring,
    pub stability_scoring: StabilityScoring,
    /// `None` leaves the raw signal untouched
    pub smoothing: Option<SmoothingConfig>,
}

impl Default for RepConfig {
    fn default() -> Self {
        Self {
            stable_frames: 12,
            min_rep_time_ms: 900.0,
            min_visibility: 0.5,
            mode: DetectionMode::Stabilized,
            speed_scoring: SpeedScoring::AsRecorded,
            stability_scoring: StabilityScoring::LongestHold,
            smoothing: None,
        }
    }
}

impl RepConfig {
    /// Parse and validate a JSON config object
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stable_frames == 0 {
            return Err(RepError::InvalidConfig(
                "stable_frames must be at least 1".into(),
            ));
        }
        if !self.min_rep_time_ms.is_finite() || self.min_rep_time_ms < 0.0 {
            return Err(RepError::InvalidConfig(format!(
                "min_rep_time_ms must be a non-negative number, got {}",
                self.min_rep_time_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(RepError::InvalidConfig(format!(
                "min_visibility must be within 0..=1, got {}",
                self.min_visibility
            )));
        }
        if let Some(smoothing) = &self.smoothing {
            if !(smoothing.min_cutoff > 0.0) || !(smoothing.beta >= 0.0) {
                return Err(RepError::InvalidConfig(
                    "smoothing needs min_cutoff > 0 and beta >= 0".into(),
                ));
            }
        }
        Ok(())
    }
}
