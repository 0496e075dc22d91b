//! Rep state machine
//!
//! One `ExerciseSession` per selected exercise. Each frame is measured
//! against the exercise profile and then drives a two-phase machine:
//!
//! - Up→Down after `stable_frames` consecutive frames of the down
//!   condition (joint flexed, anchor displaced below baseline, gates pass)
//! - Down→Up after `stable_frames` consecutive frames of the up condition
//!   (joint extended, anchor back near baseline, gates pass) once the
//!   debounce window has passed. This is the only place a rep is counted.
//!
//! Frames without a usable pose return an error and leave every field
//! untouched.

use tracing::{debug, info, trace};

use crate::config::{DetectionMode, RepConfig, SpeedScoring, StabilityScoring};
use crate::error::{RepError, Result};
use crate::filters::{MetricsSmoother, VisibilityGate};
use crate::geometry::Frame;

use super::events::{Phase, RepEvent, RepRecord, SessionSummary};
use super::kind::ExerciseKind;
use super::metrics::FrameMetrics;
use super::profile::ExerciseProfile;
use super::quality::QualityInputs;
use super::threshold::ThresholdDetector;

pub struct ExerciseSession {
    profile: ExerciseProfile,
    config: RepConfig,
    /// Landmarks the profile reads, checked by the visibility gate
    required: Vec<usize>,
    gate: VisibilityGate,
    smoother: Option<MetricsSmoother>,
    threshold: ThresholdDetector,

    phase: Phase,
    rep_count: u32,
    down_streak: u32,
    up_streak: u32,
    /// Longest down streak since the last Up→Down transition
    hold_frames: u32,
    baseline_y: Option<f32>,
    last_rep_ms: Option<f64>,
    down_entered_ms: Option<f64>,
    first_frame_ms: Option<f64>,
    reps: Vec<RepRecord>,
}

impl ExerciseSession {
    /// Session on `kind` with the default config
    pub fn with_defaults(kind: ExerciseKind) -> Self {
        Self::build(ExerciseProfile::for_kind(kind), RepConfig::default())
    }

    pub fn new(kind: ExerciseKind, config: RepConfig) -> Result<Self> {
        Self::with_profile(ExerciseProfile::for_kind(kind), config)
    }

    /// Rejects configs that `RepConfig::validate` rejects
    pub fn with_profile(profile: ExerciseProfile, config: RepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(profile, config))
    }

    fn build(profile: ExerciseProfile, config: RepConfig) -> Self {
        Self {
            required: profile.required_landmarks(),
            gate: VisibilityGate::new(config.min_visibility),
            smoother: config.smoothing.map(MetricsSmoother::new),
            threshold: ThresholdDetector::new(profile.threshold_band),
            profile,
            config,
            phase: Phase::Up,
            rep_count: 0,
            down_streak: 0,
            up_streak: 0,
            hold_frames: 0,
            baseline_y: None,
            last_rep_ms: None,
            down_entered_ms: None,
            first_frame_ms: None,
            reps: Vec::new(),
        }
    }

    /// Discard all state and start over on `kind`
    pub fn switch_exercise(&mut self, kind: ExerciseKind) {
        let config = self.config.clone();
        *self = Self::build(ExerciseProfile::for_kind(kind), config);
        debug!(exercise = %kind, "exercise selected");
    }

    /// Discard all state, keeping the current exercise
    pub fn reset(&mut self) {
        self.switch_exercise(self.profile.kind);
    }

    /// Process one frame to completion
    ///
    /// Returns the phase change or completed rep this frame produced, if
    /// any. Errors are all "skip this frame"; session state is unchanged.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<Option<RepEvent>> {
        let metrics = match self.measure(frame) {
            Ok(metrics) => metrics,
            Err(err) => {
                trace!(exercise = %self.profile.kind, error = %err, "frame skipped");
                return Err(err);
            }
        };

        let now = frame.timestamp_ms;
        self.first_frame_ms.get_or_insert(now);

        let event = match self.config.mode {
            DetectionMode::Stabilized => self.step_stabilized(&metrics, now),
            DetectionMode::Threshold => self.step_threshold(&metrics, now),
        };
        Ok(event)
    }

    fn measure(&mut self, frame: &Frame) -> Result<FrameMetrics> {
        let pose = frame.pose.as_ref().ok_or(RepError::MissingLandmarks)?;
        self.gate.check(pose, &self.required)?;
        let metrics = FrameMetrics::measure(&self.profile, pose)?;

        Ok(match self.smoother.as_mut() {
            Some(smoother) => smoother.apply(frame.timestamp_ms, metrics),
            None => metrics,
        })
    }

    fn step_stabilized(&mut self, metrics: &FrameMetrics, now: f64) -> Option<RepEvent> {
        let baseline = *self.baseline_y.get_or_insert(metrics.anchor_y);
        let drop = metrics.anchor_y - baseline;

        let profile = &self.profile;
        let down_holds = metrics.angle < profile.down_angle_below
            && drop > profile.down_drop_above
            && metrics.down_gates;
        let up_holds = metrics.angle > profile.up_angle_above
            && drop < profile.up_drop_below
            && metrics.up_gates;

        // Streaks are consecutive runs and never both non-zero
        if down_holds {
            self.down_streak += 1;
            self.up_streak = 0;
        } else if up_holds {
            self.up_streak += 1;
            self.down_streak = 0;
        } else {
            self.down_streak = 0;
            self.up_streak = 0;
        }

        if self.phase == Phase::Down {
            self.hold_frames = self.hold_frames.max(self.down_streak);
        }

        let stable = self.config.stable_frames;
        match self.phase {
            Phase::Up if self.down_streak >= stable => {
                self.phase = Phase::Down;
                self.down_entered_ms = Some(now);
                self.hold_frames = self.down_streak;
                debug!(
                    exercise = %self.profile.kind,
                    angle = metrics.angle,
                    drop,
                    "entered down phase"
                );
                Some(RepEvent::PhaseEntered {
                    phase: Phase::Down,
                    timestamp_ms: now,
                })
            }
            Phase::Down if self.up_streak >= stable && self.debounce_elapsed(now) => {
                Some(self.complete_rep(metrics, drop, now))
            }
            _ => {
                self.reanchor_if_locked_out(metrics, drop);
                None
            }
        }
    }

    fn step_threshold(&mut self, metrics: &FrameMetrics, now: f64) -> Option<RepEvent> {
        match self.threshold.update(metrics.angle)? {
            Phase::Down => {
                self.phase = Phase::Down;
                self.down_entered_ms = Some(now);
                debug!(exercise = %self.profile.kind, angle = metrics.angle, "entered down phase");
                Some(RepEvent::PhaseEntered {
                    phase: Phase::Down,
                    timestamp_ms: now,
                })
            }
            Phase::Up => {
                self.phase = Phase::Up;
                self.rep_count += 1;
                self.last_rep_ms = Some(now);
                self.down_entered_ms = None;
                self.reps.push(RepRecord {
                    index: self.rep_count,
                    timestamp_ms: now,
                    quality: None,
                });
                info!(exercise = %self.profile.kind, reps = self.rep_count, "rep completed");
                Some(RepEvent::RepCompleted {
                    count: self.rep_count,
                    quality: None,
                    timestamp_ms: now,
                })
            }
        }
    }

    /// Down→Up may only fire `min_rep_time_ms` after the previous rep,
    /// or after entering Down when no rep has been counted yet
    fn debounce_elapsed(&self, now: f64) -> bool {
        match self.last_rep_ms.or(self.down_entered_ms) {
            Some(reference) => now - reference > self.config.min_rep_time_ms,
            None => true,
        }
    }

    fn complete_rep(&mut self, metrics: &FrameMetrics, drop: f32, now: f64) -> RepEvent {
        let previous_rep_ms = self.last_rep_ms.or(self.first_frame_ms);

        self.phase = Phase::Up;
        self.rep_count += 1;
        self.last_rep_ms = Some(now);

        let speed_reference = match self.config.speed_scoring {
            SpeedScoring::AsRecorded => self.last_rep_ms.unwrap_or(now),
            SpeedScoring::SincePreviousRep => previous_rep_ms.unwrap_or(now),
        };

        let hold_frames = match self.config.stability_scoring {
            StabilityScoring::LongestHold => self.hold_frames,
            StabilityScoring::AtCompletion => self.down_streak,
        };

        let quality = self.profile.score.score(&QualityInputs {
            drop,
            hold_frames,
            straight: metrics.straight,
            elapsed_ms: now - speed_reference,
        });

        // Next cycle measures from where this one finished
        self.baseline_y = Some(metrics.anchor_y);
        self.hold_frames = 0;
        self.down_entered_ms = None;

        self.reps.push(RepRecord {
            index: self.rep_count,
            timestamp_ms: now,
            quality: Some(quality),
        });
        info!(
            exercise = %self.profile.kind,
            reps = self.rep_count,
            quality,
            "rep completed"
        );

        RepEvent::RepCompleted {
            count: self.rep_count,
            quality: Some(quality),
            timestamp_ms: now,
        }
    }

    /// Follow slow drift (user shuffling between sets) while fully extended
    fn reanchor_if_locked_out(&mut self, metrics: &FrameMetrics, drop: f32) {
        let Some(lockout) = self.profile.lockout else {
            return;
        };
        if metrics.angle > lockout.angle_above && drop < lockout.drop_below {
            trace!(exercise = %self.profile.kind, y = metrics.anchor_y, drop, "baseline re-anchored");
            self.baseline_y = Some(metrics.anchor_y);
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn config(&self) -> &RepConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn down_streak(&self) -> u32 {
        self.down_streak
    }

    pub fn up_streak(&self) -> u32 {
        self.up_streak
    }

    pub fn baseline_y(&self) -> Option<f32> {
        self.baseline_y
    }

    pub fn last_rep_ms(&self) -> Option<f64> {
        self.last_rep_ms
    }

    pub fn reps(&self) -> &[RepRecord] {
        &self.reps
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::new(self.profile.kind, self.phase, self.reps.clone())
    }
}
