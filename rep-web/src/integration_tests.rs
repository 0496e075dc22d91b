//! End-to-end rep counting scenarios
//!
//! Drives `ExerciseSession` with synthetic landmark streams and checks the
//! externally visible guarantees: when reps are counted, how often, and
//! what they score.

use crate::config::{DetectionMode, RepConfig, SmoothingConfig, SpeedScoring, StabilityScoring};
use crate::error::RepError;
use crate::exercise::{ExerciseKind, ExerciseSession, Phase, RepEvent};
use crate::geometry::{Frame, Landmark, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE};
use crate::test_support::{push_up_pose, push_up_frame, squat_frame};

const FRAME_MS: f64 = 33.0;

/// Feeds frames at a fixed cadence and collects events
struct Driver {
    session: ExerciseSession,
    t: f64,
    events: Vec<RepEvent>,
}

impl Driver {
    fn new(kind: ExerciseKind, config: RepConfig) -> Self {
        Self {
            session: ExerciseSession::new(kind, config).unwrap(),
            t: 0.0,
            events: Vec::new(),
        }
    }

    fn squat() -> Self {
        Self::new(ExerciseKind::Squat, RepConfig::default())
    }

    fn push(&mut self, frame: Frame) -> Option<RepEvent> {
        let event = self.session.process_frame(&frame).unwrap();
        self.t = frame.timestamp_ms + FRAME_MS;
        if let Some(event) = event {
            self.events.push(event);
        }
        event
    }

    fn squat_frames(&mut self, count: usize, knee_angle: f32, hip_y: f32) {
        for _ in 0..count {
            self.push(squat_frame(knee_angle, hip_y, self.t));
        }
    }

    fn push_up_frames(&mut self, count: usize, elbow_angle: f32, shoulder_y: f32) {
        for _ in 0..count {
            self.push(push_up_frame(elbow_angle, shoulder_y, self.t));
        }
    }

    /// Jump the clock forward without delivering frames
    fn wait_until(&mut self, t: f64) {
        self.t = t;
    }

    fn reps(&self) -> u32 {
        self.session.rep_count()
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }

    fn down_entered_at(&self) -> f64 {
        self.events
            .iter()
            .rev()
            .find_map(|event| match event {
                RepEvent::PhaseEntered { phase: Phase::Down, timestamp_ms } => Some(*timestamp_ms),
                _ => None,
            })
            .expect("no down transition recorded")
    }
}

/// Deterministic jitter so noisy streams are reproducible
struct Jitter(u64);

impl Jitter {
    /// Uniform-ish value in [-amplitude, amplitude]
    fn next(&mut self, amplitude: f32) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let unit = (self.0 >> 40) as f32 / (1u64 << 24) as f32;
        (unit * 2.0 - 1.0) * amplitude
    }
}

// ============================================================================
// SQUAT SCENARIOS
// ============================================================================

#[test]
fn test_full_squat_rep() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);

    driver.squat_frames(11, 70.0, 0.60);
    assert_eq!(driver.phase(), Phase::Up);

    driver.squat_frames(1, 70.0, 0.60);
    assert_eq!(driver.phase(), Phase::Down);
    assert_eq!(driver.reps(), 0);

    let down_at = driver.down_entered_at();
    driver.wait_until(down_at + 900.0);
    driver.squat_frames(11, 175.0, 0.50);
    assert_eq!(driver.reps(), 0, "needs a full stable streak");

    let event = driver.push(squat_frame(175.0, 0.50, driver.t));
    assert_eq!(driver.reps(), 1);
    assert_eq!(driver.phase(), Phase::Up);

    match event {
        Some(RepEvent::RepCompleted { count, quality, .. }) => {
            assert_eq!(count, 1);
            let quality = quality.expect("stabilized reps are scored");
            assert!((60..=100).contains(&quality));
            // depth 96, stability 96 (12 held frames), speed at floor
            assert_eq!(quality, 85);
        }
        other => panic!("expected rep event, got {:?}", other),
    }
}

#[test]
fn test_short_hold_never_enters_down() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(5, 70.0, 0.60);
    driver.wait_until(2000.0);
    driver.squat_frames(20, 175.0, 0.50);

    assert_eq!(driver.phase(), Phase::Up);
    assert_eq!(driver.reps(), 0);
    assert!(driver.events.is_empty());
}

#[test]
fn test_debounce_holds_phase_down() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(12, 70.0, 0.60);
    let down_at = driver.down_entered_at();

    driver.wait_until(down_at + 500.0);
    driver.squat_frames(12, 175.0, 0.50);
    assert_eq!(driver.phase(), Phase::Down);
    assert_eq!(driver.reps(), 0);

    // Keep standing; the rep lands on the first frame past the window
    let mut rep_at = None;
    for _ in 0..30 {
        let t = driver.t;
        if let Some(RepEvent::RepCompleted { .. }) = driver.push(squat_frame(175.0, 0.50, t)) {
            rep_at = Some(t);
            break;
        }
        assert!(t - down_at <= 900.0, "rep should have counted at t={}", t);
    }

    let rep_at = rep_at.expect("rep never counted");
    assert!(rep_at - down_at > 900.0);
    assert!(rep_at - down_at <= 900.0 + FRAME_MS);
    assert_eq!(driver.reps(), 1);
}

#[test]
fn test_dropped_frames_do_not_break_streak() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(6, 70.0, 0.60);

    let t = driver.t;
    let err = driver.session.process_frame(&Frame::empty(t)).unwrap_err();
    assert!(err.is_frame_skip());

    driver.squat_frames(6, 70.0, 0.60);
    assert_eq!(driver.phase(), Phase::Down);
}

#[test]
fn test_degenerate_frame_is_skipped() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(3, 70.0, 0.60);

    let mut pose = crate::geometry::Pose::default();
    pose.set(RIGHT_HIP, Landmark::new(0.5, 0.6));
    pose.set(RIGHT_KNEE, Landmark::new(0.5, 0.6));
    pose.set(RIGHT_ANKLE, Landmark::new(0.5, 0.9));

    let err = driver.session.process_frame(&Frame::new(Some(pose), driver.t)).unwrap_err();
    assert!(matches!(err, RepError::DegenerateGeometry { .. }));
    assert_eq!(driver.session.down_streak(), 3);
    assert_eq!(driver.session.baseline_y(), Some(0.50));
}

#[test]
fn test_switching_exercise_mid_session() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(12, 70.0, 0.60);
    driver.wait_until(2000.0);
    driver.squat_frames(12, 175.0, 0.50);
    driver.squat_frames(12, 70.0, 0.60);
    assert_eq!(driver.reps(), 1);
    assert_eq!(driver.phase(), Phase::Down);

    driver.session.switch_exercise(ExerciseKind::PushUp);
    assert_eq!(driver.reps(), 0);
    assert_eq!(driver.phase(), Phase::Up);
    assert!(driver.session.reps().is_empty());
}

#[test]
fn test_noisy_set_counts_every_rep() {
    const REPS: u32 = 10;
    let mut driver = Driver::squat();
    let mut jitter = Jitter(7);

    for _ in 0..REPS {
        let mut frame = |driver: &mut Driver, angle: f32, y: f32| {
            let angle = angle + jitter.next(1.0);
            let y = y + jitter.next(0.003);
            driver.push(squat_frame(angle, y, driver.t));
        };

        for _ in 0..15 {
            frame(&mut driver, 175.0, 0.50);
        }
        for step in 1..=10 {
            let k = step as f32 / 10.0;
            frame(&mut driver, 175.0 - 105.0 * k, 0.50 + 0.12 * k);
        }
        for _ in 0..25 {
            frame(&mut driver, 70.0, 0.62);
        }
        for step in 1..=10 {
            let k = step as f32 / 10.0;
            frame(&mut driver, 70.0 + 105.0 * k, 0.62 - 0.12 * k);
        }
        for _ in 0..20 {
            frame(&mut driver, 175.0, 0.50);
        }
    }

    assert_eq!(driver.reps(), REPS);

    // Strict Down, Rep, Down, Rep... alternation
    for (i, event) in driver.events.iter().enumerate() {
        match (i % 2, event) {
            (0, RepEvent::PhaseEntered { phase: Phase::Down, .. }) => {}
            (1, RepEvent::RepCompleted { count, quality, .. }) => {
                assert_eq!(*count as usize, i / 2 + 1);
                let quality = quality.unwrap();
                assert!((60..=100).contains(&quality), "quality {} out of band", quality);
            }
            _ => panic!("unexpected event #{}: {:?}", i, event),
        }
    }

    // Debounce between consecutive reps
    let times: Vec<f64> = driver.session.reps().iter().map(|rep| rep.timestamp_ms).collect();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] > 900.0);
    }
}

#[test]
fn test_fast_bounces_are_debounced() {
    // Tiny stable window so only the debounce can hold reps back
    let config = RepConfig {
        stable_frames: 1,
        ..RepConfig::default()
    };
    let mut driver = Driver::new(ExerciseKind::Squat, config);
    driver.squat_frames(1, 175.0, 0.50);

    let mut last_count = 0;
    for _ in 0..40 {
        driver.squat_frames(2, 70.0, 0.60);
        driver.squat_frames(2, 175.0, 0.50);
        assert!(driver.reps() >= last_count);
        assert!(driver.reps() - last_count <= 1);
        last_count = driver.reps();
    }

    assert!(driver.reps() > 0);
    let times: Vec<f64> = driver.session.reps().iter().map(|rep| rep.timestamp_ms).collect();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] > 900.0, "reps at {} and {}", pair[0], pair[1]);
    }
}

#[test]
fn test_speed_score_since_previous_rep() {
    let config = RepConfig {
        speed_scoring: SpeedScoring::SincePreviousRep,
        ..RepConfig::default()
    };
    let mut driver = Driver::new(ExerciseKind::Squat, config);
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(12, 70.0, 0.60);
    driver.wait_until(2000.0);
    driver.squat_frames(12, 175.0, 0.50);

    // 2.3s since the first frame puts speed at the ceiling:
    // 0.4*96 + 0.3*96 + 0.3*100 = 97.2
    assert_eq!(driver.session.reps()[0].quality, Some(97));
}

#[test]
fn test_stability_scored_at_completion_sits_at_floor() {
    let config = RepConfig {
        stability_scoring: StabilityScoring::AtCompletion,
        ..RepConfig::default()
    };
    let mut driver = Driver::new(ExerciseKind::Squat, config);
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(12, 70.0, 0.60);
    driver.wait_until(2000.0);
    driver.squat_frames(12, 175.0, 0.50);

    // 0.4*96 + 0.3*60 + 0.3*60 = 74.4
    assert_eq!(driver.session.reps()[0].quality, Some(74));
}

#[test]
fn test_straight_knee_with_hip_still_low_is_not_a_rep() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);
    driver.squat_frames(12, 70.0, 0.60);
    assert_eq!(driver.phase(), Phase::Down);

    // Knee locked but the hip is 0.03 under baseline
    driver.wait_until(driver.down_entered_at() + 2000.0);
    driver.squat_frames(30, 175.0, 0.53);
    assert_eq!(driver.phase(), Phase::Down);
    assert_eq!(driver.reps(), 0);
    assert_eq!(driver.session.up_streak(), 0);

    driver.squat_frames(12, 175.0, 0.50);
    assert_eq!(driver.reps(), 1);
}

#[test]
fn test_hip_above_knee_never_enters_down() {
    let mut driver = Driver::squat();
    driver.squat_frames(1, 175.0, 0.50);

    // 80° at the knee and 0.10 of hip drop, but the thigh points up and
    // away so the hip stays above the knee
    let knee = Landmark::new(0.5, 0.70);
    let thigh = (-45.0f32).to_radians();
    let shin = (-45.0f32 + 80.0).to_radians();
    let mut pose = crate::geometry::Pose::default();
    pose.set(RIGHT_KNEE, knee);
    pose.set(
        RIGHT_HIP,
        Landmark::new(knee.x + 0.1 * 2f32.sqrt() * thigh.cos(), knee.y + 0.1 * 2f32.sqrt() * thigh.sin()),
    );
    pose.set(
        RIGHT_ANKLE,
        Landmark::new(knee.x + 0.2 * shin.cos(), knee.y + 0.2 * shin.sin()),
    );
    assert!(pose.get(RIGHT_HIP).y < knee.y);

    for _ in 0..20 {
        driver.push(Frame::new(Some(pose.clone()), driver.t));
    }
    assert_eq!(driver.phase(), Phase::Up);
    assert_eq!(driver.session.down_streak(), 0);

    // Same angle and drop with the hip under the knee does go down
    driver.squat_frames(12, 80.0, 0.60);
    assert_eq!(driver.phase(), Phase::Down);
}

#[test]
fn test_smoothed_stream_still_counts() {
    let config = RepConfig {
        smoothing: Some(SmoothingConfig::default()),
        ..RepConfig::default()
    };
    let mut driver = Driver::new(ExerciseKind::Squat, config);
    driver.squat_frames(10, 175.0, 0.50);
    driver.squat_frames(40, 70.0, 0.62);
    driver.squat_frames(60, 175.0, 0.50);

    assert_eq!(driver.reps(), 1);
}

#[test]
fn test_smoothing_rejects_single_frame_dip() {
    let config = RepConfig {
        smoothing: Some(SmoothingConfig::default()),
        stable_frames: 1,
        ..RepConfig::default()
    };
    let mut driver = Driver::new(ExerciseKind::Squat, config);
    driver.squat_frames(10, 175.0, 0.50);
    driver.squat_frames(1, 70.0, 0.62);
    driver.squat_frames(10, 175.0, 0.50);

    assert_eq!(driver.phase(), Phase::Up);
    assert!(driver.events.is_empty());
}

// ============================================================================
// PUSH-UP SCENARIOS
// ============================================================================

#[test]
fn test_full_push_up_rep() {
    let mut driver = Driver::new(ExerciseKind::PushUp, RepConfig::default());
    driver.push_up_frames(1, 175.0, 0.50);
    driver.push_up_frames(12, 70.0, 0.58);
    assert_eq!(driver.phase(), Phase::Down);

    driver.wait_until(driver.down_entered_at() + 950.0);
    driver.push_up_frames(12, 172.0, 0.50);
    assert_eq!(driver.reps(), 1);

    // depth 96, straight body 100, speed at floor: 0.4*96 + 0.4*100 + 0.2*60
    assert_eq!(driver.session.reps()[0].quality, Some(90));
}

#[test]
fn test_push_up_elbow_between_80_and_90_stays_up() {
    let mut driver = Driver::new(ExerciseKind::PushUp, RepConfig::default());
    driver.push_up_frames(1, 175.0, 0.50);

    // Deep enough to pass a squat's 90° but not the push-up's 80°
    driver.push_up_frames(20, 85.0, 0.58);
    assert_eq!(driver.phase(), Phase::Up);
    assert_eq!(driver.session.down_streak(), 0);

    driver.push_up_frames(12, 75.0, 0.58);
    assert_eq!(driver.phase(), Phase::Down);
}

#[test]
fn test_sagging_push_up_is_not_counted() {
    let mut driver = Driver::new(ExerciseKind::PushUp, RepConfig::default());
    driver.push_up_frames(1, 175.0, 0.50);
    for _ in 0..20 {
        driver.push(Frame::new(Some(push_up_pose(70.0, 0.58, 0.08)), driver.t));
    }
    assert_eq!(driver.phase(), Phase::Up);
    assert_eq!(driver.reps(), 0);
}

#[test]
fn test_push_up_reanchor_follows_drift() {
    let mut driver = Driver::new(ExerciseKind::PushUp, RepConfig::default());
    driver.push_up_frames(1, 178.0, 0.50);
    // Shifted higher in the frame while locked out
    driver.push_up_frames(5, 178.0, 0.45);
    assert_eq!(driver.session.baseline_y(), Some(0.45));

    // 0.07 below the new baseline, only 0.02 below the old one
    driver.push_up_frames(12, 70.0, 0.52);
    assert_eq!(driver.phase(), Phase::Down);
}

// ============================================================================
// THRESHOLD FALLBACK
// ============================================================================

#[test]
fn test_threshold_mode_flips_immediately() {
    let config = RepConfig {
        mode: DetectionMode::Threshold,
        ..RepConfig::default()
    };
    let mut driver = Driver::new(ExerciseKind::Squat, config);

    driver.squat_frames(1, 175.0, 0.50);
    let down = driver.push(squat_frame(85.0, 0.60, driver.t));
    assert!(matches!(down, Some(RepEvent::PhaseEntered { phase: Phase::Down, .. })));

    // Inside the 90..160 band nothing happens
    assert_eq!(driver.push(squat_frame(150.0, 0.55, driver.t)), None);

    let rep = driver.push(squat_frame(165.0, 0.50, driver.t));
    assert!(matches!(rep, Some(RepEvent::RepCompleted { count: 1, quality: None, .. })));

    // No debounce: a second rep 100ms later still counts
    driver.squat_frames(1, 85.0, 0.60);
    driver.squat_frames(1, 165.0, 0.50);
    assert_eq!(driver.reps(), 2);
}
