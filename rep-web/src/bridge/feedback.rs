//! Feedback text for the page
//!
//! The core only reports semantic events. Wording lives here.

use crate::exercise::{ExerciseKind, Phase, RepEvent};

pub const READY_TEXT: &str = "Get Ready!";

/// Label for the exercise heading
pub fn exercise_label(kind: ExerciseKind) -> String {
    format!("Exercise: {}", kind.name())
}

/// Counter text
pub fn counter_text(reps: u32) -> String {
    format!("Reps: {}", reps)
}

/// Status line for an event, `None` when the event has nothing to say
pub fn event_text(kind: ExerciseKind, event: &RepEvent) -> Option<String> {
    match (kind, event) {
        (ExerciseKind::Squat, RepEvent::PhaseEntered { phase: Phase::Down, .. }) => {
            Some("⬇ Deep Squat Hold".to_string())
        }
        (ExerciseKind::PushUp, RepEvent::PhaseEntered { phase: Phase::Down, .. }) => {
            Some("⬇ Chest Down".to_string())
        }
        (_, RepEvent::PhaseEntered { phase: Phase::Up, .. }) => None,
        (kind, RepEvent::RepCompleted { quality, .. }) => {
            let badge = match kind {
                ExerciseKind::Squat => "✅",
                ExerciseKind::PushUp => "🔥",
            };
            Some(match quality {
                Some(quality) => format!("{} {} ({}% quality)", badge, kind.name(), quality),
                None => format!("{} {}", badge, kind.name()),
            })
        }
    }
}

/// Console line echoing an event from the state machine
pub fn event_log_line(kind: ExerciseKind, event: &RepEvent) -> String {
    match event {
        RepEvent::PhaseEntered { phase, timestamp_ms } => {
            format!("{} entered {} at {:.0}ms", kind.name(), phase.as_str(), timestamp_ms)
        }
        RepEvent::RepCompleted { count, quality: Some(quality), .. } => {
            format!("{} rep {} quality={}", kind.name(), count, quality)
        }
        RepEvent::RepCompleted { count, quality: None, .. } => {
            format!("{} rep {}", kind.name(), count)
        }
    }
}
