//! Session output: phase changes, completed reps, summaries

use serde::Serialize;

use super::kind::ExerciseKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Up,
    Down,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Up => "up",
            Phase::Down => "down",
        }
    }
}

/// Semantic event for the presentation layer to format
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RepEvent {
    /// The machine settled into a new phase without completing a rep
    PhaseEntered { phase: Phase, timestamp_ms: f64 },
    /// Down→Up completed a rep. `quality` is `None` in threshold mode.
    RepCompleted {
        count: u32,
        quality: Option<u8>,
        timestamp_ms: f64,
    },
}

impl RepEvent {
    pub fn quality(&self) -> Option<u8> {
        match self {
            RepEvent::RepCompleted { quality, .. } => *quality,
            RepEvent::PhaseEntered { .. } => None,
        }
    }

    pub fn is_rep(&self) -> bool {
        matches!(self, RepEvent::RepCompleted { .. })
    }
}

/// One counted rep
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RepRecord {
    /// 1-based rep number
    pub index: u32,
    pub timestamp_ms: f64,
    pub quality: Option<u8>,
}

/// Snapshot of a session for the host
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub exercise: ExerciseKind,
    pub rep_count: u32,
    pub phase: Phase,
    pub average_quality: Option<f32>,
    pub best_quality: Option<u8>,
    pub reps: Vec<RepRecord>,
}

impl SessionSummary {
    pub fn new(exercise: ExerciseKind, phase: Phase, reps: Vec<RepRecord>) -> Self {
        let scores: Vec<u8> = reps.iter().filter_map(|rep| rep.quality).collect();
        let average_quality = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().map(|&q| q as f32).sum::<f32>() / scores.len() as f32)
        };

        Self {
            exercise,
            rep_count: reps.len() as u32,
            phase,
            average_quality,
            best_quality: scores.iter().copied().max(),
            reps,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
