//! Supported exercises

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RepError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Squat,
    PushUp,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 2] = [ExerciseKind::Squat, ExerciseKind::PushUp];

    /// Machine name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::PushUp => "pushup",
        }
    }

    /// Display name for the UI
    pub fn name(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "Squat",
            ExerciseKind::PushUp => "Push-up",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = RepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squat" => Ok(ExerciseKind::Squat),
            "pushup" | "push-up" | "push_up" => Ok(ExerciseKind::PushUp),
            _ => Err(RepError::InvalidExercise(s.to_string())),
        }
    }
}
