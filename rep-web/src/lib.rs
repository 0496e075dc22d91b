//! Rep Web - squat and push-up rep counter
//!
//! Consumes MediaPipe Pose landmarks one frame at a time and turns them
//! into debounced rep events with a quality score.
//!
//! - `geometry`: landmark storage and joint math
//! - `exercise`: per-exercise profiles and the Up/Down state machine
//! - `filters`: visibility gate and optional smoothing
//! - `bridge`: `#[wasm_bindgen]` surface for the page

use wasm_bindgen::prelude::*;

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}
pub(crate) use console_log;

mod bridge;
pub mod config;
pub mod error;
pub mod exercise;
pub mod filters;
pub mod geometry;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod integration_tests;

pub use bridge::{FrameUpdate, RepCounter};
pub use config::{DetectionMode, RepConfig, SmoothingConfig, SpeedScoring, StabilityScoring};
pub use error::RepError;
pub use exercise::{ExerciseKind, ExerciseSession, Phase, RepEvent, SessionSummary};
pub use geometry::{Frame, Landmark, Pose};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    console_log!("✅ Rep counter loaded");
}
