//! RepCounter - the JS-facing handle
//!
//! JavaScript owns one `RepCounter` and calls `processFrame` from the
//! MediaPipe `onResults` callback with a flat `Float32Array` of landmarks
//! (empty when no pose was found) and `performance.now()`.

use wasm_bindgen::prelude::*;

use crate::config::RepConfig;
use crate::error::RepError;
use crate::exercise::{ExerciseKind, ExerciseSession, Phase, RepEvent};
use crate::geometry::{Frame, Pose};

use super::feedback::{counter_text, event_log_line, event_text, exercise_label, READY_TEXT};

/// Result of one `processFrame` call
#[wasm_bindgen]
pub struct FrameUpdate {
    rep_count: u32,
    phase: Phase,
    changed: bool,
    feedback: Option<String>,
    quality: Option<u8>,
}

#[wasm_bindgen]
impl FrameUpdate {
    #[wasm_bindgen(getter, js_name = repCount)]
    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.phase.as_str().to_string()
    }

    /// True when the rep count changed on this frame
    #[wasm_bindgen(getter)]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// New status text, if this frame produced one
    #[wasm_bindgen(getter)]
    pub fn feedback(&self) -> Option<String> {
        self.feedback.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<u8> {
        self.quality
    }
}

#[wasm_bindgen]
pub struct RepCounter {
    session: ExerciseSession,
    feedback: String,
}

#[wasm_bindgen]
impl RepCounter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_session(ExerciseSession::with_defaults(ExerciseKind::Squat))
    }

    /// Build from a JSON config object (all fields optional)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<RepCounter, JsValue> {
        let config = RepConfig::from_json(json)?;
        Ok(Self::from_config(config)?)
    }

    /// Switch exercise; discards the current session
    #[wasm_bindgen(js_name = selectExercise)]
    pub fn select_exercise(&mut self, name: &str) -> Result<(), JsValue> {
        let kind: ExerciseKind = name.parse()?;
        self.session.switch_exercise(kind);
        self.feedback = READY_TEXT.to_string();
        crate::console_log!("🏋 {}", exercise_label(kind));
        Ok(())
    }

    /// Process one frame from the pose estimator
    #[wasm_bindgen(js_name = processFrame)]
    pub fn process_frame(&mut self, data: &[f32], timestamp_ms: f64) -> FrameUpdate {
        let pose = match Pose::from_flat(data) {
            Ok(pose) => pose,
            Err(err) => {
                web_sys::console::warn_1(&err.to_string().into());
                return self.update(None);
            }
        };

        // Every error out of the session is a skipped frame
        let event = match self.session.process_frame(&Frame::new(pose, timestamp_ms)) {
            Ok(event) => event,
            // Nobody in view is routine, so only bad geometry is reported
            Err(err @ RepError::DegenerateGeometry { .. }) => {
                web_sys::console::warn_1(&format!("Frame skipped: {}", err).into());
                None
            }
            Err(_) => None,
        };

        self.update(event)
    }

    /// Start the current exercise over
    pub fn reset(&mut self) {
        self.session.reset();
        self.feedback = READY_TEXT.to_string();
    }

    #[wasm_bindgen(js_name = repCount)]
    pub fn rep_count(&self) -> u32 {
        self.session.rep_count()
    }

    pub fn phase(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    pub fn exercise(&self) -> String {
        self.session.kind().as_str().to_string()
    }

    #[wasm_bindgen(js_name = exerciseLabel)]
    pub fn exercise_label(&self) -> String {
        exercise_label(self.session.kind())
    }

    #[wasm_bindgen(js_name = counterText)]
    pub fn counter_text(&self) -> String {
        counter_text(self.session.rep_count())
    }

    /// Latest status text
    pub fn feedback(&self) -> String {
        self.feedback.clone()
    }

    #[wasm_bindgen(js_name = summaryJson)]
    pub fn summary_json(&self) -> Result<String, JsValue> {
        self.session
            .summary()
            .to_json()
            .map_err(|e| JsValue::from_str(&format!("Summary serialization failed: {}", e)))
    }
}

impl RepCounter {
    /// Squat counter with a validated config
    pub fn from_config(config: RepConfig) -> Result<Self, RepError> {
        Ok(Self::with_session(ExerciseSession::new(ExerciseKind::Squat, config)?))
    }

    fn with_session(session: ExerciseSession) -> Self {
        Self {
            session,
            feedback: READY_TEXT.to_string(),
        }
    }

    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    fn update(&mut self, event: Option<RepEvent>) -> FrameUpdate {
        let text = event.and_then(|event| event_text(self.session.kind(), &event));
        if let Some(text) = &text {
            self.feedback = text.clone();
        }
        if let Some(event) = &event {
            crate::console_log!("{}", event_log_line(self.session.kind(), event));
        }

        FrameUpdate {
            rep_count: self.session.rep_count(),
            phase: self.session.phase(),
            changed: event.map_or(false, |event| event.is_rep()),
            feedback: text,
            quality: event.and_then(|event| event.quality()),
        }
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new()
    }
}
