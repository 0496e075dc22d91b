//! Error types shared by the core and the JS bridge

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong between a landmark frame and a rep event
#[derive(Debug, Error)]
pub enum RepError {
    /// Estimator found no person, or required landmarks weren't visible
    #[error("no usable pose landmarks in frame")]
    MissingLandmarks,

    /// A limb segment collapsed to a point, so the joint angle is undefined
    #[error("degenerate geometry at landmark {vertex}")]
    DegenerateGeometry { vertex: usize },

    #[error("unknown exercise {0:?} (expected \"squat\" or \"pushup\")")]
    InvalidExercise(String),

    #[error("invalid landmark data length: {len} (expected 0, 99 or 132)")]
    MalformedFrame { len: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl RepError {
    /// Errors that only mean "drop this frame and wait for the next one"
    pub fn is_frame_skip(&self) -> bool {
        matches!(
            self,
            RepError::MissingLandmarks
                | RepError::DegenerateGeometry { .. }
                | RepError::MalformedFrame { .. }
        )
    }
}

impl From<RepError> for JsValue {
    fn from(err: RepError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepError>;
