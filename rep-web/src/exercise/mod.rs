//! Exercise module - rep detection state machine and quality scoring
//!
//! Re-exports only. All logic in submodules.

mod events;
mod kind;
mod metrics;
mod profile;
mod quality;
mod session;
mod threshold;

pub use events::{Phase, RepEvent, RepRecord, SessionSummary};
pub use kind::ExerciseKind;
pub use metrics::FrameMetrics;
pub use profile::{ExerciseProfile, JointTriple, Lockout, PostureGate, ThresholdBand};
pub use quality::{QualityBreakdown, QualityInputs, ScoreModel, StabilityTerm, TERM_CEILING, TERM_FLOOR};
pub use session::ExerciseSession;
pub use threshold::ThresholdDetector;
