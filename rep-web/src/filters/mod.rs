//! Filters module - per-frame input conditioning
//!
//! Re-exports only. All logic in submodules.

mod one_euro;
mod visibility;

pub use one_euro::{MetricsSmoother, OneEuroFilter};
pub use visibility::VisibilityGate;
