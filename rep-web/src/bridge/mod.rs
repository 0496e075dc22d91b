//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod counter;
mod feedback;

pub use counter::{FrameUpdate, RepCounter};
