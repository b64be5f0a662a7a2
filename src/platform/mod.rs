//! Platform abstraction layer
//!
//! Handles the host-side concerns the simulation stays out of:
//! - Frame timing (wall clock or fixed step)
//! - Input sources (scripted, autopilot)
//!
//! Storage lives in `crate::persistence`.

pub mod input;
pub mod time;

pub use input::{Autopilot, InputSource, ScriptedInput};
pub use time::FramePacer;
