//! Frame rendering.
//!
//! `RenderBackend` is the seam between the scene registry and the GPU:
//! the scene creates resources through it and records draws into the pass it
//! opens. `render_frame` drives one acquire → clear → draw → submit cycle.

mod backend;
mod frame;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{PassRecorder, RenderBackend};
pub use frame::{render_frame, FrameOutcome};
