//! Dolus engine crate.
//!
//! A small wgpu wrapper: one device/surface context, an index-based registry of
//! shaders, pipelines and vertex-buffer objects, and a stoppable
//! clear-and-draw loop.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`device`] | `Gpu` context, `GpuInit`, `InitError` |
//! | [`scene`] | typed handles, `Registry`, `PipelineConfig`, `Scene` |
//! | [`render`] | `RenderBackend` seam, `render_frame` |
//! | [`program`] | `Program`: context + scene with initialization checks |
//! | [`window`] | winit `Runtime` driving the loop |
//! | [`core`] | `App` contract, `FrameCtx`, `StopSignal` |

pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod program;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use error::{Error, Result};
pub use program::{Program, ProgramConfig, DEFAULT_CLEAR_COLOR};
