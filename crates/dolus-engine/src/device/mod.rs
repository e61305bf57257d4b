//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering

mod backend;
mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::{InitError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use init::GpuInit;
