//! Application-facing contracts.
//!
//! Defines what the runtime calls into (setup, per-frame hook, window events)
//! and how an application or another thread asks the loop to stop.

mod app;
mod ctx;
mod stop;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use stop::StopSignal;
