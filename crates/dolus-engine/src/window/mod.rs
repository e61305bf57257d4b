//! Window + render loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the program.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
