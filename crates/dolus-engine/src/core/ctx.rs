use winit::window::Window;

use crate::device::Gpu;
use crate::program::Program;
use crate::time::FrameTime;

use super::StopSignal;

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub program: &'a mut Program<Gpu<'w>>,
    pub time: FrameTime,
    pub stop: &'a StopSignal,
}
