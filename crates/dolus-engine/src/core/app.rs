use winit::event::WindowEvent;

use crate::device::Gpu;
use crate::program::Program;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once, after the GPU context is initialized and before the first
    /// frame. Register shaders, pipelines and objects here.
    fn setup(&mut self, program: &mut Program<Gpu<'_>>) -> anyhow::Result<()>;

    /// Called for window events the runtime does not consume itself.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called before each frame is rendered.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }
}
