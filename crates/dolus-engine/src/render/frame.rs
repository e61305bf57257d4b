use crate::error::Result;
use crate::scene::Scene;

use super::{PassRecorder, RenderBackend};

/// Result of one `render_frame` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was cleared, drawn and submitted.
    Presented { draw_calls: usize },
    /// No frame target was available; nothing was recorded.
    Skipped,
}

/// Renders one frame: acquire target, clear, draw every object, submit.
///
/// The pass is recorded and submitted in one uninterrupted sequence.
pub fn render_frame<B: RenderBackend>(
    backend: &mut B,
    scene: &Scene<B>,
    clear: wgpu::Color,
) -> Result<FrameOutcome> {
    let Some(mut frame) = backend.acquire_frame()? else {
        return Ok(FrameOutcome::Skipped);
    };

    let mut draw_calls = 0;
    backend.encode_pass(&mut frame, clear, &mut |pass: &mut dyn PassRecorder<B>| {
        draw_calls = scene.record(pass);
    });
    backend.submit(frame);

    Ok(FrameOutcome::Presented { draw_calls })
}
