use core::ops::Range;

use crate::error::Result;
use crate::scene::PipelineConfig;

/// GPU operations the scene and the frame loop depend on.
///
/// [`Gpu`](crate::device::Gpu) is the production implementation. Resource types
/// are associated so the registry stays independent of wgpu object types.
pub trait RenderBackend: Sized {
    type ShaderModule;
    type Pipeline;
    type Buffer;
    /// One acquired frame target plus its command encoder.
    type Frame;

    /// Compiles WGSL source into a shader module.
    fn compile_shader(&self, label: &str, source: &str) -> Result<Self::ShaderModule>;

    fn create_pipeline(
        &self,
        label: &str,
        shader: &Self::ShaderModule,
        config: &PipelineConfig,
    ) -> Result<Self::Pipeline>;

    /// Creates a vertex buffer and uploads `contents` in full.
    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<Self::Buffer>;

    fn destroy_buffer(&self, buffer: &Self::Buffer);

    /// Acquires the next frame target.
    ///
    /// `Ok(None)` means the frame should be skipped (surface reconfigured or
    /// timed out); errors are not recoverable.
    fn acquire_frame(&mut self) -> Result<Option<Self::Frame>>;

    /// Opens one clear-then-store render pass on `frame` and hands it to `record`.
    fn encode_pass(
        &self,
        frame: &mut Self::Frame,
        clear: wgpu::Color,
        record: &mut dyn FnMut(&mut dyn PassRecorder<Self>),
    );

    /// Submits recorded commands and presents the frame.
    fn submit(&self, frame: Self::Frame);
}

/// Commands recorded inside a render pass.
pub trait PassRecorder<B: RenderBackend> {
    fn set_pipeline(&mut self, pipeline: &B::Pipeline);
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &B::Buffer);
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);
}
