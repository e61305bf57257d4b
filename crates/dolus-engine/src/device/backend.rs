use core::ops::Range;
use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::render::{PassRecorder, RenderBackend};
use crate::scene::PipelineConfig;

use super::{Gpu, GpuFrame, SurfaceErrorAction};

/// Compiles WGSL and checks the compilation info synchronously.
///
/// Errors are returned, warnings logged.
fn compile_wgsl(device: &wgpu::Device, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let mut errors = Vec::new();
    for msg in &info.messages {
        let line = msg.location.as_ref().map_or(0, |loc| loc.line_number);
        match msg.message_type {
            wgpu::CompilationMessageType::Error => {
                errors.push(format!("{label}:{line}: {}", msg.message));
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("{label}:{line}: {}", msg.message);
            }
            _ => {
                log::debug!("{label}:{line}: {}", msg.message);
            }
        }
    }

    if !errors.is_empty() {
        return Err(Error::ShaderCompilation(errors.join("\n")));
    }
    Ok(module)
}

/// Creates a vertex buffer sized to `contents` (rounded up to the copy
/// alignment) and queues the upload.
fn upload_vertex_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    contents: &[u8],
) -> wgpu::Buffer {
    let padded = pad_to_copy_alignment(contents);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: padded.len() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    if !padded.is_empty() {
        queue.write_buffer(&buffer, 0, &padded);
    }
    buffer
}

/// Buffer copies must be 4-byte aligned; the tail is padded with zeros.
fn pad_to_copy_alignment(contents: &[u8]) -> Cow<'_, [u8]> {
    let size = wgpu::util::align_to(contents.len() as u64, wgpu::COPY_BUFFER_ALIGNMENT) as usize;
    if size == contents.len() {
        return Cow::Borrowed(contents);
    }
    let mut padded = contents.to_vec();
    padded.resize(size, 0);
    Cow::Owned(padded)
}

impl<'w> RenderBackend for Gpu<'w> {
    type ShaderModule = wgpu::ShaderModule;
    type Pipeline = wgpu::RenderPipeline;
    type Buffer = wgpu::Buffer;
    type Frame = GpuFrame;

    fn compile_shader(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
        compile_wgsl(self.device(), label, source)
    }

    /// Validation failures surface through the device's uncaptured-error handler.
    fn create_pipeline(
        &self,
        label: &str,
        shader: &wgpu::ShaderModule,
        config: &PipelineConfig,
    ) -> Result<wgpu::RenderPipeline> {
        let format = config.target_format.unwrap_or(self.surface_format());

        let pipeline = self
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                // Bind group layouts are derived from the shader.
                layout: None,

                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some(config.vertex_entry.as_str()),
                    compilation_options: Default::default(),
                    buffers: &[config.vertex_layout.as_wgpu()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some(config.fragment_entry.as_str()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: config.topology,
                    ..Default::default()
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        Ok(pipeline)
    }

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Result<wgpu::Buffer> {
        Ok(upload_vertex_buffer(self.device(), self.queue(), label, contents))
    }

    fn destroy_buffer(&self, buffer: &wgpu::Buffer) {
        buffer.destroy();
    }

    fn acquire_frame(&mut self) -> Result<Option<GpuFrame>> {
        match self.acquire_frame_target() {
            Ok(frame) => Ok(Some(frame)),
            Err(err) => match self.handle_surface_error(&err) {
                SurfaceErrorAction::Fatal => Err(Error::SurfaceFatal(err.to_string())),
                action => {
                    log::debug!("frame skipped after surface error ({err}): {action:?}");
                    Ok(None)
                }
            },
        }
    }

    fn encode_pass(
        &self,
        frame: &mut GpuFrame,
        clear: wgpu::Color,
        record: &mut dyn FnMut(&mut dyn PassRecorder<Self>),
    ) {
        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("dolus frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        record(&mut rpass);
    }

    fn submit(&self, frame: GpuFrame) {
        Gpu::submit(self, frame);
    }
}

impl<'w> PassRecorder<Gpu<'w>> for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.slice(..));
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::context::log_uncaptured_errors;

    const PASS_THROUGH_WGSL: &str = r#"
@vertex
fn vertex_main(@location(0) position: vec4f) -> @builtin(position) vec4f {
    return position;
}

@fragment
fn fragment_main() -> @location(0) vec4f {
    return vec4f(1.0);
}
"#;

    fn noop_device() -> (wgpu::Device, wgpu::Queue) {
        let (device, queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());
        log_uncaptured_errors(&device);
        (device, queue)
    }

    #[test]
    fn aligned_contents_are_borrowed() {
        let data = [7u8; 8];
        assert!(matches!(pad_to_copy_alignment(&data), Cow::Borrowed(_)));
        assert!(pad_to_copy_alignment(&[]).is_empty());
    }

    #[test]
    fn unaligned_tail_is_zero_padded() {
        let padded = pad_to_copy_alignment(&[1, 2, 3, 4, 5]);
        assert_eq!(&*padded, &[1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn valid_wgsl_compiles() {
        let (device, _queue) = noop_device();
        compile_wgsl(&device, "pass-through", PASS_THROUGH_WGSL).unwrap();
    }

    #[test]
    fn wgsl_errors_become_shader_compilation_errors() {
        let (device, _queue) = noop_device();
        let err = compile_wgsl(&device, "broken", "fn vertex_main( {").unwrap_err();
        match err {
            Error::ShaderCompilation(msg) => assert!(msg.starts_with("broken:"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn vertex_buffer_size_is_rounded_up() {
        let (device, queue) = noop_device();
        let odd = upload_vertex_buffer(&device, &queue, "odd", &[0; 10]);
        let exact = upload_vertex_buffer(&device, &queue, "exact", &[0; 96]);
        let empty = upload_vertex_buffer(&device, &queue, "empty", &[]);

        assert_eq!(odd.size(), 12);
        assert_eq!(exact.size(), 96);
        assert_eq!(empty.size(), 0);
        assert!(odd.usage().contains(wgpu::BufferUsages::VERTEX));
    }
}
