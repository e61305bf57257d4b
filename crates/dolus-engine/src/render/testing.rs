//! In-memory backend that records every GPU call, for GPU-free tests.

use core::cell::{Cell, RefCell};
use core::ops::Range;

use crate::error::{Error, Result};
use crate::scene::PipelineConfig;

use super::{PassRecorder, RenderBackend};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CompileShader { id: u32 },
    CreatePipeline { id: u32, shader: u32, stride: u64 },
    CreateBuffer { id: u32, len: usize },
    DestroyBuffer(u32),
    AcquireFrame,
    BeginPass { clear: wgpu::Color },
    SetPipeline(u32),
    SetVertexBuffer { slot: u32, buffer: u32 },
    Draw { vertices: Range<u32>, instances: Range<u32> },
    EndPass,
    Submit,
}

/// Resources are plain ids, assigned per kind in creation order.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    next_shader: Cell<u32>,
    next_pipeline: Cell<u32>,
    next_buffer: Cell<u32>,
    buffer_lens: RefCell<Vec<usize>>,
    fail_shader: Cell<bool>,
    skip_frame: Cell<bool>,
    fail_frame: Cell<bool>,
}

impl RecordingBackend {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn fail_next_shader(&self) {
        self.fail_shader.set(true);
    }

    pub(crate) fn skip_next_frame(&self) {
        self.skip_frame.set(true);
    }

    pub(crate) fn fail_next_frame(&self) {
        self.fail_frame.set(true);
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn next_id(counter: &Cell<u32>) -> u32 {
    let id = counter.get();
    counter.set(id + 1);
    id
}

impl RenderBackend for RecordingBackend {
    type ShaderModule = u32;
    type Pipeline = u32;
    type Buffer = u32;
    type Frame = ();

    fn compile_shader(&self, _label: &str, _source: &str) -> Result<u32> {
        if self.fail_shader.replace(false) {
            return Err(Error::ShaderCompilation("1:1: unexpected token".to_string()));
        }
        let id = next_id(&self.next_shader);
        self.push(Call::CompileShader { id });
        Ok(id)
    }

    fn create_pipeline(&self, _label: &str, shader: &u32, config: &PipelineConfig) -> Result<u32> {
        let id = next_id(&self.next_pipeline);
        self.push(Call::CreatePipeline {
            id,
            shader: *shader,
            stride: config.vertex_layout.stride,
        });
        Ok(id)
    }

    fn create_vertex_buffer(&self, _label: &str, contents: &[u8]) -> Result<u32> {
        let id = next_id(&self.next_buffer);
        self.buffer_lens.borrow_mut().push(contents.len());
        self.push(Call::CreateBuffer {
            id,
            len: contents.len(),
        });
        Ok(id)
    }

    fn destroy_buffer(&self, buffer: &u32) {
        self.push(Call::DestroyBuffer(*buffer));
    }

    fn acquire_frame(&mut self) -> Result<Option<()>> {
        self.push(Call::AcquireFrame);
        if self.fail_frame.replace(false) {
            return Err(Error::SurfaceFatal("out of memory".to_string()));
        }
        if self.skip_frame.replace(false) {
            return Ok(None);
        }
        Ok(Some(()))
    }

    fn encode_pass(
        &self,
        _frame: &mut (),
        clear: wgpu::Color,
        record: &mut dyn FnMut(&mut dyn PassRecorder<Self>),
    ) {
        self.push(Call::BeginPass { clear });
        let mut pass = RecordingPass::new(self);
        record(&mut pass);
        self.calls.borrow_mut().extend(pass.calls);
        self.push(Call::EndPass);
    }

    fn submit(&self, _frame: ()) {
        self.push(Call::Submit);
    }
}

/// Mirrors wgpu's pass rules that matter to callers: binding an empty
/// buffer slice panics.
pub(crate) struct RecordingPass {
    pub(crate) calls: Vec<Call>,
    buffer_lens: Vec<usize>,
}

impl RecordingPass {
    pub(crate) fn new(backend: &RecordingBackend) -> Self {
        Self {
            calls: Vec::new(),
            buffer_lens: backend.buffer_lens.borrow().clone(),
        }
    }
}

impl PassRecorder<RecordingBackend> for RecordingPass {
    fn set_pipeline(&mut self, pipeline: &u32) {
        self.calls.push(Call::SetPipeline(*pipeline));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &u32) {
        let len = self.buffer_lens.get(*buffer as usize).copied().unwrap_or(0);
        assert!(len > 0, "buffer slices can not be empty");
        self.calls.push(Call::SetVertexBuffer {
            slot,
            buffer: *buffer,
        });
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.calls.push(Call::Draw {
            vertices,
            instances,
        });
    }
}
