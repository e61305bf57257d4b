use crate::error::Result;
use crate::render::{PassRecorder, RenderBackend};

use super::handle::{ObjectHandle, ObjectKind, PipelineHandle, PipelineKind, ShaderHandle, ShaderKind};
use super::object::{vertex_count, SceneObject};
use super::pipeline::PipelineConfig;
use super::registry::Registry;

/// A created pipeline together with the vertex stride it was built for.
#[derive(Debug)]
pub struct PipelineEntry<P> {
    pub pipeline: P,
    pub stride: u64,
}

/// Indexed collections of shaders, pipelines and objects for one backend.
///
/// Entities are append-only. The backend is passed explicitly to every
/// operation that talks to the GPU.
pub struct Scene<B: RenderBackend> {
    shaders: Registry<ShaderKind, B::ShaderModule>,
    pipelines: Registry<PipelineKind, PipelineEntry<B::Pipeline>>,
    objects: Registry<ObjectKind, SceneObject<B::Buffer>>,
}

impl<B: RenderBackend> Scene<B> {
    pub fn new() -> Self {
        Self {
            shaders: Registry::new(),
            pipelines: Registry::new(),
            objects: Registry::new(),
        }
    }

    /// Compiles WGSL `source` and registers the resulting module.
    pub fn register_shader(&mut self, backend: &B, source: &str) -> Result<ShaderHandle> {
        let label = format!("dolus shader #{}", self.shaders.len());
        let module = backend.compile_shader(&label, source)?;
        let handle = self.shaders.insert(module);
        log::debug!("registered {handle:?}");
        Ok(handle)
    }

    /// Builds a pipeline from `config`, resolving its shader handle.
    pub fn create_pipeline(&mut self, backend: &B, config: &PipelineConfig) -> Result<PipelineHandle> {
        config.validate()?;
        let shader = self.shaders.get(config.shader)?;

        let label = config
            .label
            .clone()
            .unwrap_or_else(|| format!("dolus pipeline #{}", self.pipelines.len()));
        let pipeline = backend.create_pipeline(&label, shader, config)?;

        let handle = self.pipelines.insert(PipelineEntry {
            pipeline,
            stride: config.vertex_layout.stride,
        });
        log::debug!("registered {handle:?} ({label})");
        Ok(handle)
    }

    /// Uploads `vertex_data` once into a new vertex buffer drawn with `pipeline`.
    pub fn load_object(
        &mut self,
        backend: &B,
        vertex_data: &[u8],
        pipeline: PipelineHandle,
    ) -> Result<ObjectHandle> {
        let stride = self.pipelines.get(pipeline)?.stride;
        let byte_len = vertex_data.len() as u64;
        let count = vertex_count(byte_len, stride);
        if count.remainder != 0 {
            log::warn!(
                "vertex data of {byte_len} bytes is not a multiple of stride {stride}; \
                 trailing {} bytes will not be drawn",
                count.remainder
            );
        }

        let label = format!("dolus object #{} vbo", self.objects.len());
        let buffer = backend.create_vertex_buffer(&label, vertex_data)?;

        let handle = self.objects.insert(SceneObject {
            buffer,
            pipeline,
            byte_len,
            vertex_count: count.count,
        });
        log::debug!("registered {handle:?}: {} vertices via {pipeline:?}", count.count);
        Ok(handle)
    }

    /// Records one draw per object, in registration order.
    ///
    /// Objects with no whole vertex are skipped: wgpu cannot bind an empty
    /// buffer slice. Returns the number of draw calls issued.
    pub fn record(&self, pass: &mut dyn PassRecorder<B>) -> usize {
        let mut draws = 0;

        for (handle, object) in self.objects.iter() {
            if object.vertex_count == 0 {
                log::trace!("{handle:?} has no vertices; skipped");
                continue;
            }

            // Object pipelines are resolved at load time; a miss means a broken invariant.
            let Ok(entry) = self.pipelines.get(object.pipeline) else {
                log::error!("{handle:?} references unknown {:?}; skipped", object.pipeline);
                continue;
            };

            pass.set_pipeline(&entry.pipeline);
            pass.set_vertex_buffer(0, &object.buffer);
            pass.draw(0..object.vertex_count, 0..1);
            draws += 1;
        }

        draws
    }

    /// Destroys every object's vertex buffer. Shaders and pipelines are dropped.
    pub fn release(self, backend: &B) {
        let Self {
            shaders,
            pipelines,
            objects,
        } = self;

        log::debug!(
            "releasing scene: {} shaders, {} pipelines, {} objects",
            shaders.len(),
            pipelines.len(),
            objects.len()
        );

        for object in objects.into_values() {
            backend.destroy_buffer(&object.buffer);
        }
    }

    pub fn shader(&self, handle: ShaderHandle) -> Result<&B::ShaderModule> {
        self.shaders.get(handle)
    }

    pub fn pipeline(&self, handle: PipelineHandle) -> Result<&PipelineEntry<B::Pipeline>> {
        self.pipelines.get(handle)
    }

    pub fn object(&self, handle: ObjectHandle) -> Result<&SceneObject<B::Buffer>> {
        self.objects.get(handle)
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl<B: RenderBackend> Default for Scene<B> {
    fn default() -> Self {
        Self::new()
    }
}
