use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Gpu, GpuInit};
use crate::error::{Error, Result};
use crate::render::{self, FrameOutcome, RenderBackend};
use crate::scene::{ObjectHandle, PipelineConfig, PipelineHandle, Scene, ShaderHandle};

/// Clear color applied at the start of every frame by default.
pub const DEFAULT_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.5,
    b: 1.0,
    a: 1.0,
};

/// Program-level configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub clear_color: wgpu::Color,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

/// A GPU context plus the scene registered against it.
///
/// The program starts uninitialized. Every registry and render method fails
/// with [`Error::NotInitialized`] until a backend is attached (see
/// [`Program::init`] for the wgpu path).
pub struct Program<B: RenderBackend> {
    config: ProgramConfig,
    backend: Option<B>,
    scene: Scene<B>,
}

impl<B: RenderBackend> Program<B> {
    pub fn new(config: ProgramConfig) -> Self {
        Self {
            config,
            backend: None,
            scene: Scene::new(),
        }
    }

    /// Attaches an already-initialized backend.
    pub fn attach(&mut self, backend: B) -> Result<()> {
        if self.backend.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        self.backend = Some(backend);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Result<&B> {
        self.backend.as_ref().ok_or(Error::NotInitialized)
    }

    pub fn scene(&self) -> &Scene<B> {
        &self.scene
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.config.clear_color
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.config.clear_color = color;
    }

    /// Compiles WGSL source; returns its handle.
    pub fn register_shader_program(&mut self, source: &str) -> Result<ShaderHandle> {
        let backend = self.backend.as_ref().ok_or(Error::NotInitialized)?;
        self.scene.register_shader(backend, source)
    }

    pub fn create_pipeline(&mut self, config: &PipelineConfig) -> Result<PipelineHandle> {
        let backend = self.backend.as_ref().ok_or(Error::NotInitialized)?;
        self.scene.create_pipeline(backend, config)
    }

    /// Uploads raw vertex bytes once; the object is drawn with `pipeline`.
    pub fn load_object(&mut self, vertex_data: &[u8], pipeline: PipelineHandle) -> Result<ObjectHandle> {
        let backend = self.backend.as_ref().ok_or(Error::NotInitialized)?;
        self.scene.load_object(backend, vertex_data, pipeline)
    }

    /// Typed variant of [`load_object`](Self::load_object).
    pub fn load_vertices<V: bytemuck::Pod>(
        &mut self,
        vertices: &[V],
        pipeline: PipelineHandle,
    ) -> Result<ObjectHandle> {
        self.load_object(bytemuck::cast_slice(vertices), pipeline)
    }

    /// Clears the frame target and draws every object in registration order.
    pub fn render_frame(&mut self) -> Result<FrameOutcome> {
        let backend = self.backend.as_mut().ok_or(Error::NotInitialized)?;
        render::render_frame(backend, &self.scene, self.config.clear_color)
    }

    /// Releases scene buffers, then the backend.
    ///
    /// The program is left uninitialized with an empty scene.
    pub fn release(&mut self) {
        let scene = std::mem::take(&mut self.scene);
        match self.backend.take() {
            Some(backend) => {
                scene.release(&backend);
                log::debug!("GPU context released");
            }
            None => drop(scene),
        }
    }
}

impl<B: RenderBackend> Default for Program<B> {
    fn default() -> Self {
        Self::new(ProgramConfig::default())
    }
}

impl<'w> Program<Gpu<'w>> {
    /// Initializes the GPU context against `window`.
    ///
    /// Must complete before any registration.
    pub async fn init(&mut self, window: &'w Window, init: GpuInit) -> Result<()> {
        if self.backend.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        let gpu = Gpu::new(window, init).await?;
        self.attach(gpu)
    }

    pub fn surface_format(&self) -> Result<wgpu::TextureFormat> {
        Ok(self.backend()?.surface_format())
    }

    /// Reconfigures the surface; ignored before initialization.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(gpu) = self.backend.as_mut() {
            gpu.resize(new_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Call, RecordingBackend};
    use crate::scene::VertexLayout;

    const TRIANGLE_WGSL: &str = r#"
struct VertexOut {
    @builtin(position) position: vec4f,
    @location(0) color: vec4f,
}

@vertex
fn vertex_main(@location(0) position: vec4f, @location(1) color: vec4f) -> VertexOut {
    return VertexOut(position, color);
}

@fragment
fn fragment_main(fragment_data: VertexOut) -> @location(0) vec4f {
    return fragment_data.color;
}
"#;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 4],
        color: [f32; 4],
    }

    const TRIANGLE: [Vertex; 3] = [
        Vertex { position: [0.0, 0.6, 0.0, 1.0], color: [1.0, 0.0, 0.0, 1.0] },
        Vertex { position: [-0.5, -0.6, 0.0, 1.0], color: [0.0, 1.0, 0.0, 1.0] },
        Vertex { position: [0.5, -0.6, 0.0, 1.0], color: [0.0, 0.0, 1.0, 1.0] },
    ];

    fn demo_layout() -> VertexLayout {
        VertexLayout::new(32)
            .attribute(0, 0, wgpu::VertexFormat::Float32x4)
            .attribute(1, 16, wgpu::VertexFormat::Float32x4)
    }

    fn initialized() -> Program<RecordingBackend> {
        let mut program = Program::default();
        program.attach(RecordingBackend::default()).unwrap();
        program
    }

    #[test]
    fn registry_methods_fail_before_init() {
        let mut program: Program<RecordingBackend> = Program::default();
        assert!(!program.is_initialized());

        assert!(matches!(
            program.register_shader_program(TRIANGLE_WGSL),
            Err(Error::NotInitialized)
        ));

        // Handles from another (initialized) program still hit the precondition first.
        let mut other = initialized();
        let shader = other.register_shader_program(TRIANGLE_WGSL).unwrap();
        let pipeline = other
            .create_pipeline(&PipelineConfig::new(shader, demo_layout()))
            .unwrap();

        assert!(matches!(
            program.create_pipeline(&PipelineConfig::new(shader, demo_layout())),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(
            program.load_object(&[0; 96], pipeline),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(program.render_frame(), Err(Error::NotInitialized)));
        assert_eq!(program.scene().shader_count(), 0);
    }

    #[test]
    fn attach_twice_is_rejected() {
        let mut program = initialized();
        assert!(matches!(
            program.attach(RecordingBackend::default()),
            Err(Error::AlreadyInitialized)
        ));
    }

    #[test]
    fn triangle_end_to_end() {
        let mut program = initialized();

        let shader = program.register_shader_program(TRIANGLE_WGSL).unwrap();
        let pipeline = program
            .create_pipeline(&PipelineConfig::new(shader, demo_layout()))
            .unwrap();
        let object = program.load_vertices(&TRIANGLE, pipeline).unwrap();
        assert_eq!(program.scene().object(object).unwrap().byte_len(), 96);

        let outcome = program.render_frame().unwrap();
        assert_eq!(outcome, FrameOutcome::Presented { draw_calls: 1 });

        let calls = program.backend().unwrap().calls();
        assert_eq!(
            calls,
            vec![
                Call::CompileShader { id: 0 },
                Call::CreatePipeline { id: 0, shader: 0, stride: 32 },
                Call::CreateBuffer { id: 0, len: 96 },
                Call::AcquireFrame,
                Call::BeginPass { clear: DEFAULT_CLEAR_COLOR },
                Call::SetPipeline(0),
                Call::SetVertexBuffer { slot: 0, buffer: 0 },
                Call::Draw { vertices: 0..3, instances: 0..1 },
                Call::EndPass,
                Call::Submit,
            ]
        );
    }

    #[test]
    fn clear_color_is_configurable() {
        let mut program = initialized();
        let red = wgpu::Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
        program.set_clear_color(red);

        program.render_frame().unwrap();

        let calls = program.backend().unwrap().calls();
        assert!(calls.contains(&Call::BeginPass { clear: red }));
    }

    #[test]
    fn each_frame_redraws_every_object() {
        let mut program = initialized();
        let shader = program.register_shader_program(TRIANGLE_WGSL).unwrap();
        let pipeline = program
            .create_pipeline(&PipelineConfig::new(shader, demo_layout()))
            .unwrap();
        program.load_vertices(&TRIANGLE, pipeline).unwrap();
        program.load_vertices(&TRIANGLE[..2], pipeline).unwrap();

        for _ in 0..3 {
            assert_eq!(
                program.render_frame().unwrap(),
                FrameOutcome::Presented { draw_calls: 2 }
            );
        }

        let calls = program.backend().unwrap().calls();
        let submits = calls.iter().filter(|c| **c == Call::Submit).count();
        assert_eq!(submits, 3);
    }

    #[test]
    fn empty_vertex_data_renders_without_drawing() {
        let mut program = initialized();
        let shader = program.register_shader_program(TRIANGLE_WGSL).unwrap();
        let pipeline = program
            .create_pipeline(&PipelineConfig::new(shader, demo_layout()))
            .unwrap();
        let object = program.load_object(&[], pipeline).unwrap();
        assert_eq!(program.scene().object(object).unwrap().vertex_count(), 0);

        for _ in 0..2 {
            assert_eq!(
                program.render_frame().unwrap(),
                FrameOutcome::Presented { draw_calls: 0 }
            );
        }
    }

    #[test]
    fn release_returns_to_uninitialized() {
        let mut program = initialized();
        let shader = program.register_shader_program(TRIANGLE_WGSL).unwrap();
        let pipeline = program
            .create_pipeline(&PipelineConfig::new(shader, demo_layout()))
            .unwrap();
        program.load_vertices(&TRIANGLE, pipeline).unwrap();

        program.release();

        assert!(!program.is_initialized());
        assert_eq!(program.scene().object_count(), 0);
        assert!(matches!(program.render_frame(), Err(Error::NotInitialized)));
    }
}
