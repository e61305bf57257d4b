use anyhow::Context;
use bytemuck::{Pod, Zeroable};

use dolus_engine::core::App;
use dolus_engine::device::{Gpu, GpuInit};
use dolus_engine::logging::{init_logging, LoggingConfig};
use dolus_engine::scene::{PipelineConfig, VertexLayout};
use dolus_engine::window::{Runtime, RuntimeConfig};
use dolus_engine::Program;

/// Interleaved position + color, 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 4],
    color: [f32; 4],
}

impl Vertex {
    fn layout() -> VertexLayout {
        VertexLayout::new(std::mem::size_of::<Vertex>() as u64)
            .attribute(0, 0, wgpu::VertexFormat::Float32x4)
            .attribute(1, 16, wgpu::VertexFormat::Float32x4)
    }
}

const TRIANGLE: [Vertex; 3] = [
    Vertex { position: [0.0, 0.6, 0.0, 1.0], color: [1.0, 0.0, 0.0, 1.0] },
    Vertex { position: [-0.5, -0.6, 0.0, 1.0], color: [0.0, 1.0, 0.0, 1.0] },
    Vertex { position: [0.5, -0.6, 0.0, 1.0], color: [0.0, 0.0, 1.0, 1.0] },
];

struct TriangleDemo;

impl App for TriangleDemo {
    fn setup(&mut self, program: &mut Program<Gpu<'_>>) -> anyhow::Result<()> {
        let shader = program
            .register_shader_program(include_str!("../shaders/triangle.wgsl"))
            .context("triangle shader")?;

        let pipeline = program.create_pipeline(
            &PipelineConfig::new(shader, Vertex::layout()).with_label("triangle pipeline"),
        )?;

        program.load_vertices(&TRIANGLE, pipeline)?;

        log::info!(
            "scene ready: {} object(s), surface format {:?}",
            program.scene().object_count(),
            program.surface_format()?
        );
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "dolus triangle".to_string(),
        ..Default::default()
    };

    Runtime::new(config, GpuInit::default()).run(TriangleDemo)
}
