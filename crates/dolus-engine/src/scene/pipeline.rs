use crate::error::{Error, Result};

use super::handle::ShaderHandle;

/// Layout of one interleaved, per-vertex buffer.
///
/// Objects are drawn with `byte_len / stride` vertices and a single instance,
/// so the buffer always steps per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    /// Size of one vertex record in bytes.
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// Per-vertex layout with no attributes yet.
    pub fn new(stride: u64) -> Self {
        Self {
            stride,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute read by the shader input at `location`.
    pub fn attribute(mut self, location: u32, offset: u64, format: wgpu::VertexFormat) -> Self {
        self.attributes.push(wgpu::VertexAttribute {
            format,
            offset,
            shader_location: location,
        });
        self
    }

    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(invalid("vertex stride must be non-zero"));
        }
        if self.attributes.is_empty() {
            return Err(invalid("vertex layout has no attributes"));
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            let end = attr.offset.checked_add(attr.format.size());
            if end.is_none_or(|end| end > self.stride) {
                return Err(invalid(format!(
                    "attribute @location({}) at offset {} ({} bytes) runs past stride {}",
                    attr.shader_location,
                    attr.offset,
                    attr.format.size(),
                    self.stride
                )));
            }
            if self.attributes[..i]
                .iter()
                .any(|a| a.shader_location == attr.shader_location)
            {
                return Err(invalid(format!(
                    "duplicate shader location {}",
                    attr.shader_location
                )));
            }
        }

        Ok(())
    }
}

/// Declarative render pipeline description.
///
/// Resource bindings are derived from shader reflection (`layout: auto`).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub label: Option<String>,
    pub shader: ShaderHandle,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub vertex_layout: VertexLayout,
    /// Color target format. `None` uses the surface format.
    pub target_format: Option<wgpu::TextureFormat>,
    pub topology: wgpu::PrimitiveTopology,
}

impl PipelineConfig {
    /// Triangle-list pipeline using `vertex_main` / `fragment_main` entry points.
    pub fn new(shader: ShaderHandle, vertex_layout: VertexLayout) -> Self {
        Self {
            label: None,
            shader,
            vertex_entry: "vertex_main".to_string(),
            fragment_entry: "fragment_main".to_string(),
            vertex_layout,
            target_format: None,
            topology: wgpu::PrimitiveTopology::TriangleList,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_entry_points(
        mut self,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        self.vertex_entry = vertex.into();
        self.fragment_entry = fragment.into();
        self
    }

    pub fn with_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = Some(format);
        self
    }

    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Rejects configs that wgpu would refuse, before any GPU call.
    pub fn validate(&self) -> Result<()> {
        if self.vertex_entry.is_empty() || self.fragment_entry.is_empty() {
            return Err(invalid("entry point names must be non-empty"));
        }
        self.vertex_layout.validate()
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidPipelineConfig(msg.into())
}
