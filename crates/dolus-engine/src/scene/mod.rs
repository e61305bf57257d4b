//! Scene registry.
//!
//! Responsibilities:
//! - own compiled shaders, pipelines and drawable objects by typed handle
//! - keep registration order, which is also draw order
//! - record the per-frame draw sequence into a render pass

mod handle;
mod object;
mod pipeline;
mod registry;
mod store;

pub use handle::{
    Handle, HandleKind, ObjectHandle, ObjectKind, PipelineHandle, PipelineKind, RegistryId,
    ShaderHandle, ShaderKind,
};
pub use object::{vertex_count, SceneObject, VertexCount};
pub use pipeline::{PipelineConfig, VertexLayout};
pub use registry::Registry;
pub use store::{PipelineEntry, Scene};
