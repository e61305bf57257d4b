use crate::device::InitError;

/// Errors returned by registry and render operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A registry method was called before the GPU context was attached.
    #[error("program is not initialized; call `init` before registering resources")]
    NotInitialized,

    #[error("program is already initialized")]
    AlreadyInitialized,

    /// The handle was never issued by this registry.
    #[error("invalid {kind} handle #{index}")]
    InvalidHandle { kind: &'static str, index: usize },

    #[error("invalid pipeline config: {0}")]
    InvalidPipelineConfig(String),

    #[error("shader compilation failed:\n{0}")]
    ShaderCompilation(String),

    /// Frame acquisition failed in a way the surface cannot recover from.
    #[error("surface error is not recoverable: {0}")]
    SurfaceFatal(String),

    #[error(transparent)]
    Init(#[from] InitError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
