/// Failures while bringing up the GPU context.
///
/// All variants are fatal to initialization. Acquisition is not retried.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The platform exposes no GPU capability for the given window.
    #[error("GPU rendering is not supported on this platform")]
    UnsupportedPlatform(#[source] wgpu::CreateSurfaceError),

    /// GPU capability exists but no physical adapter could be obtained.
    #[error("no GPU adapter available")]
    NoAdapterAvailable(#[source] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue")]
    DeviceRequest(#[source] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("window has zero size ({width}x{height})")]
    ZeroSizedSurface { width: u32, height: u32 },
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
