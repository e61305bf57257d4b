use super::handle::PipelineHandle;

/// Number of whole vertex records in a buffer.
///
/// Trailing bytes that do not form a full record are reported in `remainder`
/// and never drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexCount {
    pub count: u32,
    pub remainder: u64,
}

/// Derives the draw count as `byte_len / stride`.
///
/// A zero stride yields no vertices; counts beyond `u32::MAX` saturate.
pub fn vertex_count(byte_len: u64, stride: u64) -> VertexCount {
    if stride == 0 {
        return VertexCount {
            count: 0,
            remainder: byte_len,
        };
    }

    VertexCount {
        count: u32::try_from(byte_len / stride).unwrap_or(u32::MAX),
        remainder: byte_len % stride,
    }
}

/// Drawable instance: an owned vertex buffer plus the pipeline it is drawn with.
#[derive(Debug)]
pub struct SceneObject<B> {
    pub(crate) buffer: B,
    pub(crate) pipeline: PipelineHandle,
    pub(crate) byte_len: u64,
    pub(crate) vertex_count: u32,
}

impl<B> SceneObject<B> {
    #[inline]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    #[inline]
    pub fn pipeline(&self) -> PipelineHandle {
        self.pipeline
    }

    /// Size of the uploaded vertex data in bytes.
    #[inline]
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
