use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies the registry instance that issued a handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RegistryId(u32);

impl RegistryId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Marker for the kind of entity a handle refers to.
pub trait HandleKind {
    const NAME: &'static str;
}

/// Compiled shader programs.
#[derive(Debug)]
pub enum ShaderKind {}

/// Render pipelines.
#[derive(Debug)]
pub enum PipelineKind {}

/// Drawable objects.
#[derive(Debug)]
pub enum ObjectKind {}

impl HandleKind for ShaderKind {
    const NAME: &'static str = "shader";
}

impl HandleKind for PipelineKind {
    const NAME: &'static str = "pipeline";
}

impl HandleKind for ObjectKind {
    const NAME: &'static str = "object";
}

/// Stable reference to a registered entity.
///
/// The index equals the registry size at insertion time and is never reused.
/// The kind is checked at compile time; the issuing registry at lookup time.
pub struct Handle<K> {
    index: usize,
    registry: RegistryId,
    _kind: PhantomData<fn() -> K>,
}

pub type ShaderHandle = Handle<ShaderKind>;
pub type PipelineHandle = Handle<PipelineKind>;
pub type ObjectHandle = Handle<ObjectKind>;

impl<K> Handle<K> {
    #[inline]
    pub(crate) const fn new(index: usize, registry: RegistryId) -> Self {
        Self {
            index,
            registry,
            _kind: PhantomData,
        }
    }

    /// Zero-based insertion index.
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub const fn registry(self) -> RegistryId {
        self.registry
    }
}

// Manual impls: derives would require `K: Clone`, `K: Eq`, ...
impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.registry == other.registry
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.registry.hash(state);
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", K::NAME, self.index, self.registry.0)
    }
}
