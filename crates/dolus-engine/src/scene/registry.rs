use core::marker::PhantomData;

use crate::error::{Error, Result};

use super::handle::{Handle, HandleKind, RegistryId};

/// Append-only arena addressed by typed handles.
///
/// Performance characteristics:
/// - `insert()` is amortized O(1)
/// - `get()` is O(1)
/// - iteration is in insertion order
#[derive(Debug)]
pub struct Registry<K, T> {
    id: RegistryId,
    items: Vec<T>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind, T> Registry<K, T> {
    pub fn new() -> Self {
        Self {
            id: RegistryId::next(),
            items: Vec::new(),
            _kind: PhantomData,
        }
    }

    #[inline]
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// Appends `item` and returns its handle (the collection size before insertion).
    pub fn insert(&mut self, item: T) -> Handle<K> {
        let handle = Handle::new(self.items.len(), self.id);
        self.items.push(item);
        handle
    }

    /// Resolves a handle issued by this registry.
    pub fn get(&self, handle: Handle<K>) -> Result<&T> {
        if handle.registry() != self.id {
            return Err(Self::invalid(handle));
        }
        self.items
            .get(handle.index())
            .ok_or_else(|| Self::invalid(handle))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates entries with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<K>, &T)> + '_ {
        let id = self.id;
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (Handle::new(i, id), item))
    }

    /// Consumes the registry, yielding entries in insertion order.
    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.items.into_iter()
    }

    fn invalid(handle: Handle<K>) -> Error {
        Error::InvalidHandle {
            kind: K::NAME,
            index: handle.index(),
        }
    }
}

impl<K: HandleKind, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
