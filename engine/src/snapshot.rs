use crate::index::InvertedIndex;
use parking_lot::RwLock;
use std::sync::Arc;

/// Copy-on-write handle to the current index snapshot.
///
/// Readers grab an `Arc` and query it without coordination; a rebuild swaps
/// in a new snapshot atomically, so in-flight queries finish against the old
/// one. Snapshots are never mutated in place.
pub struct SharedIndex {
    inner: RwLock<Arc<InvertedIndex>>,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self {
        Self { inner: RwLock::new(Arc::new(index)) }
    }

    /// The current snapshot. Cheap; clones an `Arc`.
    pub fn load(&self) -> Arc<InvertedIndex> {
        self.inner.read().clone()
    }

    /// Publish a new snapshot, returning the one it replaced.
    pub fn swap(&self, index: InvertedIndex) -> Arc<InvertedIndex> {
        let mut guard = self.inner.write();
        std::mem::replace(&mut *guard, Arc::new(index))
    }
}
