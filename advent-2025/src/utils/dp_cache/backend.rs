//! Storage backends for the DP cache.

use std::collections::HashMap;
use std::hash::Hash;

/// Where a [`DpCache`](super::DpCache) keeps computed values.
pub trait Backend<I, K> {
    /// Returns the cached value for `index`, if computed.
    fn get(&self, index: &I) -> Option<&K>;

    /// Stores the value for `index`, keeping an existing one.
    fn get_or_insert(&mut self, index: I, value: K) -> &K;
}

/// A Vec-based backend for dense `usize` indices.
///
/// Grows on demand to fit the largest index inserted.
#[derive(Debug)]
pub struct VecBackend<K> {
    data: Vec<Option<K>>,
}

impl<K> VecBackend<K> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Pre-sizes the backend for indices `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);
        Self { data }
    }
}

impl<K> Default for VecBackend<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Backend<usize, K> for VecBackend<K> {
    fn get(&self, index: &usize) -> Option<&K> {
        self.data.get(*index)?.as_ref()
    }

    fn get_or_insert(&mut self, index: usize, value: K) -> &K {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
        self.data[index].get_or_insert(value)
    }
}

/// A HashMap-based backend for sparse or non-integer indices.
#[derive(Debug)]
pub struct HashMapBackend<I, K> {
    data: HashMap<I, K>,
}

impl<I, K> HashMapBackend<I, K> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<I, K> Default for HashMapBackend<I, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Hash + Eq, K> Backend<I, K> for HashMapBackend<I, K> {
    fn get(&self, index: &I) -> Option<&K> {
        self.data.get(index)
    }

    fn get_or_insert(&mut self, index: I, value: K) -> &K {
        self.data.entry(index).or_insert(value)
    }
}
