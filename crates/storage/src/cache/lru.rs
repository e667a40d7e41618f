use hashlink::LinkedHashMap;
use std::{borrow::Borrow, hash::Hash};
use tracing::debug;

/// A map that remembers the order in which keys were last touched and never
/// holds more than `maximum_size` entries.
///
/// The front of the underlying list is the least recently used entry, the
/// back the most recently used one. Both [`LruMap::get`] and
/// [`LruMap::get_or_insert_with`] move the touched key to the back.
pub struct LruMap<K, V> {
    entries:      LinkedHashMap<K, V>,
    maximum_size: usize,
}

impl<K: Hash + Eq, V> LruMap<K, V> {
    pub fn new(maximum_size: usize) -> Self {
        Self {
            entries: LinkedHashMap::new(),
            maximum_size,
        }
    }

    /// Looks `key` up and marks it as most recently used on a hit.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.to_back(key).map(|v| &*v)
    }

    /// Returns the value stored for `key`, inserting `factory(&key)` first if
    /// there is none.
    ///
    /// `factory` runs only on a miss. A fresh entry goes in as most recently
    /// used, after which least recently used entries are evicted until the
    /// bound holds again. With a bound of 0 the fresh entry is evicted right
    /// away but its value is still returned.
    pub fn get_or_insert_with<F>(&mut self, key: K, factory: F) -> V
    where
        V: Clone,
        F: FnOnce(&K) -> V,
    {
        if let Some(value) = self.entries.to_back(&key) {
            return value.clone();
        }

        let value = factory(&key);
        self.entries.insert(key, value.clone());
        self.evict_over(self.maximum_size);
        value
    }

    /// Drops the entry for `key` without running any eviction.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Presence check that leaves the recency order alone.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn maximum_size(&self) -> usize {
        self.maximum_size
    }

    /// Changes the bound. Shrinking evicts least recently used entries right
    /// away, growing never evicts. Returns how many entries were evicted.
    pub fn set_maximum_size(&mut self, maximum_size: usize) -> usize {
        self.maximum_size = maximum_size;
        self.evict_over(maximum_size)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    fn evict_over(&mut self, bound: usize) -> usize {
        let mut evicted = 0;
        while self.entries.len() > bound {
            if self.entries.pop_front().is_none() {
                break;
            }
            evicted += 1;
        }
        if evicted > 0 {
            debug!(
                evicted,
                len = self.entries.len(),
                maximum_size = bound,
                "evicted least recently used entries"
            );
        }
        evicted
    }
}
