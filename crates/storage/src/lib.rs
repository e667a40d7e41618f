mod cache;
mod handle;
mod provider;

pub use cache::LruMap;
pub use handle::{HandleState, Outcome, ResourceHandle};
pub use provider::Provider;

use common::{CacheConfig, config::DEFAULT_MAXIMUM_SIZE};
use parking_lot::Mutex;
use tracing::{debug, info, info_span};

/// Deduplicating LRU cache from descriptors to the handles of their
/// productions.
///
/// Every operation takes the internal lock for its whole
/// lookup/insert/evict step and never awaits while holding it.
pub struct ResourceCache<P: Provider> {
    entries: Mutex<LruMap<P, ResourceHandle<P::Output>>>,
}

impl<P: Provider> Default for ResourceCache<P> {
    fn default() -> Self {
        Self::new(DEFAULT_MAXIMUM_SIZE)
    }
}

impl<P: Provider> ResourceCache<P> {
    pub fn new(maximum_size: usize) -> Self {
        Self {
            entries: Mutex::new(LruMap::new(maximum_size)),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.maximum_size)
    }

    /// Returns the handle cached for `provider`, starting a new production if
    /// there is none. Never waits for the production.
    ///
    /// # Panics
    ///
    /// Panics on a miss when called outside of a tokio runtime.
    pub fn load_provider(&self, provider: P) -> ResourceHandle<P::Output> {
        let mut entries = self.entries.lock();
        let mut missed = false;
        let handle = entries.get_or_insert_with(provider, |provider| {
            missed = true;
            let span = info_span!("produce", ?provider);
            let _entered = span.enter();
            ResourceHandle::new(provider.produce())
        });
        debug!(
            hit = !missed,
            len = entries.len(),
            state = ?handle.state(),
            "load provider"
        );
        handle
    }

    #[inline]
    pub fn maximum_size(&self) -> usize {
        self.entries.lock().maximum_size()
    }

    /// Shrinking evicts least recently used entries immediately, down to an
    /// empty cache for 0. Handles already given out stay valid.
    pub fn set_maximum_size(&self, maximum_size: usize) {
        let evicted = self.entries.lock().set_maximum_size(maximum_size);
        info!(maximum_size, evicted, "cache maximum size changed");
    }

    /// Forgets the entry for `provider` so the next load produces it again.
    pub fn invalidate(&self, provider: &P) -> Option<ResourceHandle<P::Output>> {
        let removed = self.entries.lock().remove(provider);
        if removed.is_some() {
            debug!(?provider, "invalidated entry");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Does not count as a use of the entry.
    pub fn contains(&self, provider: &P) -> bool {
        self.entries.lock().contains_key(provider)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
