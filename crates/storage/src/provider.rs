use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A request descriptor: identifies a logical resource and knows how to
/// produce it.
///
/// Equal descriptors must hash identically and are interchangeable as cache
/// keys, so neither may change while a descriptor sits in a cache.
/// `produce` is called at most once per cache entry; it does not have to be
/// idempotent.
pub trait Provider: Eq + Hash + Debug + Send + Sync + 'static {
    type Output: Send + Sync + 'static;
    type Error: Display + Send + 'static;

    /// Performs the side-effecting work. The returned future owns everything
    /// it needs, it outlives both the descriptor and the cache entry.
    fn produce(&self) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send + 'static;
}
