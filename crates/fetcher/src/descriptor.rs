use crate::{decode::Decode, fetch::Fetch};
use common::data::Scaled;
use common::error::{Error, Result};
use faststr::FastStr;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use storage::Provider;

pub const DEFAULT_SCALE: f64 = 1.0;

/// Request for the resource at `url`, rendered at `scale`.
///
/// Identity is the `(url, scale)` pair; the collaborators are shared
/// plumbing and take no part in equality or hashing.
pub struct UrlFetcher<F, D> {
    url:    FastStr,
    scale:  f64,
    fetch:  Arc<F>,
    decode: Arc<D>,
}

impl<F, D> UrlFetcher<F, D> {
    /// Builds a descriptor from already validated parts. `scale` must be
    /// finite, see [`crate::UrlCache::descriptor`].
    pub fn new(url: impl Into<FastStr>, scale: f64, fetch: Arc<F>, decode: Arc<D>) -> Self {
        Self {
            url: url.into(),
            scale,
            fetch,
            decode,
        }
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl<F, D> Clone for UrlFetcher<F, D> {
    fn clone(&self) -> Self {
        Self {
            url:    self.url.clone(),
            scale:  self.scale,
            fetch:  Arc::clone(&self.fetch),
            decode: Arc::clone(&self.decode),
        }
    }
}

// Scale is compared bitwise so Eq and Hash agree.
impl<F, D> PartialEq for UrlFetcher<F, D> {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.scale.to_bits() == other.scale.to_bits()
    }
}

impl<F, D> Eq for UrlFetcher<F, D> {}

impl<F, D> Hash for UrlFetcher<F, D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
        self.scale.to_bits().hash(state);
    }
}

impl<F, D> Debug for UrlFetcher<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlFetcher")
            .field("url", &self.url)
            .field("scale", &self.scale)
            .finish()
    }
}

impl<F: Fetch, D: Decode> Provider for UrlFetcher<F, D> {
    type Error = Error;
    type Output = Scaled<D::Output>;

    fn produce(&self) -> impl Future<Output = Result<Self::Output>> + Send + 'static {
        let (url, scale) = (self.url.clone(), self.scale);
        let (fetch, decode) = (Arc::clone(&self.fetch), Arc::clone(&self.decode));
        async move {
            let response = fetch.fetch(&url).await?;
            if response.is_failure() {
                return Err(Error::Status(response.status));
            }
            let value = decode.decode(response.body).await?;
            Ok(Scaled::new(value, scale))
        }
    }
}
