use crate::descriptor::{DEFAULT_SCALE, UrlFetcher};
use crate::{Decode, Fetch, HttpFetcher, RawDecoder};
use common::CacheConfig;
use common::data::Scaled;
use common::error::{Error, Result};
use once_cell::sync::OnceCell;
use reqwest::Url;
use std::sync::Arc;
use storage::{ResourceCache, ResourceHandle};
use tracing::info;

pub type ImageCache = UrlCache<HttpFetcher, RawDecoder>;

static IMAGE_CACHE: OnceCell<ImageCache> = OnceCell::new();

/// The process-wide cache, built from the environment on first use.
pub fn image_cache() -> Result<&'static ImageCache> {
    IMAGE_CACHE.get_or_try_init(|| {
        let config = CacheConfig::from_env()?;
        info!(maximum_size = config.maximum_size, "initializing image cache");
        ImageCache::from_config(&config)
    })
}

/// [`ResourceCache`] keyed by `(url, scale)` requests that share one pair of
/// fetch/decode collaborators.
pub struct UrlCache<F: Fetch, D: Decode> {
    cache:  ResourceCache<UrlFetcher<F, D>>,
    fetch:  Arc<F>,
    decode: Arc<D>,
}

impl ImageCache {
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let fetch = HttpFetcher::from_config(config)?;
        Ok(Self::with_collaborators(config, fetch, RawDecoder))
    }
}

impl<F: Fetch, D: Decode> UrlCache<F, D> {
    pub fn with_collaborators(config: &CacheConfig, fetch: F, decode: D) -> Self {
        Self {
            cache:  ResourceCache::from_config(config),
            fetch:  Arc::new(fetch),
            decode: Arc::new(decode),
        }
    }

    /// Validates the arguments and builds the request for them.
    ///
    /// The url is normalized, so spellings that parse to the same url share
    /// an entry. The scale has to be finite and positive.
    pub fn descriptor(&self, url: &str, scale: f64) -> Result<UrlFetcher<F, D>> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}").into()))?;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScale(scale));
        }
        Ok(UrlFetcher::new(
            url.as_str().to_owned(),
            scale,
            Arc::clone(&self.fetch),
            Arc::clone(&self.decode),
        ))
    }

    /// [`Self::load_scaled`] at [`DEFAULT_SCALE`].
    pub fn load(&self, url: &str) -> Result<ResourceHandle<Scaled<D::Output>>> {
        self.load_scaled(url, DEFAULT_SCALE)
    }

    /// Returns the handle for `url` at `scale`.
    ///
    /// Only invalid arguments produce an `Err`, and they do so before the
    /// cache is touched. Fetch and decode failures show up as an absent
    /// outcome on the handle.
    pub fn load_scaled(&self, url: &str, scale: f64) -> Result<ResourceHandle<Scaled<D::Output>>> {
        let descriptor = self.descriptor(url, scale)?;
        Ok(self.cache.load_provider(descriptor))
    }

    pub fn load_provider(&self, descriptor: UrlFetcher<F, D>) -> ResourceHandle<Scaled<D::Output>> {
        self.cache.load_provider(descriptor)
    }

    #[inline]
    pub fn maximum_size(&self) -> usize {
        self.cache.maximum_size()
    }

    pub fn set_maximum_size(&self, maximum_size: usize) {
        self.cache.set_maximum_size(maximum_size);
    }

    #[inline]
    pub fn cache(&self) -> &ResourceCache<UrlFetcher<F, D>> {
        &self.cache
    }
}
