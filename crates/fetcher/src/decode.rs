use bytes::Bytes;
use common::error::{Error, Result};

/// Decoding collaborator: turns a fetched body into the cached value.
pub trait Decode: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    fn decode(&self, body: Bytes) -> impl Future<Output = Result<Self::Output>> + Send;
}

/// Keeps the body as is. An empty body is not a usable resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl Decode for RawDecoder {
    type Output = Bytes;

    async fn decode(&self, body: Bytes) -> Result<Bytes> {
        if body.is_empty() {
            return Err(Error::Decode("empty body".into()));
        }
        Ok(body)
    }
}
