use common::CacheConfig;
use common::data::Response;
use common::error::Result;
use reqwest::Client as ReqwestClient;
use tracing::debug;

/// Transport collaborator: turns a url into a status code and a body.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: ReqwestClient,
}

impl HttpFetcher {
    pub fn new(client: ReqwestClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self::new(client))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Response> {
        let res = self.client.get(url).send().await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?;
        debug!(url, status, len = body.len(), "fetched");
        Ok(Response { status, body })
    }
}
