//! HTTP retrieval of published objects through a NeoFS gateway.

use async_trait::async_trait;
use neofs_push_core::contract::ObjectFetcher;
use neofs_push_core::PublishError;

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PublishError> {
        tracing::debug!(url, "Fetching object over HTTP");
        let fetch_error = |e: reqwest::Error| PublishError::Fetch {
            url: url.to_owned(),
            message: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;
        let body = response.bytes().await.map_err(fetch_error)?;
        Ok(body.to_vec())
    }
}
