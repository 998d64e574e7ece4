//! HTTP Peer Client
//!
//! Fetches values from another node over the peer protocol.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::error::{CacheError, Result};
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// [`PeerGetter`] for one peer, issuing `GET <base_url><group>/<key>`.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer URL joined with the base path, e.g. `http://10.0.0.2:8001/_geecache/`
    base_url: String,
    client: Client,
}

impl HttpGetter {
    // == Constructor ==
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Request URL for a key; group and key are percent-encoded.
    pub fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    #[instrument(skip(self), fields(peer = %self.base_url))]
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::PeerError(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(CacheError::PeerError(format!(
                "server returned {}: {}",
                status,
                body.trim()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::PeerError(format!("reading response body: {}", e)))?;
        debug!(bytes = body.len(), "peer responded");
        Ok(body.to_vec())
    }
}
