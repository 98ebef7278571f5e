//! Fetching Company Snapshot pages from SAFER
//!
//! The service uses the async reqwest client; the CLI uses ureq so a
//! one-off lookup needs no runtime.

use std::future::Future;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::error::FetchError;
use crate::identifiers::LookupKey;

/// Build the snapshot URL for a lookup.
pub fn snapshot_url(base_url: &str, key: &LookupKey) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut()
        .clear()
        .append_pair("searchtype", "ANY")
        .append_pair("query_type", "queryCarrierSnapshot")
        .append_pair("query_param", key.query_param())
        .append_pair("query_string", key.digits());
    Ok(url)
}

/// Something that can produce the raw snapshot HTML for a lookup
pub trait SnapshotSource: Send + Sync {
    fn fetch_snapshot(
        &self,
        key: &LookupKey,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Async SAFER client used by the verification service
#[derive(Debug, Clone)]
pub struct SaferClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SaferClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.safer_base_url.clone(),
            timeout: config.timeout,
        })
    }
}

impl SnapshotSource for SaferClient {
    async fn fetch_snapshot(&self, key: &LookupKey) -> Result<String, FetchError> {
        let url = snapshot_url(&self.base_url, key)
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!(%url, "fetching SAFER snapshot");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        resp.text().await.map_err(|e| FetchError::from_reqwest(e, self.timeout))
    }
}

/// Fetch a snapshot with a blocking ureq agent.
pub fn fetch_snapshot_blocking(
    config: &ServiceConfig,
    key: &LookupKey,
) -> Result<String, FetchError> {
    let url = snapshot_url(&config.safer_base_url, key)
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build(),
    );

    let resp = agent
        .get(url.as_str())
        .call()
        .map_err(|e| FetchError::from_ureq(e, config.timeout))?;

    resp.into_body()
        .read_to_string()
        .map_err(|e| FetchError::Body(e.to_string()))
}
