use std::time::Duration;

use chef_core::error::{LookupError, LookupResult};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("chef-recipes/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

pub(crate) fn classify(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout(e.to_string())
    } else if e.is_decode() {
        LookupError::Malformed(e.to_string())
    } else {
        LookupError::Network(e.to_string())
    }
}

/// Send a prepared request and decode a JSON body, mapping every failure to
/// a [`LookupError`].
pub(crate) async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> LookupResult<T> {
    let response = request.send().await.map_err(classify)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status { status: status.as_u16(), url: response.url().to_string() });
    }
    let body = response.text().await.map_err(classify)?;
    serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
}
