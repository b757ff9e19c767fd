use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use chef_core::error::LookupResult;
use chef_core::traits::Translator;

use crate::http::{build_client, send_json};

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Translator backed by a LibreTranslate-compatible `/translate` endpoint.
pub struct LibreTranslateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(&self, text: &str, source: &str, target: &str) -> LookupResult<String> {
        let body = TranslateRequest { q: text, source, target, format: "text", api_key: self.api_key.as_deref() };
        let request = self.http.post(format!("{}/translate", self.base_url)).json(&body);
        let resp: TranslateResponse = send_json(request).await?;
        Ok(resp.translated_text)
    }
}
