use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::upstream::{read_json, send_with_retry, UpstreamError};

const SERVICE: &str = "ibm-tone-analyzer";
const API_VERSION: &str = "2017-09-21";

/// Document-level tone analysis. The result is stored verbatim with the entry,
/// so its shape is whatever the provider returns.
#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Value, UpstreamError>;
}

/// IBM Watson Tone Analyzer v3, authenticated with an IAM API key.
pub struct IbmToneAnalyzer {
    client: Client,
    api_key: String,
    url: String,
}

impl IbmToneAnalyzer {
    pub fn new(client: Client, api_key: String, url: String) -> Self {
        Self {
            client,
            api_key,
            url: url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ToneAnalyzer for IbmToneAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}/v3/tone", self.url);
        let body = json!({ "text": text });
        let response = send_with_retry(SERVICE, || {
            self.client
                .post(&url)
                .query(&[("version", API_VERSION), ("sentences", "false")])
                .basic_auth("apikey", Some(&self.api_key))
                .json(&body)
        })
        .await?;
        read_json(SERVICE, response).await
    }
}
