//! Capability handles for the external ML services.
//!
//! Every model the app relies on sits behind a trait so handlers never know
//! which provider answers. The production implementations call the Hugging
//! Face inference API (`HfInferenceClient`) and IBM tone analysis; tests use
//! in-process stubs.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::upstream::{read_json, send_with_retry, UpstreamError};

pub mod audio;
pub mod text_emotion;
pub mod tone;

pub use audio::{AudioEmotionClassifier, HfAudioEmotionClassifier, HfTranscriber, Transcriber};
pub use text_emotion::{EmotionClassifier, HfTextEmotionClassifier};
pub use tone::{IbmToneAnalyzer, ToneAnalyzer};

pub(crate) const HF_SERVICE: &str = "huggingface";

/// One label/confidence pair as returned by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub score: f64,
}

#[cfg(test)]
impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Classification endpoints answer either `[{..}]` or `[[{..}]]` depending on
/// the task and parameters.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationPayload {
    Nested(Vec<Vec<EmotionScore>>),
    Flat(Vec<EmotionScore>),
}

impl ClassificationPayload {
    fn into_scores(self) -> Vec<EmotionScore> {
        match self {
            ClassificationPayload::Nested(batches) => {
                batches.into_iter().next().unwrap_or_default()
            }
            ClassificationPayload::Flat(scores) => scores,
        }
    }
}

/// Thin client for the hosted inference API. One instance is shared by all
/// Hugging Face backed capabilities.
#[derive(Clone)]
pub struct HfInferenceClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl HfInferenceClient {
    pub fn new(client: Client, base_url: String, api_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    pub async fn post_json<B, T>(&self, model: &str, body: &B) -> Result<T, UpstreamError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.model_url(model);
        let response = send_with_retry(HF_SERVICE, || {
            self.client
                .post(&url)
                .bearer_auth(&self.api_token)
                .json(body)
        })
        .await?;
        debug!("Inference call to {model} succeeded");
        read_json(HF_SERVICE, response).await
    }

    pub async fn post_bytes<T>(
        &self,
        model: &str,
        data: bytes::Bytes,
        content_type: &str,
    ) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let url = self.model_url(model);
        let response = send_with_retry(HF_SERVICE, || {
            self.client
                .post(&url)
                .bearer_auth(&self.api_token)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(data.clone())
        })
        .await?;
        debug!("Inference call to {model} succeeded");
        read_json(HF_SERVICE, response).await
    }

    pub(crate) async fn classify_json<B: Serialize + Sync>(
        &self,
        model: &str,
        body: &B,
    ) -> Result<Vec<EmotionScore>, UpstreamError> {
        let payload: ClassificationPayload = self.post_json(model, body).await?;
        Ok(payload.into_scores())
    }

    pub(crate) async fn classify_bytes(
        &self,
        model: &str,
        data: bytes::Bytes,
        content_type: &str,
    ) -> Result<Vec<EmotionScore>, UpstreamError> {
        let payload: ClassificationPayload = self.post_bytes(model, data, content_type).await?;
        Ok(payload.into_scores())
    }
}
