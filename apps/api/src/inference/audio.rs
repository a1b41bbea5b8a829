use async_trait::async_trait;
use serde::Deserialize;

use super::{EmotionScore, HfInferenceClient, HF_SERVICE};
use crate::upstream::UpstreamError;
use crate::upload::AudioUpload;

/// Emotion classifier that works on a recorded clip.
#[async_trait]
pub trait AudioEmotionClassifier: Send + Sync {
    /// Identifier reported alongside combined results.
    fn name(&self) -> &str;

    async fn classify(&self, clip: &AudioUpload) -> Result<Vec<EmotionScore>, UpstreamError>;
}

/// Speech-to-text for a recorded clip.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: &AudioUpload) -> Result<String, UpstreamError>;
}

async fn read_clip(clip: &AudioUpload) -> Result<bytes::Bytes, UpstreamError> {
    clip.read().await.map_err(|source| UpstreamError::Audio {
        service: HF_SERVICE,
        source,
    })
}

pub struct HfAudioEmotionClassifier {
    client: HfInferenceClient,
    model: String,
}

impl HfAudioEmotionClassifier {
    pub fn new(client: HfInferenceClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl AudioEmotionClassifier for HfAudioEmotionClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, clip: &AudioUpload) -> Result<Vec<EmotionScore>, UpstreamError> {
        let data = read_clip(clip).await?;
        self.client
            .classify_bytes(&self.model, data, clip.content_type())
            .await
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionPayload {
    text: String,
}

pub struct HfTranscriber {
    client: HfInferenceClient,
    model: String,
}

impl HfTranscriber {
    pub fn new(client: HfInferenceClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl Transcriber for HfTranscriber {
    async fn transcribe(&self, clip: &AudioUpload) -> Result<String, UpstreamError> {
        let data = read_clip(clip).await?;
        let payload: TranscriptionPayload = self
            .client
            .post_bytes(&self.model, data, clip.content_type())
            .await?;
        Ok(payload.text.trim().to_string())
    }
}
