use async_trait::async_trait;
use serde_json::json;

use super::{EmotionScore, HfInferenceClient};
use crate::upstream::UpstreamError;

/// Multi-label emotion classifier for a single sentence.
///
/// Implementations return one score per label in the model's own output
/// order; that order feeds the top-emotion tie-break.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, sentence: &str) -> Result<Vec<EmotionScore>, UpstreamError>;
}

/// Text emotion model hosted on the Hugging Face inference API.
pub struct HfTextEmotionClassifier {
    client: HfInferenceClient,
    model: String,
}

impl HfTextEmotionClassifier {
    pub fn new(client: HfInferenceClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl EmotionClassifier for HfTextEmotionClassifier {
    async fn classify(&self, sentence: &str) -> Result<Vec<EmotionScore>, UpstreamError> {
        let body = json!({
            "inputs": sentence,
            "parameters": { "top_k": 32 },
            "options": { "wait_for_model": true }
        });
        self.client.classify_json(&self.model, &body).await
    }
}
