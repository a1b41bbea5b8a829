use std::sync::Arc;

use crate::analysis::activities::ActivityExtractor;
use crate::fitness::FitnessProvider;
use crate::inference::{AudioEmotionClassifier, EmotionClassifier, ToneAnalyzer, Transcriber};
use crate::journal::JournalLog;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator is a trait object built once in `main`, so the
/// router can be exercised end to end with in-process stubs.
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<JournalLog>,
    pub emotion_classifier: Arc<dyn EmotionClassifier>,
    /// Run in order on every clip; their outputs are averaged.
    pub audio_classifiers: Arc<[Arc<dyn AudioEmotionClassifier>]>,
    pub transcriber: Arc<dyn Transcriber>,
    /// Absent unless both IBM variables are set; entries then carry no tone.
    pub tone_analyzer: Option<Arc<dyn ToneAnalyzer>>,
    /// Default: KeywordActivityExtractor. Swap via ENABLE_LLM_ACTIVITY_EXTRACTION.
    pub activity_extractor: Arc<dyn ActivityExtractor>,
    pub fitness: Arc<dyn FitnessProvider>,
    pub llm: Arc<dyn TextGenerator>,
}
