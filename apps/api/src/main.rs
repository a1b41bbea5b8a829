mod analysis;
mod assistant;
mod config;
mod errors;
mod fitness;
mod inference;
mod journal;
mod llm_client;
mod routes;
mod state;
mod upload;
mod upstream;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::activities::{
    ActivityExtractor, KeywordActivityExtractor, LlmActivityExtractor,
};
use crate::config::Config;
use crate::fitness::{FitnessProvider, GarminBridgeClient, UnconfiguredFitnessProvider};
use crate::inference::{
    AudioEmotionClassifier, HfAudioEmotionClassifier, HfInferenceClient, HfTextEmotionClassifier,
    HfTranscriber, IbmToneAnalyzer, ToneAnalyzer,
};
use crate::journal::JournalLog;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::upstream::http_client;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Serenity API v{}", env!("CARGO_PKG_VERSION"));

    // One pooled HTTP client for every collaborator, bounded by the upstream timeout
    let client = http_client(config.upstream_timeout)?;

    // Journal log
    let journal = Arc::new(JournalLog::new(&config.journal_log_path));
    journal.init().await?;

    // Hugging Face models
    let hf = HfInferenceClient::new(
        client.clone(),
        config.hf.api_url.clone(),
        config.hf.api_token.clone(),
    );
    let emotion_classifier = Arc::new(HfTextEmotionClassifier::new(
        hf.clone(),
        config.hf.text_emotion_model.clone(),
    ));
    let audio_classifiers: Vec<Arc<dyn AudioEmotionClassifier>> = config
        .hf
        .audio_emotion_models
        .iter()
        .map(|model| {
            Arc::new(HfAudioEmotionClassifier::new(hf.clone(), model.clone()))
                as Arc<dyn AudioEmotionClassifier>
        })
        .collect();
    let transcriber = Arc::new(HfTranscriber::new(hf.clone(), config.hf.asr_model.clone()));
    info!(
        "Inference models: text={}, audio={:?}, asr={}",
        config.hf.text_emotion_model, config.hf.audio_emotion_models, config.hf.asr_model
    );

    // Generative model
    let llm: Arc<dyn TextGenerator> =
        Arc::new(LlmClient::new(client.clone(), config.gemini_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Tone analysis is optional
    let tone_analyzer = config.tone_analyzer.as_ref().map(|tone| {
        Arc::new(IbmToneAnalyzer::new(
            client.clone(),
            tone.api_key.clone(),
            tone.url.clone(),
        )) as Arc<dyn ToneAnalyzer>
    });
    if tone_analyzer.is_none() {
        info!("Tone analyzer not configured; text entries are stored without tone");
    }

    // Activity extractor (keyword by default; swap via ENABLE_LLM_ACTIVITY_EXTRACTION)
    let activity_extractor: Arc<dyn ActivityExtractor> = if config.enable_llm_activity_extraction {
        info!("Using LLM activity extraction");
        Arc::new(LlmActivityExtractor(Arc::clone(&llm)))
    } else {
        Arc::new(KeywordActivityExtractor)
    };

    // Wearable data bridge
    let fitness: Arc<dyn FitnessProvider> = match &config.garmin {
        Some(garmin) => Arc::new(GarminBridgeClient::new(
            client.clone(),
            garmin.api_url.clone(),
            garmin.api_token.clone(),
        )),
        None => {
            warn!("GARMIN_API_URL not set; only custom fitness questions will be answered");
            Arc::new(UnconfiguredFitnessProvider)
        }
    };

    // Build app state
    let state = AppState {
        journal,
        emotion_classifier,
        audio_classifiers: audio_classifiers.into(),
        transcriber,
        tone_analyzer,
        activity_extractor,
        fitness,
        llm,
    };

    // Build router; anything unrouted is served from the static site
    let app = build_router(state)
        .fallback_service(ServeDir::new(&config.frontend_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
