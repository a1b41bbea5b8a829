use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_TEXT_EMOTION_MODEL: &str = "bhadresh-savani/distilbert-base-uncased-emotion";
const DEFAULT_AUDIO_EMOTION_MODELS: &str = "Hatman/audio-emotion-detection";
const DEFAULT_ASR_MODEL: &str = "openai/whisper-large-v3";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub journal_log_path: PathBuf,
    pub frontend_dir: PathBuf,
    pub upstream_timeout: Duration,
    pub hf: HuggingFaceConfig,
    pub gemini_api_key: String,
    /// Both IBM variables must be set for tone analysis to run.
    pub tone_analyzer: Option<ToneAnalyzerConfig>,
    pub garmin: Option<GarminConfig>,
    pub enable_llm_activity_extraction: bool,
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_url: String,
    pub api_token: String,
    pub text_emotion_model: String,
    pub audio_emotion_models: Vec<String>,
    pub asr_model: String,
}

#[derive(Debug, Clone)]
pub struct ToneAnalyzerConfig {
    pub api_key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct GarminConfig {
    pub api_url: String,
    pub api_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let upstream_timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?;

        let tone_analyzer = match (
            optional_env("IBM_TONE_ANALYZER_API_KEY"),
            optional_env("IBM_TONE_ANALYZER_URL"),
        ) {
            (Some(api_key), Some(url)) => Some(ToneAnalyzerConfig { api_key, url }),
            _ => None,
        };

        let garmin = optional_env("GARMIN_API_URL").map(|api_url| GarminConfig {
            api_url,
            api_token: optional_env("GARMIN_API_TOKEN"),
        });

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            journal_log_path: optional_env("JOURNAL_LOG_PATH")
                .unwrap_or_else(|| "journal_entries.csv".to_string())
                .into(),
            frontend_dir: optional_env("FRONTEND_DIR")
                .unwrap_or_else(|| "frontend".to_string())
                .into(),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            hf: HuggingFaceConfig {
                api_url: optional_env("HF_API_URL")
                    .unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
                api_token: require_env("HF_API_TOKEN")?,
                text_emotion_model: optional_env("HF_TEXT_EMOTION_MODEL")
                    .unwrap_or_else(|| DEFAULT_TEXT_EMOTION_MODEL.to_string()),
                audio_emotion_models: parse_list(
                    &optional_env("HF_AUDIO_EMOTION_MODELS")
                        .unwrap_or_else(|| DEFAULT_AUDIO_EMOTION_MODELS.to_string()),
                ),
                asr_model: optional_env("HF_ASR_MODEL")
                    .unwrap_or_else(|| DEFAULT_ASR_MODEL.to_string()),
            },
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            tone_analyzer,
            garmin,
            enable_llm_activity_extraction: optional_env("ENABLE_LLM_ACTIVITY_EXTRACTION")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
