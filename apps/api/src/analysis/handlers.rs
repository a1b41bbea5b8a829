//! Axum route handlers for one-off analysis (nothing is persisted).

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::emotion::{aggregate_emotions, EmotionDistribution};
use crate::analysis::voice::{analyze_audio_emotions, AudioEmotionReport};
use crate::analysis::wellbeing::wellbeing_score;
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::read_multipart;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextResponse {
    pub averaged_emotions: EmotionDistribution,
    pub top_emotion: Option<String>,
    pub wellbeing_score: u32,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeVoiceResponse {
    pub transcription: String,
    pub audio_emotion_analysis: AudioEmotionReport,
}

/// POST /analyze-text
///
/// Empty text is valid and yields an empty distribution with the base score.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeTextResponse>, AppError> {
    let text = request
        .text
        .ok_or_else(|| AppError::Validation("No text provided".to_string()))?;

    let analysis = aggregate_emotions(&text, state.emotion_classifier.as_ref()).await?;
    let wellbeing_score = wellbeing_score(&analysis.averaged_emotions);

    Ok(Json(AnalyzeTextResponse {
        averaged_emotions: analysis.averaged_emotions,
        top_emotion: analysis.top_emotion,
        wellbeing_score,
    }))
}

/// POST /analyze-voice
///
/// The uploaded clip lives in a temp file owned by the parsed form; it is
/// removed when the form drops, whichever way this handler returns.
pub async fn handle_analyze_voice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeVoiceResponse>, AppError> {
    let form = read_multipart(multipart).await?;
    let clip = form
        .audio
        .as_ref()
        .ok_or_else(|| AppError::Validation("No audio file provided".to_string()))?;

    let transcription = state.transcriber.transcribe(clip).await?;
    let audio_emotion_analysis = analyze_audio_emotions(clip, &state.audio_classifiers).await?;

    info!(
        "Analyzed voice clip: {} transcript chars, top emotion {:?}",
        transcription.len(),
        audio_emotion_analysis.top_emotion
    );

    Ok(Json(AnalyzeVoiceResponse {
        transcription,
        audio_emotion_analysis,
    }))
}
