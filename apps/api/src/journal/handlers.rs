use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::analysis::emotion::{aggregate_emotions, EmotionAnalysis};
use crate::analysis::impact::{rank_activity_impact, ActivityImpactReport};
use crate::analysis::voice::analyze_audio_emotions;
use crate::analysis::wellbeing::wellbeing_score;
use crate::errors::AppError;
use crate::journal::dashboard::{last_seven_scores, DailyScore};
use crate::journal::models::JournalEntry;
use crate::journal::submission::{JournalSource, JournalSubmission};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SaveJournalResponse {
    pub emotion_analysis: EmotionAnalysis,
    pub wellbeing_score: u32,
    pub identified_activities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_analysis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LatestScoreResponse {
    pub wellbeing_score: u32,
    pub timestamp: String,
}

/// POST /save-journal-entry
///
/// Every upstream call runs before the append, so a failed analysis leaves
/// the log untouched.
pub async fn handle_save_journal_entry(
    State(state): State<AppState>,
    submission: JournalSubmission,
) -> Result<Json<SaveJournalResponse>, AppError> {
    let (user_id, source) = submission.into_parts()?;

    let (content, tone_analysis, transcription) = match source {
        JournalSource::Audio(clip) => {
            let transcription = state.transcriber.transcribe(&clip).await?;
            let report = analyze_audio_emotions(&clip, &state.audio_classifiers).await?;
            let tone = serde_json::to_value(&report).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("failed to encode audio report: {e}"))
            })?;
            (transcription.clone(), Some(tone), Some(transcription))
        }
        JournalSource::Text(text) => {
            let tone = match &state.tone_analyzer {
                Some(analyzer) => Some(analyzer.analyze(&text).await?),
                None => None,
            };
            (text, tone, None)
        }
    };

    let emotion_analysis = aggregate_emotions(&content, state.emotion_classifier.as_ref()).await?;
    let score = wellbeing_score(&emotion_analysis.averaged_emotions);
    let activities = state.activity_extractor.extract(&content).await?;

    let entry = JournalEntry::new(user_id, content, activities, tone_analysis.as_ref(), score);
    state.journal.append(&entry).await?;

    Ok(Json(SaveJournalResponse {
        emotion_analysis,
        wellbeing_score: entry.wellbeing_score,
        identified_activities: entry.activities,
        tone_analysis,
        transcription,
    }))
}

/// GET /api/journal-entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    Ok(Json(state.journal.load().await?))
}

/// GET /api/wellbeing-score
pub async fn handle_latest_score(
    State(state): State<AppState>,
) -> Result<Json<LatestScoreResponse>, AppError> {
    let latest = state
        .journal
        .latest()
        .await?
        .ok_or_else(|| AppError::NotFound("No journal entries found".to_string()))?;

    Ok(Json(LatestScoreResponse {
        wellbeing_score: latest.wellbeing_score,
        timestamp: latest.timestamp,
    }))
}

/// GET /api/wellbeing-scores-last-7-days
pub async fn handle_last_seven_days(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyScore>>, AppError> {
    let entries = state.journal.load().await?;
    Ok(Json(last_seven_scores(&entries)))
}

/// POST /analyze-activity-impact
pub async fn handle_activity_impact(
    State(state): State<AppState>,
) -> Result<Json<ActivityImpactReport>, AppError> {
    let entries = state.journal.load().await?;
    let report = rank_activity_impact(&entries);
    info!(
        "Ranked {} activities over {} entries",
        report.ranked_activities.len(),
        entries.len()
    );
    Ok(Json(report))
}
