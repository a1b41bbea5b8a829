pub mod assessment;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::assistant::handlers as assistant;
use crate::fitness::handlers as fitness;
use crate::journal::handlers as journal;
use crate::state::AppState;

/// Voice notes arrive as uncompressed WAV from the browser recorder.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // One-off analysis
        .route("/analyze-text", post(analysis::handle_analyze_text))
        .route("/analyze-voice", post(analysis::handle_analyze_voice))
        // Journal
        .route("/save-journal-entry", post(journal::handle_save_journal_entry))
        .route("/api/journal-entries", get(journal::handle_list_entries))
        .route("/api/wellbeing-score", get(journal::handle_latest_score))
        .route(
            "/api/wellbeing-scores-last-7-days",
            get(journal::handle_last_seven_days),
        )
        .route(
            "/analyze-activity-impact",
            post(journal::handle_activity_impact),
        )
        // Wearables
        .route("/analyze-Garmin", post(fitness::handle_analyze_garmin))
        // Companion
        .route(
            "/generate-questions",
            post(assistant::handle_generate_questions),
        )
        .route("/api/chat", post(assistant::handle_chat))
        // Static site forms
        .route(
            "/submit-assessment",
            post(assessment::handle_submit_assessment),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
