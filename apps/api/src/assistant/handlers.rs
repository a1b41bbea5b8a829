use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::assistant::{chat_reply, generate_questions};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /generate-questions
///
/// Without text in the body, questions are about the newest journal entry.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let text = match req.text.filter(|t| !t.trim().is_empty()) {
        Some(text) => text,
        None => state
            .journal
            .latest()
            .await?
            .map(|entry| entry.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AppError::Validation("No text provided and no journal entries found".to_string())
            })?,
    };

    let questions = generate_questions(&text, state.llm.as_ref()).await?;
    Ok(Json(GenerateQuestionsResponse { questions }))
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("No message provided".to_string()))?;

    let latest_score = state.journal.latest().await?.map(|e| e.wellbeing_score);
    let response = chat_reply(&message, latest_score, state.llm.as_ref()).await?;
    Ok(Json(ChatResponse { response }))
}
