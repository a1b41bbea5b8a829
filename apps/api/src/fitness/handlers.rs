use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::fitness::{analyze_fitness, FitnessQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeGarminRequest {
    pub request_type: Option<i64>,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
    pub custom_query: Option<String>,
}

/// POST /analyze-Garmin
pub async fn handle_analyze_garmin(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeGarminRequest>,
) -> Result<Json<Value>, AppError> {
    let request_type = req
        .request_type
        .ok_or_else(|| AppError::Validation("Missing requestType".to_string()))?;
    let query = FitnessQuery::from_request_type(request_type, req.custom_query)?;
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());

    let response = analyze_fitness(&query, date, state.fitness.as_ref(), state.llm.as_ref()).await?;
    Ok(Json(response))
}
