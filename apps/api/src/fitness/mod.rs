//! Wearable (Garmin) data: fetch one day's metric, pick the useful fields, and
//! ask the generative model for feedback on them.
//!
//! Garmin Connect has no public API, so the provider talks to an HTTP bridge
//! configured with GARMIN_API_URL that exposes the raw Garmin JSON per day.

pub mod extract;
pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::fitness::extract::{activity_summary, heart_rate_summary, sleep_summary, stress_level};
use crate::llm_client::prompts::COMPANION_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::upstream::{read_json, send_with_retry, UpstreamError};

pub const GARMIN_SERVICE: &str = "garmin";

/// What the caller wants to know about their day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitnessQuery {
    Sleep,
    HeartRate,
    Activity,
    Stress,
    /// Free-form question answered by the model alone.
    Custom(String),
}

impl FitnessQuery {
    /// 1 sleep, 2 heart rate, 3 activity, 4 stress; any other code is a
    /// custom question and needs `custom_query`.
    pub fn from_request_type(
        request_type: i64,
        custom_query: Option<String>,
    ) -> Result<Self, AppError> {
        match request_type {
            1 => Ok(FitnessQuery::Sleep),
            2 => Ok(FitnessQuery::HeartRate),
            3 => Ok(FitnessQuery::Activity),
            4 => Ok(FitnessQuery::Stress),
            _ => custom_query
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .map(FitnessQuery::Custom)
                .ok_or_else(|| {
                    AppError::Validation("customQuery is required for custom requests".to_string())
                }),
        }
    }

    pub fn metric(&self) -> Option<FitnessMetric> {
        match self {
            FitnessQuery::Sleep => Some(FitnessMetric::Sleep),
            FitnessQuery::HeartRate => Some(FitnessMetric::HeartRate),
            FitnessQuery::Activity => Some(FitnessMetric::Activities),
            FitnessQuery::Stress => Some(FitnessMetric::Stress),
            FitnessQuery::Custom(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessMetric {
    Sleep,
    HeartRate,
    Activities,
    Stress,
}

impl FitnessMetric {
    pub fn path(self) -> &'static str {
        match self {
            FitnessMetric::Sleep => "sleep",
            FitnessMetric::HeartRate => "heart-rates",
            FitnessMetric::Activities => "activities",
            FitnessMetric::Stress => "stress",
        }
    }
}

/// Raw per-day wearable data, exactly as the device vendor shapes it.
#[async_trait]
pub trait FitnessProvider: Send + Sync {
    async fn fetch(&self, metric: FitnessMetric, date: NaiveDate) -> Result<Value, UpstreamError>;
}

/// `GET {base_url}/{metric}/{YYYY-MM-DD}` against the Garmin bridge.
pub struct GarminBridgeClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl GarminBridgeClient {
    pub fn new(client: Client, base_url: String, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }
}

#[async_trait]
impl FitnessProvider for GarminBridgeClient {
    async fn fetch(&self, metric: FitnessMetric, date: NaiveDate) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}/{}", self.base_url, metric.path(), date.format("%Y-%m-%d"));
        let response = send_with_retry(GARMIN_SERVICE, || {
            let request = self.client.get(&url);
            match &self.api_token {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        })
        .await?;
        read_json(GARMIN_SERVICE, response).await
    }
}

/// Stands in when GARMIN_API_URL is unset; custom questions still work.
pub struct UnconfiguredFitnessProvider;

#[async_trait]
impl FitnessProvider for UnconfiguredFitnessProvider {
    async fn fetch(
        &self,
        _metric: FitnessMetric,
        _date: NaiveDate,
    ) -> Result<Value, UpstreamError> {
        Err(UpstreamError::NotConfigured {
            service: GARMIN_SERVICE,
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, UpstreamError> {
    serde_json::to_value(value).map_err(|e| UpstreamError::parse(GARMIN_SERVICE, e.to_string()))
}

/// Runs one query and shapes the response the dashboard expects, keyed by
/// the metric's display name.
pub async fn analyze_fitness(
    query: &FitnessQuery,
    date: NaiveDate,
    provider: &dyn FitnessProvider,
    llm: &dyn TextGenerator,
) -> Result<Value, UpstreamError> {
    let raw = match query.metric() {
        Some(metric) => provider.fetch(metric, date).await?,
        None => Value::Null,
    };

    let response = match query {
        FitnessQuery::Sleep => {
            let summary = sleep_summary(raw)?;
            json!({ "Sleep": [to_json(&summary)?] })
        }
        FitnessQuery::HeartRate => {
            let summary = heart_rate_summary(raw)?;
            let feedback = llm
                .generate(&prompts::heart_rate_prompt(&to_json(&summary)?), COMPANION_SYSTEM)
                .await?;
            json!({ "Heart Rate": [to_json(&summary)?, feedback] })
        }
        FitnessQuery::Activity => {
            let summary = activity_summary(raw)?;
            let feedback = llm
                .generate(&prompts::activity_prompt(&to_json(&summary)?), COMPANION_SYSTEM)
                .await?;
            json!({ "Activity": [to_json(&summary)?, feedback] })
        }
        FitnessQuery::Stress => {
            let level = stress_level(raw)?;
            let feedback = llm
                .generate(&prompts::stress_prompt(level), COMPANION_SYSTEM)
                .await?;
            json!({ "Stress Level": [level, feedback] })
        }
        FitnessQuery::Custom(question) => {
            let feedback = llm
                .generate(&prompts::custom_prompt(question), COMPANION_SYSTEM)
                .await?;
            json!({ "Custom": feedback })
        }
    };

    info!("Answered fitness query {:?} for {}", query, date);
    Ok(response)
}
