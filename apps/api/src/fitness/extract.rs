//! Field selection over raw Garmin payloads. Pure; a missing field means the
//! provider sent something we cannot summarise.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fitness::GARMIN_SERVICE;
use crate::upstream::UpstreamError;

fn decode<T: DeserializeOwned>(raw: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(raw).map_err(|e| UpstreamError::parse(GARMIN_SERVICE, e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub sleep_time_seconds: i64,
    pub sleep_start_timestamp_local: i64,
    pub sleep_end_timestamp_local: i64,
    pub deep_sleep_seconds: i64,
    pub light_sleep_seconds: i64,
    pub rem_sleep_seconds: i64,
    pub awake_sleep_seconds: i64,
    pub awake_count: i64,
    pub avg_sleep_stress: f64,
    pub sleep_score: i64,
}

#[derive(Deserialize)]
struct SleepPayload {
    #[serde(rename = "dailySleepDTO")]
    daily_sleep: DailySleep,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailySleep {
    sleep_time_seconds: i64,
    sleep_start_timestamp_local: i64,
    sleep_end_timestamp_local: i64,
    deep_sleep_seconds: i64,
    light_sleep_seconds: i64,
    rem_sleep_seconds: i64,
    awake_sleep_seconds: i64,
    awake_count: i64,
    avg_sleep_stress: f64,
    sleep_scores: SleepScores,
}

#[derive(Deserialize)]
struct SleepScores {
    overall: ScoreValue,
}

#[derive(Deserialize)]
struct ScoreValue {
    value: i64,
}

pub fn sleep_summary(raw: Value) -> Result<SleepSummary, UpstreamError> {
    let SleepPayload { daily_sleep: d } = decode(raw)?;
    Ok(SleepSummary {
        sleep_time_seconds: d.sleep_time_seconds,
        sleep_start_timestamp_local: d.sleep_start_timestamp_local,
        sleep_end_timestamp_local: d.sleep_end_timestamp_local,
        deep_sleep_seconds: d.deep_sleep_seconds,
        light_sleep_seconds: d.light_sleep_seconds,
        rem_sleep_seconds: d.rem_sleep_seconds,
        awake_sleep_seconds: d.awake_sleep_seconds,
        awake_count: d.awake_count,
        avg_sleep_stress: d.avg_sleep_stress,
        sleep_score: d.sleep_scores.overall.value,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSummary {
    pub max_heart_rate: i64,
    pub resting_heart_rate: i64,
    pub last_seven_days_avg_resting_heart_rate: i64,
    /// Today's resting rate minus the seven-day resting average.
    pub variation: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeartRatePayload {
    max_heart_rate: i64,
    resting_heart_rate: i64,
    last_seven_days_avg_resting_heart_rate: i64,
}

pub fn heart_rate_summary(raw: Value) -> Result<HeartRateSummary, UpstreamError> {
    let p: HeartRatePayload = decode(raw)?;
    Ok(HeartRateSummary {
        max_heart_rate: p.max_heart_rate,
        resting_heart_rate: p.resting_heart_rate,
        last_seven_days_avg_resting_heart_rate: p.last_seven_days_avg_resting_heart_rate,
        variation: p.resting_heart_rate - p.last_seven_days_avg_resting_heart_rate,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityDuration {
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub activities: Vec<ActivityDuration>,
    pub total_seconds: u64,
    pub calories: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GarminActivity {
    activity_name: String,
    activity_type: ActivityType,
    duration: f64,
    calories: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityType {
    type_key: String,
}

pub fn activity_summary(raw: Value) -> Result<ActivitySummary, UpstreamError> {
    let activities: Vec<GarminActivity> = decode(raw)?;

    let total: f64 = activities.iter().map(|a| a.duration).sum();
    let calories = activities.iter().map(|a| a.calories).sum();

    Ok(ActivitySummary {
        activities: activities
            .into_iter()
            .map(|a| ActivityDuration {
                name: a.activity_name,
                activity_type: a.activity_type.type_key,
                duration_seconds: a.duration,
            })
            .collect(),
        total_seconds: total.max(0.0).floor() as u64,
        calories,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StressPayload {
    avg_stress_level: i64,
}

pub fn stress_level(raw: Value) -> Result<i64, UpstreamError> {
    let p: StressPayload = decode(raw)?;
    Ok(p.avg_stress_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sleep_payload() -> Value {
        json!({
            "dailySleepDTO": {
                "id": 1741990000000i64,
                "sleepTimeSeconds": 27000,
                "sleepStartTimestampLocal": 1741993200000i64,
                "sleepEndTimestampLocal": 1742021400000i64,
                "deepSleepSeconds": 5400,
                "lightSleepSeconds": 14400,
                "remSleepSeconds": 7200,
                "awakeSleepSeconds": 1200,
                "awakeCount": 2,
                "avgSleepStress": 18.5,
                "sleepScores": { "overall": { "value": 82, "qualifierKey": "GOOD" } }
            }
        })
    }

    #[test]
    fn test_sleep_summary_picks_fields_and_score() {
        let summary = sleep_summary(sleep_payload()).unwrap();
        assert_eq!(summary.sleep_time_seconds, 27000);
        assert_eq!(summary.awake_count, 2);
        assert_eq!(summary.sleep_score, 82);

        let serialized = serde_json::to_value(&summary).unwrap();
        assert_eq!(serialized["sleepScore"], json!(82));
        assert_eq!(serialized["avgSleepStress"], json!(18.5));
        assert!(serialized.get("id").is_none());
    }

    #[test]
    fn test_sleep_without_scores_is_parse_error() {
        let mut payload = sleep_payload();
        payload["dailySleepDTO"]
            .as_object_mut()
            .unwrap()
            .remove("sleepScores");
        assert!(matches!(sleep_summary(payload), Err(UpstreamError::Parse { .. })));
    }

    #[test]
    fn test_heart_rate_variation() {
        let summary = heart_rate_summary(json!({
            "maxHeartRate": 151,
            "minHeartRate": 48,
            "restingHeartRate": 58,
            "lastSevenDaysAvgRestingHeartRate": 61
        }))
        .unwrap();
        assert_eq!(summary.variation, -3);
        assert_eq!(
            serde_json::to_value(&summary).unwrap()["lastSevenDaysAvgRestingHeartRate"],
            json!(61)
        );
    }

    #[test]
    fn test_activity_totals() {
        let summary = activity_summary(json!([
            {
                "activityName": "Morning Run",
                "activityType": { "typeKey": "running" },
                "duration": 1800.7,
                "calories": 320.0
            },
            {
                "activityName": "Evening Walk",
                "activityType": { "typeKey": "walking" },
                "duration": 1200.6,
                "calories": 110.5
            }
        ]))
        .unwrap();

        assert_eq!(summary.activities.len(), 2);
        assert_eq!(summary.activities[0].activity_type, "running");
        assert_eq!(summary.total_seconds, 3001);
        assert_eq!(summary.calories, 430.5);
    }

    #[test]
    fn test_no_activities_is_zero_totals() {
        let summary = activity_summary(json!([])).unwrap();
        assert!(summary.activities.is_empty());
        assert_eq!(summary.total_seconds, 0);
        assert_eq!(summary.calories, 0.0);
    }

    #[test]
    fn test_stress_level() {
        assert_eq!(stress_level(json!({"avgStressLevel": 27})).unwrap(), 27);
        assert!(stress_level(json!({})).is_err());
    }
}
