use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One journaled submission. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// RFC 3339, UTC, second precision.
    pub timestamp: String,
    pub user_id: String,
    pub content: String,
    pub activities: Vec<String>,
    /// Provider tone output serialized as JSON, or empty.
    pub tone_analysis: String,
    pub wellbeing_score: u32,
}

impl JournalEntry {
    pub fn new(
        user_id: String,
        content: String,
        activities: Vec<String>,
        tone_analysis: Option<&serde_json::Value>,
        wellbeing_score: u32,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            user_id,
            content,
            activities: normalize_tags(activities),
            tone_analysis: tone_analysis.map(|v| v.to_string()).unwrap_or_default(),
            wellbeing_score,
        }
    }

    /// Calendar date of the timestamp, if it starts with `YYYY-MM-DD`.
    pub fn date(&self) -> Option<NaiveDate> {
        let prefix = self.timestamp.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

/// Tags are persisted `", "`-joined, so commas inside a tag are dropped.
/// Blank tags and repeats are removed; the first occurrence keeps its place.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().replace(',', " ");
        let tag = tag.split_whitespace().collect::<Vec<_>>().join(" ");
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
