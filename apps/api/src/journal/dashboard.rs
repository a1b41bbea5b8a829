use serde::Serialize;

use crate::journal::models::JournalEntry;

pub const DASHBOARD_DAYS: usize = 7;
const PLACEHOLDER_DATE: &str = "N/A";

/// One point on the dashboard's score chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyScore {
    pub score: u32,
    pub date: String,
}

impl DailyScore {
    fn placeholder() -> Self {
        Self {
            score: 0,
            date: PLACEHOLDER_DATE.to_string(),
        }
    }

    fn from_entry(entry: &JournalEntry) -> Self {
        let date = entry
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| PLACEHOLDER_DATE.to_string());
        Self {
            score: entry.wellbeing_score,
            date,
        }
    }
}

/// Scores of the newest seven entries, oldest first, left-padded with
/// zero-score placeholders when the log is shorter.
pub fn last_seven_scores(entries: &[JournalEntry]) -> Vec<DailyScore> {
    let start = entries.len().saturating_sub(DASHBOARD_DAYS);
    let recent = &entries[start..];

    let mut scores = Vec::with_capacity(DASHBOARD_DAYS);
    scores.extend((recent.len()..DASHBOARD_DAYS).map(|_| DailyScore::placeholder()));
    scores.extend(recent.iter().map(DailyScore::from_entry));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_on(day: u32, score: u32) -> JournalEntry {
        let mut entry =
            JournalEntry::new("12345".to_string(), "x".to_string(), vec![], None, score);
        entry.timestamp = format!("2025-03-{day:02}T08:30:00Z");
        entry
    }

    #[test]
    fn test_empty_log_is_all_placeholders() {
        let scores = last_seven_scores(&[]);
        assert_eq!(scores.len(), 7);
        assert!(scores.iter().all(|s| s.score == 0 && s.date == "N/A"));
    }

    #[test]
    fn test_three_entries_are_padded_on_the_left() {
        let entries = vec![entry_on(1, 40), entry_on(2, 55), entry_on(3, 70)];
        let scores = last_seven_scores(&entries);

        assert_eq!(scores.len(), 7);
        assert!(scores[..4].iter().all(|s| *s == DailyScore::placeholder()));
        assert_eq!(
            scores[4..],
            [
                DailyScore {
                    score: 40,
                    date: "2025-03-01".to_string(),
                },
                DailyScore {
                    score: 55,
                    date: "2025-03-02".to_string(),
                },
                DailyScore {
                    score: 70,
                    date: "2025-03-03".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_only_newest_seven_are_kept() {
        let entries: Vec<JournalEntry> = (1..=10).map(|d| entry_on(d, d * 5)).collect();
        let scores = last_seven_scores(&entries);

        assert_eq!(scores.len(), 7);
        assert_eq!(scores.first().unwrap().date, "2025-03-04");
        assert_eq!(scores.last().unwrap().score, 50);
    }

    #[test]
    fn test_unparseable_timestamp_keeps_score() {
        let mut entry = entry_on(1, 66);
        entry.timestamp = "unknown".to_string();
        let scores = last_seven_scores(&[entry]);
        assert_eq!(
            scores[6],
            DailyScore {
                score: 66,
                date: "N/A".to_string(),
            }
        );
    }
}
