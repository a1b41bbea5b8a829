//! Activity Impact Ranker.
//!
//! Every entry contributes its full score to each of its tags; an entry with
//! three tags counts three times.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::round_to;
use crate::journal::models::JournalEntry;

const MULTIPLIER_DECIMALS: i32 = 2;

/// Running total for one activity tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityImpactRecord {
    pub tag: String,
    pub total: f64,
    pub count: u32,
}

impl ActivityImpactRecord {
    pub fn average(&self) -> f64 {
        self.total / self.count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedActivity {
    pub tag: String,
    pub impact_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityImpactReport {
    pub baseline_wellbeing: f64,
    pub ranked_activities: Vec<RankedActivity>,
}

/// Mean wellbeing score over the whole log; 0 for an empty log.
pub fn baseline(entries: &[JournalEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let total: f64 = entries.iter().map(|e| f64::from(e.wellbeing_score)).sum();
    total / entries.len() as f64
}

/// Groups scores by tag, in the order tags are first encountered.
pub fn collect_impact_records(entries: &[JournalEntry]) -> Vec<ActivityImpactRecord> {
    let mut records: Vec<ActivityImpactRecord> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let score = f64::from(entry.wellbeing_score);
        for tag in &entry.activities {
            match index.get(tag.as_str()) {
                Some(&i) => {
                    records[i].total += score;
                    records[i].count += 1;
                }
                None => {
                    index.insert(tag.as_str(), records.len());
                    records.push(ActivityImpactRecord {
                        tag: tag.clone(),
                        total: score,
                        count: 1,
                    });
                }
            }
        }
    }

    records
}

/// Ranks tags by `average(tag) / baseline`, highest first.
///
/// A zero baseline defines every multiplier as exactly 1. Equal multipliers
/// keep first-encountered order (the sort is stable).
pub fn rank_activity_impact(entries: &[JournalEntry]) -> ActivityImpactReport {
    let baseline = baseline(entries);

    let mut ranked: Vec<RankedActivity> = collect_impact_records(entries)
        .into_iter()
        .map(|record| {
            let multiplier = if baseline == 0.0 {
                1.0
            } else {
                record.average() / baseline
            };
            RankedActivity {
                tag: record.tag,
                impact_multiplier: round_to(multiplier, MULTIPLIER_DECIMALS),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.impact_multiplier.total_cmp(&a.impact_multiplier));

    ActivityImpactReport {
        baseline_wellbeing: round_to(baseline, MULTIPLIER_DECIMALS),
        ranked_activities: ranked,
    }
}
