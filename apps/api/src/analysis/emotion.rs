//! Emotion Aggregator: per-sentence classification averaged into one
//! distribution over the classifier's label vocabulary.
//!
//! Top-emotion tie-break: labels are tracked in first-seen order (output order
//! of the first sentence, then new labels from later sentences in their output
//! order). The top label is the first label in that order whose rounded
//! average equals the maximum.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::round_to;
use crate::inference::{EmotionClassifier, EmotionScore};
use crate::upstream::UpstreamError;

const SCORE_DECIMALS: i32 = 4;

/// Averaged per-label scores. Labels absent from the map score 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionDistribution(BTreeMap<String, f64>);

impl EmotionDistribution {
    pub fn get(&self, label: &str) -> f64 {
        self.0.get(label).copied().unwrap_or(0.0)
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for EmotionDistribution {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, s)| (l.into(), s)).collect())
    }
}

/// Aggregated distribution plus its top label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionAnalysis {
    pub averaged_emotions: EmotionDistribution,
    pub top_emotion: Option<String>,
}

/// Per-label running totals kept in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct LabelTotals {
    order: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl LabelTotals {
    pub(crate) fn add(&mut self, label: &str, score: f64) {
        let score = if score.is_finite() { score.max(0.0) } else { 0.0 };
        match self.index.get(label) {
            Some(&i) => self.order[i].1 += score,
            None => {
                self.index.insert(label.to_string(), self.order.len());
                self.order.push((label.to_string(), score));
            }
        }
    }

    /// Divides every total by `divisor` and picks the top label.
    pub(crate) fn averaged(self, divisor: usize) -> EmotionAnalysis {
        if divisor == 0 {
            return EmotionAnalysis::default();
        }

        let averaged: Vec<(String, f64)> = self
            .order
            .into_iter()
            .map(|(label, total)| (label, round_to(total / divisor as f64, SCORE_DECIMALS)))
            .collect();

        let mut top: Option<(&str, f64)> = None;
        for (label, score) in &averaged {
            if top.map_or(true, |(_, best)| *score > best) {
                top = Some((label.as_str(), *score));
            }
        }
        let top_emotion = top.map(|(label, _)| label.to_string());

        EmotionAnalysis {
            averaged_emotions: averaged.into_iter().collect(),
            top_emotion,
        }
    }
}

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary pattern is valid"))
}

/// Splits text at `.`, `!` or `?` followed by whitespace. The punctuation stays
/// with its sentence; blank fragments are dropped, so whitespace-only input
/// yields no sentences and unpunctuated text yields one.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in sentence_boundary().find_iter(text) {
        // the punctuation mark is one ASCII byte
        push_sentence(&mut sentences, &text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment);
    }
}

/// Averages already-classified sentences. Zero sentences give an empty result.
pub fn average_scores(per_sentence: &[Vec<EmotionScore>]) -> EmotionAnalysis {
    let mut totals = LabelTotals::default();
    for scores in per_sentence {
        for score in scores {
            totals.add(&score.label, score.score);
        }
    }
    totals.averaged(per_sentence.len())
}

/// Classifies each sentence of `text` in order and averages the results.
pub async fn aggregate_emotions(
    text: &str,
    classifier: &dyn EmotionClassifier,
) -> Result<EmotionAnalysis, UpstreamError> {
    let sentences = split_sentences(text);
    let mut per_sentence = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        per_sentence.push(classifier.classify(sentence).await?);
    }
    Ok(average_scores(&per_sentence))
}
