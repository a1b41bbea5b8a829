//! Activity identification: pulls activity tags out of an entry's text.
//!
//! Default: `KeywordActivityExtractor` (pure-Rust, deterministic, no model call).
//! Optional: `LlmActivityExtractor`, enabled via ENABLE_LLM_ACTIVITY_EXTRACTION.
//!
//! `AppState` holds an `Arc<dyn ActivityExtractor>`, chosen at startup.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;

use crate::analysis::prompts::{activity_extraction_prompt, ACTIVITY_EXTRACTION_SYSTEM};
use crate::llm_client::{generate_json, TextGenerator};
use crate::upstream::UpstreamError;

#[async_trait]
pub trait ActivityExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Vec<String>, UpstreamError>;
}

/// Words that are activities on their own.
const ACTIVITY_LEXICON: &[&str] = &[
    "yoga", "pilates", "meditation", "gym", "workout", "exercise", "walk", "hike", "run", "jog",
    "swim", "bike", "dance", "therapy", "tennis", "soccer", "football", "basketball",
    "volleyball", "golf", "climbing", "karate", "boxing", "crossfit", "sauna", "nap",
];

/// `-ing` words that are not activities.
const NON_ACTIVITY_WORDS: &[&str] = &[
    "morning", "evening", "feeling", "something", "nothing", "anything", "everything",
    "being", "having", "doing", "going", "getting", "during", "bring", "thing", "string",
    "spring", "ceiling", "amazing", "boring", "exciting", "interesting", "annoying",
    "exhausting", "overwhelming", "frustrating", "relaxing", "surprising", "upcoming",
    "outstanding", "willing", "wedding", "pudding", "darling", "sibling",
    "building", "ring", "king", "sing", "wing", "trying", "seeing", "saying", "making",
    "taking", "coming", "looking", "thinking", "wanting", "needing", "starting", "ending",
    "beginning", "lacking", "missing", "using", "keeping",
];

fn word_pattern() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").expect("word pattern is valid"))
}

fn is_activity_word(word: &str) -> bool {
    if ACTIVITY_LEXICON.contains(&word) {
        return true;
    }
    word.len() >= 5 && word.ends_with("ing") && !NON_ACTIVITY_WORDS.contains(&word)
}

/// Lower-cases, trims, drops blanks and duplicates (first occurrence wins).
pub fn normalize_activities<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut activities: Vec<String> = Vec::new();
    for item in raw {
        let activity = item.as_ref().trim().to_lowercase();
        if !activity.is_empty() && !activities.contains(&activity) {
            activities.push(activity);
        }
    }
    activities
}

/// Lexicon plus gerund heuristic.
pub struct KeywordActivityExtractor;

impl KeywordActivityExtractor {
    pub fn extract_sync(text: &str) -> Vec<String> {
        let words = word_pattern()
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|w| is_activity_word(w));
        normalize_activities(words)
    }
}

#[async_trait]
impl ActivityExtractor for KeywordActivityExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<String>, UpstreamError> {
        Ok(Self::extract_sync(text))
    }
}

/// Asks the generative model for a JSON array of short activity phrases.
pub struct LlmActivityExtractor(pub Arc<dyn TextGenerator>);

#[async_trait]
impl ActivityExtractor for LlmActivityExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<String>, UpstreamError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let prompt = activity_extraction_prompt(text);
        let raw: Vec<String> =
            generate_json(self.0.as_ref(), &prompt, ACTIVITY_EXTRACTION_SYSTEM).await?;
        Ok(normalize_activities(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, UpstreamError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_gerunds_and_lexicon_words_are_activities() {
        let activities = KeywordActivityExtractor::extract_sync(
            "I went running with Sam, then did yoga. Feeling great this morning!",
        );
        assert_eq!(activities, vec!["running", "yoga"]);
    }

    #[test]
    fn test_adjectives_ending_in_ing_are_ignored() {
        let activities =
            KeywordActivityExtractor::extract_sync("Amazing day of hiking and swimming.");
        assert_eq!(activities, vec!["hiking", "swimming"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let activities = KeywordActivityExtractor::extract_sync(
            "Reading in the park. More reading at night, then Gym.",
        );
        assert_eq!(activities, vec!["reading", "gym"]);
    }

    #[test]
    fn test_short_ing_words_are_ignored() {
        assert!(KeywordActivityExtractor::extract_sync("I sing in the ring").is_empty());
    }

    #[test]
    fn test_no_activities_in_plain_text() {
        assert!(KeywordActivityExtractor::extract_sync("It rained all day.").is_empty());
    }

    #[test]
    fn test_normalize_activities() {
        let normalized = normalize_activities(vec![" Yoga ", "yoga", "", "Walking the dog"]);
        assert_eq!(normalized, vec!["yoga", "walking the dog"]);
    }

    #[tokio::test]
    async fn test_llm_extractor_normalizes_model_output() {
        let extractor = LlmActivityExtractor(Arc::new(CannedGenerator(
            r#"["Morning run", "journaling", "morning run"]"#,
        )));
        let activities = extractor.extract("Went for a run and journaled.").await.unwrap();
        assert_eq!(activities, vec!["morning run", "journaling"]);
    }

    #[tokio::test]
    async fn test_llm_extractor_skips_blank_text() {
        let extractor = LlmActivityExtractor(Arc::new(CannedGenerator("not json")));
        assert!(extractor.extract("   ").await.unwrap().is_empty());
    }
}
