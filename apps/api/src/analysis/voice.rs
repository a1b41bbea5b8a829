//! Voice emotion analysis: runs every configured audio classifier on a clip and
//! averages their outputs under a shared label vocabulary.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::analysis::emotion::{EmotionDistribution, LabelTotals};
use crate::inference::{AudioEmotionClassifier, EmotionScore};
use crate::upload::AudioUpload;
use crate::upstream::UpstreamError;

/// Audio models disagree on label spelling (one even ships "Suprised").
const AUDIO_LABEL_MAP: &[(&str, &str)] = &[
    ("Angry", "angry"),
    ("Disgusted", "disgust"),
    ("Fearful", "fearful"),
    ("Happy", "happy"),
    ("Neutral", "neutral"),
    ("Sad", "sad"),
    ("Surprised", "surprised"),
    ("Suprised", "surprised"),
    ("Calm", "calm"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioEmotionReport {
    pub emotions: EmotionDistribution,
    pub top_emotion: Option<String>,
    /// Classifiers that contributed, in the order they ran.
    pub sources: Vec<String>,
}

/// Unknown labels pass through unchanged.
pub fn standardize_label(label: &str) -> &str {
    AUDIO_LABEL_MAP
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, standard)| *standard)
        .unwrap_or(label)
}

/// Sums standardised scores and divides by the number of classifiers.
pub fn combine_audio_results(
    results: &[Vec<EmotionScore>],
) -> (EmotionDistribution, Option<String>) {
    let mut totals = LabelTotals::default();
    for scores in results {
        for score in scores {
            totals.add(standardize_label(&score.label), score.score);
        }
    }
    let analysis = totals.averaged(results.len());
    (analysis.averaged_emotions, analysis.top_emotion)
}

pub async fn analyze_audio_emotions(
    clip: &AudioUpload,
    classifiers: &[Arc<dyn AudioEmotionClassifier>],
) -> Result<AudioEmotionReport, UpstreamError> {
    if classifiers.is_empty() {
        return Err(UpstreamError::NotConfigured {
            service: "audio emotion classifier",
        });
    }

    let mut results = Vec::with_capacity(classifiers.len());
    let mut sources = Vec::with_capacity(classifiers.len());
    for classifier in classifiers {
        results.push(classifier.classify(clip).await?);
        sources.push(classifier.name().to_string());
    }
    debug!("Combined audio emotions from {} classifier(s)", sources.len());

    let (emotions, top_emotion) = combine_audio_results(&results);
    Ok(AudioEmotionReport {
        emotions,
        top_emotion,
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;

    fn scores(pairs: &[(&str, f64)]) -> Vec<EmotionScore> {
        pairs.iter().map(|(l, s)| EmotionScore::new(*l, *s)).collect()
    }

    struct FixedAudioClassifier {
        name: &'static str,
        scores: Vec<EmotionScore>,
    }

    #[async_trait]
    impl AudioEmotionClassifier for FixedAudioClassifier {
        fn name(&self) -> &str {
            self.name
        }

        async fn classify(&self, _clip: &AudioUpload) -> Result<Vec<EmotionScore>, UpstreamError> {
            Ok(self.scores.clone())
        }
    }

    #[test]
    fn test_standardize_known_and_unknown_labels() {
        assert_eq!(standardize_label("Suprised"), "surprised");
        assert_eq!(standardize_label("Disgusted"), "disgust");
        assert_eq!(standardize_label("happy"), "happy");
        assert_eq!(standardize_label("bored"), "bored");
    }

    #[test]
    fn test_two_models_are_averaged_under_shared_labels() {
        let (emotions, top) = combine_audio_results(&[
            scores(&[("Happy", 0.6), ("Sad", 0.4)]),
            scores(&[("happy", 0.8), ("calm", 0.2)]),
        ]);
        assert_eq!(emotions.get("happy"), 0.7);
        assert_eq!(emotions.get("sad"), 0.2);
        assert_eq!(emotions.get("calm"), 0.1);
        assert_eq!(top.as_deref(), Some("happy"));
    }

    #[test]
    fn test_single_model_keeps_scores() {
        let (emotions, _) = combine_audio_results(&[scores(&[("Angry", 0.25)])]);
        assert_eq!(emotions.get("angry"), 0.25);
    }

    #[tokio::test]
    async fn test_report_lists_sources_in_order() {
        let clip = AudioUpload::persist(Bytes::from_static(b"audio"), None)
            .await
            .unwrap();
        let classifiers: Vec<Arc<dyn AudioEmotionClassifier>> = vec![
            Arc::new(FixedAudioClassifier {
                name: "Hatman/audio-emotion-detection",
                scores: scores(&[("Neutral", 1.0)]),
            }),
            Arc::new(FixedAudioClassifier {
                name: "superb/hubert-large-superb-er",
                scores: scores(&[("neutral", 0.5), ("Sad", 0.5)]),
            }),
        ];

        let report = analyze_audio_emotions(&clip, &classifiers).await.unwrap();
        assert_eq!(
            report.sources,
            vec!["Hatman/audio-emotion-detection", "superb/hubert-large-superb-er"]
        );
        assert_eq!(report.emotions.get("neutral"), 0.75);
        assert_eq!(report.top_emotion.as_deref(), Some("neutral"));
    }

    #[tokio::test]
    async fn test_no_classifiers_is_not_configured() {
        let clip = AudioUpload::persist(Bytes::from_static(b"audio"), None)
            .await
            .unwrap();
        let result = analyze_audio_emotions(&clip, &[]).await;
        assert!(matches!(result, Err(UpstreamError::NotConfigured { .. })));
    }
}
