//! Wellbeing Scorer.
//!
//! Fixed linear heuristic over six labels, clamped to [0, 100]. Scores already
//! in the journal were produced with these weights.

use crate::analysis::emotion::EmotionDistribution;

pub const BASE_SCORE: f64 = 50.0;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Signed weight per label. Labels not listed contribute nothing.
pub const EMOTION_WEIGHTS: [(&str, f64); 6] = [
    ("joy", 50.0),
    ("love", 20.0),
    ("surprise", 10.0),
    ("sadness", -30.0),
    ("anger", -25.0),
    ("fear", -20.0),
];

/// Maps a distribution to an integer in [0, 100].
///
/// The clamped value is rounded half away from zero, which on this
/// non-negative range is round-half-up (62.5 becomes 63).
pub fn wellbeing_score(distribution: &EmotionDistribution) -> u32 {
    let raw = EMOTION_WEIGHTS
        .iter()
        .fold(BASE_SCORE, |acc, (label, weight)| {
            acc + weight * distribution.get(label)
        });
    raw.clamp(MIN_SCORE, MAX_SCORE).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(pairs: &[(&str, f64)]) -> EmotionDistribution {
        pairs.iter().map(|(l, s)| (*l, *s)).collect()
    }

    #[test]
    fn test_pure_joy_scores_100() {
        assert_eq!(wellbeing_score(&dist(&[("joy", 1.0)])), 100);
    }

    #[test]
    fn test_pure_sadness_scores_20() {
        assert_eq!(wellbeing_score(&dist(&[("sadness", 1.0)])), 20);
    }

    #[test]
    fn test_empty_distribution_scores_base() {
        assert_eq!(wellbeing_score(&EmotionDistribution::default()), 50);
    }

    #[test]
    fn test_unweighted_labels_are_ignored() {
        assert_eq!(
            wellbeing_score(&dist(&[("neutral", 0.9), ("disgust", 0.4)])),
            50
        );
    }

    #[test]
    fn test_all_weights_applied() {
        // 50 + 50*0.2 + 20*0.1 + 10*0.1 - 30*0.3 - 25*0.1 - 20*0.2
        //   = 50 + 10 + 2 + 1 - 9 - 2.5 - 4 = 47.5 -> 48
        let d = dist(&[
            ("joy", 0.2),
            ("love", 0.1),
            ("surprise", 0.1),
            ("sadness", 0.3),
            ("anger", 0.1),
            ("fear", 0.2),
        ]);
        assert_eq!(wellbeing_score(&d), 48);
    }

    #[test]
    fn test_half_rounds_up() {
        // 50 + 50*0.25 = 62.5
        assert_eq!(wellbeing_score(&dist(&[("joy", 0.25)])), 63);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let high = dist(&[("joy", 1.0), ("love", 1.0), ("surprise", 1.0)]);
        assert_eq!(wellbeing_score(&high), 100);

        let low = dist(&[("sadness", 1.0), ("anger", 1.0), ("fear", 1.0)]);
        assert_eq!(wellbeing_score(&low), 0);
    }

    #[test]
    fn test_score_is_deterministic() {
        let d = dist(&[("joy", 0.37), ("fear", 0.11)]);
        assert_eq!(wellbeing_score(&d), wellbeing_score(&d.clone()));
    }
}
