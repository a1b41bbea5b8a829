// Deterministic journal analytics: emotion aggregation, the wellbeing score,
// activity identification and the activity impact ranking.
// Model calls happen only through the capability traits in `inference`.

pub mod activities;
pub mod emotion;
pub mod handlers;
pub mod impact;
pub mod prompts;
pub mod voice;
pub mod wellbeing;

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
