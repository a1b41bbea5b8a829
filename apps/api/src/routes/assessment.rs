//! The five-question stress self-assessment behind the static assessment page.

use std::collections::HashMap;

use axum::{response::Html, Form};

use crate::errors::AppError;

const QUESTION_COUNT: usize = 5;
const ANSWER_RANGE: std::ops::RangeInclusive<i64> = 0..=4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressBand {
    Minimal,
    Mild,
    Moderate,
    High,
}

impl StressBand {
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s <= 5 => StressBand::Minimal,
            s if s <= 10 => StressBand::Mild,
            s if s <= 15 => StressBand::Moderate,
            _ => StressBand::High,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StressBand::Minimal => {
                "Your responses suggest minimal stress levels. Keep up the good work!"
            }
            StressBand::Mild => {
                "Your responses suggest mild stress. Consider trying some of our breathing exercises."
            }
            StressBand::Moderate => {
                "Your responses suggest moderate stress. We recommend exploring our resources section."
            }
            StressBand::High => {
                "Your responses suggest high stress levels. Consider reaching out to a mental health professional."
            }
        }
    }
}

fn answer_value(key: &str, raw: &str) -> Result<i64, AppError> {
    let value = raw
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("{key} must be a whole number")))?;
    if !ANSWER_RANGE.contains(&value) {
        return Err(AppError::Validation(format!(
            "{key} must be between {} and {}",
            ANSWER_RANGE.start(),
            ANSWER_RANGE.end()
        )));
    }
    Ok(value)
}

/// Sums `q1`..`q5`, each 0..=4. A missing or blank answer counts as 0.
pub fn assessment_score(answers: &HashMap<String, String>) -> Result<i64, AppError> {
    (1..=QUESTION_COUNT)
        .map(|i| {
            let key = format!("q{i}");
            match answers.get(&key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(v) => answer_value(&key, v),
                None => Ok(0),
            }
        })
        .sum()
}

fn render_result(score: i64, band: StressBand) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Assessment result · Serenity</title>
  <link rel="stylesheet" href="/styles.css">
</head>
<body>
  <main class="card">
    <h1>Your assessment result</h1>
    <p class="score">Score: {score}</p>
    <p>{message}</p>
    <a href="/assessment.html">Take it again</a> · <a href="/">Home</a>
  </main>
</body>
</html>
"#,
        message = band.message()
    )
}

/// POST /submit-assessment
pub async fn handle_submit_assessment(
    Form(answers): Form<HashMap<String, String>>,
) -> Result<Html<String>, AppError> {
    let score = assessment_score(&answers)?;
    Ok(Html(render_result(score, StressBand::from_score(score))))
}
