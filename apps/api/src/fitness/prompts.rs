// Fitness feedback prompt templates.
// Every template ends with the shared reply style rule.

use serde_json::Value;

use crate::llm_client::prompts::REPLY_STYLE;

const HEART_RATE_PROMPT: &str = "The user's watch recorded their heart rate throughout the day. \
The data is: {data}. \
Give feedback on how healthy these heart rate numbers look, referring to the values themselves. \
Recommend ideas and techniques to improve their heart rate next time. \
Write durations and rates in an easily readable way. \
Briefly comment on any notable stress you can infer from the data.";

const ACTIVITY_PROMPT: &str = "The user's watch recorded their physical activity today. \
The data is: {data}. Durations are in seconds and calories are totals for the day. \
Give feedback on how healthy their day was. Comment on how long each activity lasted \
(more than 20 minutes is preferable, but call out overworking). \
Recommend ways to enjoy their activities more and to calibrate how often and how long they do them. \
Write durations in an easily readable way, e.g. 1 hour instead of 3600 seconds. \
Briefly comment on any notable stress you can infer from the data.";

const STRESS_PROMPT: &str = "The user's watch recorded an average stress level of {level} \
(on a 0 to 100 scale) today. \
Give feedback on what this level means for their wellbeing, using the number in your answer. \
Recommend ideas and techniques to bring it down next time.";

fn with_style(prompt: String) -> String {
    format!("{prompt}\n\n{REPLY_STYLE}")
}

pub fn heart_rate_prompt(summary: &Value) -> String {
    with_style(HEART_RATE_PROMPT.replace("{data}", &summary.to_string()))
}

pub fn activity_prompt(summary: &Value) -> String {
    with_style(ACTIVITY_PROMPT.replace("{data}", &summary.to_string()))
}

pub fn stress_prompt(level: i64) -> String {
    with_style(STRESS_PROMPT.replace("{level}", &level.to_string()))
}

pub fn custom_prompt(question: &str) -> String {
    with_style(question.to_string())
}
