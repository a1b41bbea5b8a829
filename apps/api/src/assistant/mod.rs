//! The conversational side of Serenity: reflective journaling questions and
//! free chat, both grounded in the user's journal where possible.

pub mod handlers;
pub mod prompts;

use tracing::debug;

use crate::llm_client::prompts::COMPANION_SYSTEM;
use crate::llm_client::{generate_json, TextGenerator};
use crate::upstream::UpstreamError;

use prompts::{chat_prompt, questions_prompt, QUESTIONS_SYSTEM};

pub async fn generate_questions(
    journal_entry: &str,
    llm: &dyn TextGenerator,
) -> Result<Vec<String>, UpstreamError> {
    let raw: Vec<String> =
        generate_json(llm, &questions_prompt(journal_entry), QUESTIONS_SYSTEM).await?;
    let questions: Vec<String> = raw
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();
    debug!("Generated {} reflective questions", questions.len());
    Ok(questions)
}

pub async fn chat_reply(
    message: &str,
    latest_score: Option<u32>,
    llm: &dyn TextGenerator,
) -> Result<String, UpstreamError> {
    llm.generate(&chat_prompt(message, latest_score), COMPANION_SYSTEM)
        .await
}
