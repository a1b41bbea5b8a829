// Companion prompt templates.

use crate::llm_client::prompts::REPLY_STYLE;

pub const QUESTIONS_SYSTEM: &str = "\
You are Serenity, a gentle journaling coach. \
You MUST respond with a JSON array of strings only: no markdown fences, no explanations.";

const QUESTIONS_PROMPT: &str = r#"Read the journal entry below and write reflective follow-up questions that help the writer explore how they feel.

JOURNAL ENTRY:
{journal_entry}

RULES:
1. Write between 3 and 5 questions.
2. Each question is one sentence, open-ended and kind.
3. Refer to specific things the writer mentioned.
4. Never diagnose or give medical advice.
5. Return ONLY the JSON array of question strings."#;

const CHAT_PROMPT: &str = "{context}The user says: {message}\n\n\
Reply as a supportive companion. Offer practical, gentle suggestions where they fit.";

pub fn questions_prompt(journal_entry: &str) -> String {
    QUESTIONS_PROMPT.replace("{journal_entry}", journal_entry)
}

pub fn chat_prompt(message: &str, latest_score: Option<u32>) -> String {
    let context = match latest_score {
        Some(score) => format!(
            "The user's most recent journal wellbeing score is {score} out of 100 \
             (50 is neutral). Take it into account.\n\n"
        ),
        None => String::new(),
    };
    let prompt = CHAT_PROMPT
        .replace("{context}", &context)
        .replace("{message}", message);
    format!("{prompt}\n\n{REPLY_STYLE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_mentions_score_when_known() {
        let prompt = chat_prompt("I feel tired", Some(42));
        assert!(prompt.contains("wellbeing score is 42"));
        assert!(prompt.contains("I feel tired"));
    }

    #[test]
    fn test_chat_prompt_without_score() {
        let prompt = chat_prompt("Hello", None);
        assert!(!prompt.contains("wellbeing score"));
        assert!(prompt.starts_with("The user says: Hello"));
    }
}
