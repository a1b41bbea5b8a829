// Analysis prompt templates.

pub const ACTIVITY_EXTRACTION_SYSTEM: &str = "\
You extract activities from personal journal entries. \
You MUST respond with a JSON array of strings only: no markdown fences, no explanations. \
Return an empty array when the entry mentions no activities.";

const ACTIVITY_EXTRACTION_PROMPT: &str = r#"List the activities the writer did or took part in, as described in the journal entry below.

JOURNAL ENTRY:
{journal_entry}

RULES:
1. Each activity is a short lowercase phrase of one to three words, e.g. "running", "yoga", "team meeting".
2. Leave out feelings, times of day, places and people on their own.
3. Leave out generic verbs such as "went", "did", "was" or "had".
4. Do not repeat an activity.
5. Return ONLY the JSON array."#;

pub fn activity_extraction_prompt(journal_entry: &str) -> String {
    ACTIVITY_EXTRACTION_PROMPT.replace("{journal_entry}", journal_entry)
}
