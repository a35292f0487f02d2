#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;

use crate::models::Message;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Upper bound on how much of a failed completion is quoted back in the
/// repair prompt, in characters. Caps prompt growth on retry.
pub(crate) const REPAIR_CONTEXT_LIMIT: usize = 500;

const SYSTEM_INSTRUCTION: &str = "You are an assistant that converts natural language questions \
to syntactically correct SQL for the given database schema.\n\
Follow these rules strictly:\n\
1. Use only the tables and columns that exist in the schema.\n\
2. Do not invent columns or tables.\n\
3. Return only a single SQL query.\n\
4. Wrap the SQL in a Markdown ```sql code block.\n";

const REPAIR_INSTRUCTION: &str = "You are an assistant that converts natural language questions \
to syntactically correct SQL for the given database schema.\n\
The previous attempt failed. Rewrite it as a single SQL query.\n";

/// How prior conversation turns are rendered into the initial prompt.
///
/// `Omit` keeps the prompt short and avoids feeding earlier malformed
/// completions back to the model; `Transcript` inserts a labeled history
/// block between the schema and the question.
#[derive(Hash, PartialEq, Eq, Deserialize, Serialize, Debug, Clone, Copy, Default)]
pub enum HistoryPolicy {
    #[default]
    #[serde(rename = "omit")]
    Omit,
    #[serde(rename = "transcript")]
    Transcript,
}

#[derive(Debug, Clone, Copy)]
pub enum PromptMode<'a> {
    Initial,
    /// Carries the previous failed completion; quoted back to the model
    /// as a bounded prefix. The repair prompt never includes history.
    Repair { previous_output: &'a str },
}

/// Render the full prompt text. Pure and deterministic: identical inputs
/// produce byte-identical prompts. The schema and question are always
/// included in full, in both modes.
pub fn build_prompt(
    question: &str,
    schema_text: &str,
    history: &[Message],
    policy: HistoryPolicy,
    mode: PromptMode,
) -> String {
    match mode {
        PromptMode::Initial => build_initial(question, schema_text, history, policy),
        PromptMode::Repair { previous_output } => {
            build_repair(question, schema_text, previous_output)
        }
    }
}

fn build_initial(
    question: &str,
    schema_text: &str,
    history: &[Message],
    policy: HistoryPolicy,
) -> String {
    let mut prompt = String::from(SYSTEM_INSTRUCTION);
    let _ = write!(prompt, "SCHEMA:\n{}\n\n", schema_text.trim());

    if policy == HistoryPolicy::Transcript && !history.is_empty() {
        prompt.push_str("Conversation history:\n");
        for message in history {
            let _ = writeln!(prompt, "{}: {}", message.role().label(), message.content());
        }
        prompt.push('\n');
    }

    let _ = write!(
        prompt,
        "User question: {}\n\n\
        Return only the SQL query in a ```sql code block. \
        Do not add explanations or comments outside the code block.",
        question
    );
    prompt
}

fn build_repair(question: &str, schema_text: &str, previous_output: &str) -> String {
    let previous = truncate_chars(previous_output, REPAIR_CONTEXT_LIMIT);
    format!(
        "{}SCHEMA:\n{}\n\n\
        User question: {}\n\n\
        Previous (incorrect) output:\n{}\n\n\
        Rewrite as a single SQL query in a ```sql code block. Output nothing else.",
        REPAIR_INSTRUCTION,
        schema_text.trim(),
        question,
        previous
    )
}

/// Truncate to at most `limit` characters, never splitting a multi-byte
/// character.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
