use super::*;
use crate::models::Message;

const SCHEMA: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);";
const QUESTION: &str = "How many users are there?";

fn history() -> Vec<Message> {
    vec![
        Message::new_system("Session started"),
        Message::new_user("List all users"),
        Message::new_assistant("SELECT * FROM users;"),
    ]
}

#[test]
fn test_build_prompt_is_deterministic() {
    let a = build_prompt(
        QUESTION,
        SCHEMA,
        &history(),
        HistoryPolicy::Transcript,
        PromptMode::Initial,
    );
    let b = build_prompt(
        QUESTION,
        SCHEMA,
        &history(),
        HistoryPolicy::Transcript,
        PromptMode::Initial,
    );
    assert_eq!(a, b);
}

#[test]
fn test_initial_prompt_contains_schema_and_question() {
    let prompt = build_prompt(QUESTION, SCHEMA, &[], HistoryPolicy::Omit, PromptMode::Initial);

    assert!(prompt.contains("Follow these rules strictly:"));
    assert!(prompt.contains(&format!("SCHEMA:\n{}", SCHEMA)));
    assert!(prompt.contains(&format!("User question: {}", QUESTION)));
    assert!(prompt.contains("```sql code block"));
}

#[test]
fn test_initial_prompt_trims_schema() {
    let prompt = build_prompt(
        QUESTION,
        "\n  CREATE TABLE t (x INT);\n\n",
        &[],
        HistoryPolicy::Omit,
        PromptMode::Initial,
    );
    assert!(prompt.contains("SCHEMA:\nCREATE TABLE t (x INT);\n\n"));
}

#[test]
fn test_omit_policy_drops_history() {
    let prompt = build_prompt(
        QUESTION,
        SCHEMA,
        &history(),
        HistoryPolicy::Omit,
        PromptMode::Initial,
    );

    assert!(!prompt.contains("Conversation history:"));
    assert!(!prompt.contains("List all users"));
}

#[test]
fn test_transcript_policy_renders_history_between_schema_and_question() {
    let prompt = build_prompt(
        QUESTION,
        SCHEMA,
        &history(),
        HistoryPolicy::Transcript,
        PromptMode::Initial,
    );

    assert!(prompt.contains("System: Session started"));
    assert!(prompt.contains("User: List all users"));
    assert!(prompt.contains("Assistant: SELECT * FROM users;"));

    let schema_pos = prompt.find("SCHEMA:").unwrap();
    let history_pos = prompt.find("Conversation history:").unwrap();
    let question_pos = prompt.find("User question:").unwrap();
    assert!(schema_pos < history_pos);
    assert!(history_pos < question_pos);
}

#[test]
fn test_transcript_policy_with_empty_history() {
    let prompt = build_prompt(
        QUESTION,
        SCHEMA,
        &[],
        HistoryPolicy::Transcript,
        PromptMode::Initial,
    );
    assert!(!prompt.contains("Conversation history:"));
}

#[test]
fn test_repair_prompt_restates_schema_and_question() {
    let prompt = build_prompt(
        QUESTION,
        SCHEMA,
        &history(),
        HistoryPolicy::Transcript,
        PromptMode::Repair {
            previous_output: "I am not sure what you mean.",
        },
    );

    assert!(prompt.contains("The previous attempt failed."));
    assert!(prompt.contains(&format!("SCHEMA:\n{}", SCHEMA)));
    assert!(prompt.contains(&format!("User question: {}", QUESTION)));
    assert!(prompt.contains("Previous (incorrect) output:\nI am not sure what you mean."));
    // Repair prompts never carry history, regardless of policy.
    assert!(!prompt.contains("Conversation history:"));
    assert!(!prompt.contains("List all users"));
}

#[test]
fn test_repair_prompt_bounds_previous_output() {
    let previous = "x".repeat(REPAIR_CONTEXT_LIMIT + 100);
    let prompt = build_prompt(
        QUESTION,
        SCHEMA,
        &[],
        HistoryPolicy::Omit,
        PromptMode::Repair {
            previous_output: &previous,
        },
    );

    assert!(prompt.contains(&"x".repeat(REPAIR_CONTEXT_LIMIT)));
    assert!(!prompt.contains(&"x".repeat(REPAIR_CONTEXT_LIMIT + 1)));
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    let text = "é".repeat(600);
    let truncated = truncate_chars(&text, 500);
    assert_eq!(truncated.chars().count(), 500);

    assert_eq!(truncate_chars("short", 500), "short");
    assert_eq!(truncate_chars("", 500), "");
}
