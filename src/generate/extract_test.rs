use super::*;

#[test]
fn test_extract_sql_fenced_block() {
    let text = "Here you go:\n```sql\nSELECT * FROM users;\n```\nLet me know!";
    assert_eq!(extract_sql(text), "SELECT * FROM users;");
}

#[test]
fn test_extract_sql_fence_tag_is_case_insensitive() {
    let text = "```SQL\nSELECT 1\n```";
    assert_eq!(extract_sql(text), "SELECT 1");
}

#[test]
fn test_extract_generic_fenced_block() {
    let text = "Result:\n```\nSELECT a FROM b\n```";
    assert_eq!(extract_sql(text), "SELECT a FROM b");
}

#[test]
fn test_fenced_block_wins_over_bare_keyword() {
    let text = "You could run SELECT nope FROM guesswork, or better:\n\
        ```sql\nSELECT id FROM t WHERE x = 1\n```";
    assert_eq!(extract_sql(text), "SELECT id FROM t WHERE x = 1");
}

#[test]
fn test_keyword_fallback() {
    let text = "Sure thing: SELECT id, name FROM users WHERE active = 1";
    assert_eq!(
        extract_sql(text),
        "SELECT id, name FROM users WHERE active = 1"
    );
}

#[test]
fn test_keyword_fallback_with_cte() {
    let text = "with t as (select 1 as x) select x from t";
    assert_eq!(extract_sql(text), "with t as (select 1 as x) select x from t");
}

#[test]
fn test_fallback_truncates_at_echo_markers() {
    let text = "select * from users where id = 1\nUser question: show me the users";
    assert_eq!(extract_sql(text), "select * from users where id = 1");

    let text = "SELECT name FROM users\nSCHEMA:\nCREATE TABLE users (id INT);";
    assert_eq!(extract_sql(text), "SELECT name FROM users");

    let text = "select 1 from t\nConversation History:\nUser: hello";
    assert_eq!(extract_sql(text), "select 1 from t");
}

#[test]
fn test_fallback_truncates_at_earliest_marker() {
    let text = "select 1 from t\nUser question: x\nSCHEMA:\ny";
    assert_eq!(extract_sql(text), "select 1 from t");
}

#[test]
fn test_no_keyword_returns_trimmed_input() {
    assert_eq!(extract_sql("  I don't know.  "), "I don't know.");
    assert_eq!(extract_sql(""), "");
    assert_eq!(extract_sql("   \n\t  "), "");
}

#[test]
fn test_unbalanced_fence_falls_back_to_keyword() {
    assert_eq!(extract_sql("```sql\nSELECT 1 FROM t"), "SELECT 1 FROM t");
}

#[test]
fn test_multibyte_input_does_not_panic() {
    let text = "héllo wörld, try select * from tāble where x = 'é'\nSchema: stuff";
    assert_eq!(extract_sql(text), "select * from tāble where x = 'é'");

    // Fenced content with multi-byte characters.
    let text = "```sql\nSELECT '🦀' FROM crabs\n```";
    assert_eq!(extract_sql(text), "SELECT '🦀' FROM crabs");
}
