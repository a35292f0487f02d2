use crate::{
    config::constants::{LOG_FILE_PATH, MAX_NEW_TOKENS, TOP_P},
    generate::{HistoryPolicy, Strictness},
};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, false);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("nl2sql::backend"));
    assert_eq!(log_filters[0].level.as_deref(), Some("debug"));

    let log_file = &log.file;
    assert_eq!(log_file.path, "/var/logs/nl2sql.log");
    assert_eq!(log_file.append, true);

    let backend = &config.backend;
    assert_eq!(backend.endpoint, "http://localhost:8080");
    assert_eq!(backend.alias.as_deref(), Some("local"));
    assert_eq!(backend.api_key.as_deref(), Some("test_token"));
    assert_eq!(backend.model, "qwen2.5-0.5b-instruct");
    assert_eq!(backend.timeout_secs, Some(60));
    assert_eq!(backend.serialize_requests, true);

    let generation = &config.generation;
    assert_eq!(generation.max_new_tokens, 128);
    assert_eq!(generation.temperature, 0.0);
    assert_eq!(generation.top_p, 0.9);

    let pipeline = &config.pipeline;
    assert_eq!(pipeline.history, HistoryPolicy::Transcript);
    assert_eq!(pipeline.validation, Strictness::Strict);
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    assert_eq!(log.file.path, LOG_FILE_PATH);

    let generation = &config.generation;
    assert_eq!(generation.max_new_tokens, MAX_NEW_TOKENS);
    assert_eq!(generation.top_p, TOP_P);

    let pipeline = &config.pipeline;
    assert_eq!(pipeline.history, HistoryPolicy::Omit);
    assert_eq!(pipeline.validation, Strictness::Strict);
}

#[test]
fn test_resolve_path() {
    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("TEST_PATH", dir);
        std::env::set_var("USER_PATH", user_path);
    }
    let ret = resolve_path("$TEST_PATH/${USER_PATH}/config.toml").expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/config.toml"));
}
