use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub(crate) fn model() -> String {
    DEFAULT_MODEL.to_string()
}

pub(crate) fn max_new_tokens() -> usize {
    MAX_NEW_TOKENS
}

pub(crate) fn temperature() -> f32 {
    TEMPERATURE
}

pub(crate) fn top_p() -> f32 {
    TOP_P
}
