/// Default OpenAI-compatible endpoint, a locally served model.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Small local instruct model, good enough for schema-scoped SQL.
pub const DEFAULT_MODEL: &str = "qwen2.5-0.5b-instruct";

pub const MAX_NEW_TOKENS: usize = 256;

pub const TEMPERATURE: f32 = 0.2;

pub const TOP_P: f32 = 0.9;

pub const LOG_FILE_PATH: &str = "/tmp/nl2sql.log";
