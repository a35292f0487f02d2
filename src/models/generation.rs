use crate::config::GenerationConfig;
use crate::config::constants::{MAX_NEW_TOKENS, TEMPERATURE, TOP_P};
use crate::models::Message;

/// One natural language → SQL request. All fields are immutable inputs
/// of a single orchestration call; nothing is cached across calls.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    question: String,
    schema_text: String,
    history: Vec<Message>,
}

impl GenerationRequest {
    pub fn new(question: impl Into<String>, schema_text: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            schema_text: schema_text.into(),
            history: vec![],
        }
    }

    /// Prior conversation turns, oldest first. Only rendered into the
    /// prompt under the transcript history policy.
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }
}

/// Outcome of one orchestration call. A content-quality failure is a
/// normal result carrying the sentinel comment in `sql`, not an error.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub sql: String,
    /// Reserved for future use, currently always `None`.
    pub explanation: Option<String>,
    /// Raw model output for diagnostics. Concatenates both attempts
    /// under labeled delimiters when a repair attempt ran.
    pub raw_output: String,
}

/// Process-wide sampling parameters, identical for both attempts of a
/// request. Temperature 0 disables sampling entirely (greedy decoding).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    max_new_tokens: usize,
    temperature: f32,
    top_p: f32,
}

impl SamplingConfig {
    pub fn with_max_new_tokens(mut self, max_new_tokens: usize) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn max_new_tokens(&self) -> usize {
        self.max_new_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn sampling_enabled(&self) -> bool {
        self.temperature > 0.0
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

impl From<&GenerationConfig> for SamplingConfig {
    fn from(value: &GenerationConfig) -> Self {
        Self {
            max_new_tokens: value.max_new_tokens,
            temperature: value.temperature,
            top_p: value.top_p,
        }
    }
}
