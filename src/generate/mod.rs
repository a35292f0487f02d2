#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;

pub mod extract;
pub mod prompt;
pub mod validate;

pub use extract::extract_sql;
pub use prompt::{HistoryPolicy, PromptMode, build_prompt};
pub use validate::{Strictness, is_plausible};

use crate::backend::ArcOracle;
use crate::config::PipelineConfig;
use crate::models::{GenerationRequest, GenerationResult, SamplingConfig};
use eyre::{Context, Result};

/// Returned as the assistant's SQL when neither attempt produced a
/// plausible statement.
pub const FAILURE_SENTINEL: &str =
    "-- The model did not produce a valid SQL query. Please try rephrasing your question.";

const INITIAL_LABEL: &str = "=== Initial attempt ===";
const REPAIR_LABEL: &str = "=== Repair attempt ===";

/// Two-attempt generation pipeline: generate, validate, repair once,
/// validate again. Both attempts share the same sampling parameters.
///
/// A content-quality failure after the repair attempt is a normal
/// outcome carrying [`FAILURE_SENTINEL`]; only backend errors surface
/// as `Err`.
pub struct SqlGenerator {
    oracle: ArcOracle,
    sampling: SamplingConfig,
    history: HistoryPolicy,
    validation: Strictness,
}

impl SqlGenerator {
    pub fn new(oracle: ArcOracle) -> Self {
        Self {
            oracle,
            sampling: SamplingConfig::default(),
            history: HistoryPolicy::default(),
            validation: Strictness::default(),
        }
    }

    pub fn from_config(mut self, config: &PipelineConfig) -> Self {
        self.history = config.history;
        self.validation = config.validation;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.history = policy;
        self
    }

    pub fn with_validation(mut self, strictness: Strictness) -> Self {
        self.validation = strictness;
        self
    }

    pub async fn generate_sql(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let initial_prompt = build_prompt(
            request.question(),
            request.schema_text(),
            request.history(),
            self.history,
            PromptMode::Initial,
        );

        let (completion_1, raw_1) = self
            .run_attempt(&initial_prompt)
            .await
            .wrap_err("initial generation attempt")?;

        let candidate = extract_sql(&completion_1);
        if is_plausible(&candidate, self.validation) {
            log::debug!("initial attempt produced plausible SQL");
            return Ok(GenerationResult {
                sql: candidate,
                explanation: None,
                raw_output: raw_1,
            });
        }

        log::debug!("initial attempt rejected, running repair attempt");
        let repair_prompt = build_prompt(
            request.question(),
            request.schema_text(),
            &[],
            self.history,
            PromptMode::Repair {
                previous_output: &completion_1,
            },
        );

        let (completion_2, raw_2) = self
            .run_attempt(&repair_prompt)
            .await
            .wrap_err("repair generation attempt")?;

        let raw_output = format!("{INITIAL_LABEL}\n{raw_1}\n\n{REPAIR_LABEL}\n{raw_2}");

        let candidate = extract_sql(&completion_2);
        if is_plausible(&candidate, self.validation) {
            log::debug!("repair attempt produced plausible SQL");
            return Ok(GenerationResult {
                sql: candidate,
                explanation: None,
                raw_output,
            });
        }

        log::warn!("both generation attempts failed to produce plausible SQL");
        Ok(GenerationResult {
            sql: FAILURE_SENTINEL.to_string(),
            explanation: None,
            raw_output,
        })
    }

    /// Run one oracle call, returning `(completion, raw)`. Some backends
    /// echo the prompt as a prefix of their output; the echoed part is
    /// stripped before extraction while the raw text is kept for
    /// diagnostics.
    async fn run_attempt(&self, prompt: &str) -> Result<(String, String)> {
        let raw = self
            .oracle
            .complete(prompt.to_string(), self.sampling)
            .await?;
        let completion = raw.strip_prefix(prompt).unwrap_or(&raw).to_string();
        Ok((completion, raw))
    }
}
