pub mod openai;

pub use openai::OpenAI;

#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::config::BackendConfig;
use crate::models::SamplingConfig;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;

/// The text-generation backend, treated as an opaque non-deterministic
/// completion oracle. Initialization and inference failures are fatal
/// for the request; retries on content quality happen one level up.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Oracle {
    fn name(&self) -> &str;

    /// Run one completion call. Returns the backend's raw output, which
    /// may or may not echo the prompt as a prefix; callers must not
    /// assume either.
    async fn complete(&self, prompt: String, sampling: SamplingConfig) -> Result<String>;
}

pub type ArcOracle = Arc<dyn Oracle + Send + Sync>;

pub fn new_oracle(config: &BackendConfig) -> Result<ArcOracle> {
    if config.endpoint.is_empty() {
        eyre::bail!("no backend endpoint configured");
    }

    let oracle: OpenAI = config.into();
    log::debug!("using backend {} at {}", oracle.name(), config.endpoint);
    Ok(Arc::new(oracle))
}
