#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use crate::backend::{ArcOracle, Oracle};
use crate::config::{BackendConfig, user_agent};
use crate::models::SamplingConfig;
use async_trait::async_trait;
use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

/// Adapter for any OpenAI-compatible chat-completions endpoint. Holds
/// exclusive ownership of the backend handle: the HTTP client is built
/// once through a guarded one-time initialization and reused for every
/// call.
pub struct OpenAI {
    alias: String,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout: Option<time::Duration>,

    client: OnceCell<reqwest::Client>,
    // Present when the backend cannot take concurrent inference calls
    // (local single-slot servers). Correctness over throughput.
    inference_lock: Option<Mutex<()>>,
}

#[async_trait]
impl Oracle for OpenAI {
    fn name(&self) -> &str {
        &self.alias
    }

    async fn complete(&self, prompt: String, sampling: SamplingConfig) -> Result<String> {
        if self.model.is_empty() {
            bail!("no model is set");
        }

        let _guard = match self.inference_lock.as_ref() {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        // Temperature 0 means greedy decoding: top_p does not apply and
        // is omitted from the request.
        let top_p = if sampling.sampling_enabled() {
            Some(sampling.top_p())
        } else {
            None
        };

        let completion_req = CompletionRequest {
            model: self.model.clone(),
            messages: vec![MessageRequest {
                role: "user".to_string(),
                content: prompt,
            }],
            max_completion_tokens: sampling.max_new_tokens(),
            temperature: sampling.temperature(),
            top_p,
        };

        let mut req = self
            .client()
            .await?
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .header("Content-Type", "application/json");

        if let Some(token) = &self.api_key {
            req = req.bearer_auth(token);
        }

        log::trace!("sending completion request: {:?}", completion_req);

        let res = req.json(&completion_req).send().await.map_err(|e| {
            if e.is_timeout() {
                eyre::eyre!("generation timed out")
            } else {
                eyre::Report::new(e).wrap_err("sending completion request")
            }
        })?;

        if !res.status().is_success() {
            let http_code = res.status().as_u16();
            let resp = res.text().await.wrap_err("reading error response")?;
            log::error!("error response: {}", resp);
            let err = serde_json::from_str::<ErrorResponse>(&resp)
                .wrap_err(format!("parsing error response: {}", resp))?;
            let mut err = err.error;
            err.http_code = http_code;
            return Err(err.into());
        }

        let res = res
            .json::<CompletionResponse>()
            .await
            .wrap_err("parsing completion response")?;

        let choice = res
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("completion response has no choices"))?;

        Ok(choice.message.content)
    }
}

impl From<OpenAI> for ArcOracle {
    fn from(value: OpenAI) -> Self {
        std::sync::Arc::new(value)
    }
}

impl From<&BackendConfig> for OpenAI {
    fn from(value: &BackendConfig) -> Self {
        let mut openai = OpenAI::default()
            .with_endpoint(&value.endpoint)
            .with_model(&value.model);

        if let Some(api_key) = value.api_key.as_deref() {
            openai.api_key = Some(api_key.to_string());
        }

        if let Some(timeout_secs) = value.timeout_secs {
            openai.timeout = Some(time::Duration::from_secs(timeout_secs));
        }

        if let Some(alias) = value.alias.as_deref() {
            openai.alias = alias.to_string();
        }

        if value.serialize_requests {
            openai.inference_lock = Some(Mutex::new(()));
        }

        openai
    }
}

impl OpenAI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_serialized_inference(mut self) -> Self {
        self.inference_lock = Some(Mutex::new(()));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    /// Guarded one-time initialization of the shared HTTP client. Under
    /// concurrent first calls the cell guarantees a single construction;
    /// the handle is never reset afterwards.
    async fn client(&self) -> Result<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async {
                let mut builder = reqwest::Client::builder().user_agent(user_agent());
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().wrap_err("building http client")
            })
            .await
    }
}

impl Default for OpenAI {
    fn default() -> Self {
        Self {
            alias: "OpenAI".to_string(),
            endpoint: "https://api.openai.com".to_string(),
            api_key: None,
            model: String::new(),
            timeout: None,
            client: OnceCell::new(),
            inference_lock: None,
        }
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
struct MessageRequest {
    role: String,
    content: String,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<MessageRequest>,
    max_completion_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionChoiceResponse {
    message: MessageRequest,
    finish_reason: Option<String>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CompletionResponse {
    id: String,
    choices: Vec<CompletionChoiceResponse>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: OracleApiError,
}

#[derive(Default, Error, Debug, Serialize, Deserialize)]
pub struct OracleApiError {
    #[serde(skip)]
    pub http_code: u16,
    pub message: String,
    #[serde(rename = "type", default)]
    pub err_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl Display for OracleApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backend error ({}): {}", self.http_code, self.message)
    }
}
