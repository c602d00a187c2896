//! Generation client — routes requests to Ollama or an OpenAI-compatible
//! API.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::error::BackendError;
use crate::types::{GenRequest, GenResponse};

/// Provider backend for text generation.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Ollama running locally.
    Ollama {
        /// Base URL, e.g. `http://localhost:11434`.
        base_url: String,
    },
    /// OpenAI-compatible completion API.
    OpenAiCompatible {
        /// Base URL of the API.
        base_url: String,
        /// Bearer token.
        api_key: String,
    },
    /// No backend — every call errors, triggering the engine's
    /// in-character fallback.
    None,
}

/// The generation client. One HTTP request per `generate` call; retry
/// policy is the caller's concern.
pub struct GenClient {
    provider: Provider,
    http: Client,
    model: String,
}

impl GenClient {
    /// Create a client for the given provider and model.
    #[must_use]
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
        }
    }

    /// Client with no backend configured.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Provider::None, "")
    }

    /// Whether a real backend is configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, Provider::None)
    }

    /// Send one generation request.
    ///
    /// # Errors
    /// Returns a [`BackendError`] on transport failure, timeout, non-2xx
    /// status, or an unparseable body. The caller maps all of these to its
    /// fallback path.
    pub async fn generate(&self, request: &GenRequest) -> Result<GenResponse, BackendError> {
        match &self.provider {
            Provider::None => Err(BackendError::Unavailable(
                "no generation provider configured".into(),
            )),
            Provider::Ollama { base_url } => self.generate_ollama(base_url, request).await,
            Provider::OpenAiCompatible { base_url, api_key } => {
                self.generate_openai(base_url, api_key, request).await
            }
        }
    }

    async fn generate_ollama(
        &self,
        base_url: &str,
        request: &GenRequest,
    ) -> Result<GenResponse, BackendError> {
        let url = format!("{base_url}/api/generate");
        let body = json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "top_p": request.top_p,
                "top_k": request.top_k,
                "num_predict": request.max_new_tokens,
                "repeat_last_n": request.no_repeat_ngram,
                "stop": request.stop,
            }
        });

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .timeout(Duration::from_millis(request.timeout_ms))
            .send()
            .await
            .map_err(|e| classify(e, request.timeout_ms))?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(%status, "ollama returned error status");
            return Err(BackendError::RequestFailed(format!("HTTP {status}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        Ok(GenResponse {
            text: json["response"].as_str().unwrap_or("").to_string(),
            tokens_generated: json["eval_count"].as_u64().unwrap_or(0) as u32,
            latency_ms,
            model: self.model.clone(),
        })
    }

    async fn generate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        request: &GenRequest,
    ) -> Result<GenResponse, BackendError> {
        let url = format!("{base_url}/v1/completions");
        let body = json!({
            "model": self.model,
            "prompt": request.prompt,
            "max_tokens": request.max_new_tokens,
            "temperature": request.temperature,
            "top_p": request.top_p,
            "stop": request.stop,
        });

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .timeout(Duration::from_millis(request.timeout_ms))
            .send()
            .await
            .map_err(|e| classify(e, request.timeout_ms))?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(%status, "completion API returned error status");
            return Err(BackendError::RequestFailed(format!("HTTP {status}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        Ok(GenResponse {
            text: json["choices"][0]["text"].as_str().unwrap_or("").to_string(),
            tokens_generated: json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
            latency_ms,
            model: self.model.clone(),
        })
    }

}

fn classify(err: reqwest::Error, timeout_ms: u64) -> BackendError {
    if err.is_timeout() {
        warn!(timeout_ms, "generation request timed out");
        BackendError::Timeout(timeout_ms)
    } else {
        warn!(error = %err, "generation request failed");
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn none_provider_always_errors() {
        let client = GenClient::none();
        assert!(!client.is_available());
        let err = client
            .generate(&GenRequest::new("prompt"))
            .await
            .expect_err("none provider must fail");
        assert!(matches!(err, BackendError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_host_classified_as_unavailable() {
        let client = GenClient::new(
            Provider::Ollama {
                // Reserved TEST-NET address; nothing listens here.
                base_url: "http://192.0.2.1:1".to_string(),
            },
            "test-model",
        );
        let err = client
            .generate(&GenRequest::new("prompt").with_timeout(200))
            .await
            .expect_err("unreachable host must fail");
        assert!(matches!(
            err,
            BackendError::Unavailable(_) | BackendError::Timeout(_) | BackendError::RequestFailed(_)
        ));
    }
}
