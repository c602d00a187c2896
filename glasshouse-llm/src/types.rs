//! Request and response types for the generation backend.

use serde::{Deserialize, Serialize};

/// One generation request.
///
/// Every sampling knob is per-call so the engine can ramp temperature
/// across validation retries without touching shared client state.
#[derive(Debug, Clone, Serialize)]
pub struct GenRequest {
    /// The full prompt (persona framing, context, player line).
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum new tokens to generate.
    pub max_new_tokens: u32,
    /// No-repeat n-gram constraint size (0 disables).
    pub no_repeat_ngram: u32,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Stop sequences; generation halts before emitting any of these.
    pub stop: Vec<String>,
}

impl GenRequest {
    /// A request with the reference sampling defaults.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.7,
            top_p: 0.85,
            top_k: 40,
            max_new_tokens: 100,
            no_repeat_ngram: 3,
            timeout_ms: 5000,
            stop: vec!["\n".to_string()],
        }
    }

    /// Override the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// One generation response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenResponse {
    /// The generated continuation (no prompt echo).
    pub text: String,
    /// How many tokens were generated, when the backend reports it.
    pub tokens_generated: u32,
    /// Round-trip latency in milliseconds.
    pub latency_ms: u64,
    /// Which model served the request.
    pub model: String,
}
