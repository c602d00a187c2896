//! # Glasshouse LLM Client
//!
//! Thin HTTP client for the external text-generation backend. Supports
//! Ollama and any OpenAI-compatible completion API, plus a `None` provider
//! that always errors so the engine exercises its in-character fallback
//! path offline.
//!
//! The retry-with-temperature-ramp policy lives in the core pipeline, not
//! here — this crate makes exactly one request per [`GenClient::generate`]
//! call, with per-call sampling parameter overrides.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{GenClient, Provider};
pub use error::BackendError;
pub use types::{GenRequest, GenResponse};
