//! Error types for the glasshouse engine.

use thiserror::Error;

/// Top-level error type for engine operations.
///
/// Note that [`DialogueEngine::generate`](crate::DialogueEngine::generate)
/// never surfaces any of these to the caller — every failure there maps to
/// an in-character fallback line. These variants exist for the operations
/// that do return `Result` (status lookups, config loading) and for the
/// backend seam.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The requested NPC id is not in the registry.
    #[error("Unknown NPC: {0}")]
    UnknownNpc(crate::NpcId),

    /// The external generation backend failed (timeout, transport, HTTP).
    #[error("Generation backend error: {0}")]
    Backend(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, EngineError>;
