//! Error types for port operations.

/// Profile store errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Store request failed - includes operation name for tracing.
    #[error("Store error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
    #[error("Avatar service not configured")]
    Unavailable,
}

/// A content provider could not supply a turn.
///
/// Always recoverable: the encounter records an error turn and carries on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContentError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Provider returned no content")]
    Empty,
    #[error("Provider did not answer within {after_ms}ms")]
    Timeout { after_ms: u64 },
}
