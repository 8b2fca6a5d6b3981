//! Unified error types for the domain layer
//!
//! Every failure the encounter core can report is a variant here. Content
//! fetch failures are not domain errors: they are recorded as system turns
//! and the encounter carries on.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An encounter needs exactly two distinct participants
    #[error("Invalid participant pair: {0}")]
    InvalidParticipantPair(String),

    /// `Countdown::start` called while the countdown is already ticking
    #[error("Clock is already running")]
    ClockAlreadyRunning,

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A completion arrived for an exchange that is no longer in flight
    #[error("Stale exchange: expected #{expected:?}, got #{got}")]
    StaleExchange { expected: Option<u64>, got: u64 },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants or constraints are violated:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Islander name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid participant pair error
    pub fn invalid_pair(msg: impl Into<String>) -> Self {
        Self::InvalidParticipantPair(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}
