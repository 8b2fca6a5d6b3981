//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Profile store access (could swap Supabase -> anything serving islander rows)
//! - LLM calls (could swap OpenAI -> Ollama or any compatible server)
//! - Avatar generation (could swap Replicate -> other)
//! - Turn content (static tables or generated)
//! - Clock/Random (for testing)

mod content;
mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::IslanderRepo;

// =============================================================================
// Content Ports
// =============================================================================
pub use content::{DialogueContext, DialogueSource, TriviaSource};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    AvatarPort, AvatarRequest, ChatMessage, FinishReason, LlmPort, LlmRequest, LlmResponse,
    MessageRole, TokenUsage,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use content::{MockDialogueSource, MockTriviaSource};
#[cfg(test)]
pub use external::{MockAvatarPort, MockLlmPort};
#[cfg(test)]
pub use repos::MockIslanderRepo;
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{AvatarError, ContentError, LlmError, RepoError};
