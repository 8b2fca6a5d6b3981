//! Content providers for encounter turns.
//!
//! Static tables need nothing but a random source; the LLM-backed dialogue
//! source needs an [`LlmPort`](crate::infrastructure::ports::LlmPort).

pub mod dialogue_table;
pub mod llm_dialogue;
pub mod trivia_table;

pub use dialogue_table::StaticDialogueSource;
pub use llm_dialogue::LlmDialogueSource;
pub use trivia_table::StaticTriviaSource;
