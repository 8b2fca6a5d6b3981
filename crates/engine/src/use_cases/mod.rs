//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area.

pub mod ai;
pub mod assets;
pub mod encounter;

pub use ai::AiUseCases;
pub use assets::AssetUseCases;
pub use encounter::EncounterUseCases;
