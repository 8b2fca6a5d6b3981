//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod content_sources;
pub mod memory;
pub mod openai;
pub mod ports;
pub mod replicate;
pub mod supabase;
