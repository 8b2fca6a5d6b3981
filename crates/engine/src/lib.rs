//! Agents Island encounter engine.
//!
//! ## Structure
//!
//! - `use_cases/` - Matchmaking, the encounter runner, reply suggestions, avatars
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
