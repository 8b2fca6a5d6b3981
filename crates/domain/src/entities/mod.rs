//! Domain entities

mod islander;

pub use islander::{Appearance, Gender, Islander, IslanderStatus};
