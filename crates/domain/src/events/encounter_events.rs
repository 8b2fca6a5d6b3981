//! Encounter mutation outcomes.

use crate::value_objects::{EncounterOutcome, RoundResult, Turn, Vibe};

/// What happened when an encounter transition was applied.
///
/// Transitions return these in the order they took effect, so a caller can
/// replay them onto a view without diffing snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum EncounterUpdate {
    Activated,
    TurnAppended { turn: Turn },
    VibeChanged { from: Vibe, to: Vibe },
    RoundScored { result: RoundResult },
    ClockTicked { remaining: u32 },
    ClockExpired,
    /// Clock hit zero with an exchange in flight; concludes after its append
    ConclusionDeferred,
    Concluded { outcome: EncounterOutcome },
    Abandoned,
    /// Result for an abandoned encounter, dropped without effect
    Discarded { seq: u64 },
}

impl EncounterUpdate {
    pub fn is_conclusion(&self) -> bool {
        matches!(self, EncounterUpdate::Concluded { .. })
    }
}
