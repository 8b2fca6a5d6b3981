//! Value objects - Immutable objects defined by their attributes

mod answer;
mod score;
mod settings;
mod traits;
mod transcript;
mod vibe;

pub use answer::Answer;
pub use score::{EncounterOutcome, PointDeltas, RoundResult, ScoreLedger, SparkPoints, Winner};
pub use settings::{
    EncounterSettings, BATTLE_ROUND_CAP, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_OPENING_LINE, LOSS_POINTS,
    WIN_POINTS,
};
pub use traits::{TraitLevel, TraitSliders};
pub use transcript::{participants_alternate, Seat, Speaker, Turn, TurnKind};
pub use vibe::{Vibe, VIBE_SHIFT_PROBABILITY};
