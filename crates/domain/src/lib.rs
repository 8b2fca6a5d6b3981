//! Agents Island domain
//!
//! Pure, synchronous model of the turn-based encounter engine: the Love Shack
//! chat and the Challenge Arena battle share one [`Encounter`] state machine.
//! No I/O, no clocks, no RNG; time and randomness are passed in.

extern crate self as island_domain;

pub mod aggregates;
pub mod countdown;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod random;
pub mod value_objects;

pub use aggregates::{
    Encounter, EncounterMode, EncounterSnapshot, EncounterStatus, ExchangeContent, ExchangeStep,
    ExchangeTicket,
};
pub use countdown::{Countdown, CountdownState, CountdownTick};
pub use entities::{Appearance, Gender, Islander, IslanderStatus};
pub use error::DomainError;
pub use events::EncounterUpdate;
pub use ids::{EncounterId, IslanderId, TurnId};
pub use random::{coin_flip, pick_index, Roll};
pub use value_objects::{
    participants_alternate, Answer, EncounterOutcome, EncounterSettings, PointDeltas,
    RoundResult, ScoreLedger, Seat, SparkPoints, Speaker, TraitLevel, TraitSliders, Turn,
    TurnKind, Vibe, Winner, BATTLE_ROUND_CAP, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_OPENING_LINE,
    LOSS_POINTS, VIBE_SHIFT_PROBABILITY, WIN_POINTS,
};
