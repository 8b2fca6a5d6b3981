//! Encounter aggregate - one timed pairing between two islanders
//!
//! A single state machine drives both the Love Shack chat (dialogue mode) and
//! the Challenge Arena battle (trivia mode).
//!
//! # Lifecycle
//!
//! `Pending -> Active -> Concluded`. Concluded is terminal. Separately, an
//! encounter can be *abandoned* (the viewer left); every later transition is
//! then ignored.
//!
//! # Exchanges
//!
//! While active, the owner runs one exchange at a time:
//!
//! 1. [`Encounter::begin_exchange`] marks the next speaker as typing and hands
//!    out an [`ExchangeTicket`] naming the content to fetch.
//! 2. The owner fetches content from a provider.
//! 3. [`Encounter::complete_exchange`] (or [`Encounter::fail_exchange`])
//!    redeems the ticket, appends the turn and advances the state.
//!
//! Tickets carry a sequence number. A result for any ticket other than the one
//! in flight is rejected, so a late or duplicate fetch can never append.
//!
//! # Randomness
//!
//! Vibe shifts and the chat coin flip draw from a caller-supplied [`Roll`],
//! keeping the aggregate deterministic under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::countdown::{Countdown, CountdownTick};
use crate::error::DomainError;
use crate::events::EncounterUpdate;
use crate::ids::{EncounterId, IslanderId};
use crate::random::{coin_flip, Roll};
use crate::value_objects::{
    Answer, EncounterOutcome, EncounterSettings, RoundResult, ScoreLedger, Seat, SparkPoints,
    Speaker, Turn, TurnKind, Vibe, Winner,
};

/// Which flavour of encounter this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterMode {
    /// Love Shack chat: alternating dialogue lines under a mood overlay
    Dialogue,
    /// Challenge Arena battle: question, two answers, reveal
    Trivia,
}

impl fmt::Display for EncounterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterMode::Dialogue => f.write_str("dialogue"),
            EncounterMode::Trivia => f.write_str("trivia"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterStatus {
    Pending,
    Active,
    Concluded,
}

/// Content an exchange must fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeStep {
    /// A chat line for `speaker`, in the current vibe
    Line { speaker: Seat, vibe: Vibe },
    /// The question opening round `round` (1-based)
    Question { round: u32 },
    /// `speaker`'s answer to this round's question
    Answer {
        round: u32,
        speaker: Seat,
        question: String,
    },
    /// The correct answer for this round's question
    Reveal { round: u32, question: String },
}

impl ExchangeStep {
    pub fn speaker(&self) -> Speaker {
        match self {
            ExchangeStep::Line { speaker, .. } | ExchangeStep::Answer { speaker, .. } => {
                Speaker::Participant(*speaker)
            }
            ExchangeStep::Question { .. } | ExchangeStep::Reveal { .. } => Speaker::System,
        }
    }

    fn expects_answer(&self) -> bool {
        matches!(
            self,
            ExchangeStep::Answer { .. } | ExchangeStep::Reveal { .. }
        )
    }
}

/// Claim on the single in-flight exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeTicket {
    pub seq: u64,
    pub step: ExchangeStep,
}

/// Fetched content for an exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeContent {
    /// Dialogue line or question text
    Text(String),
    /// Participant answer or revealed correct answer
    Answer(Answer),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RoundProgress {
    question: Option<String>,
    answer_a: Option<Answer>,
    answer_b: Option<Answer>,
}

impl RoundProgress {
    fn answer(&self, seat: Seat) -> Option<Answer> {
        match seat {
            Seat::A => self.answer_a,
            Seat::B => self.answer_b,
        }
    }

    fn set_answer(&mut self, seat: Seat, answer: Answer) {
        match seat {
            Seat::A => self.answer_a = Some(answer),
            Seat::B => self.answer_b = Some(answer),
        }
    }
}

/// A timed encounter between two islanders
///
/// # Invariants
///
/// - Exactly two distinct participants; seat A acts first
/// - Participant turns strictly alternate A, B, A, B
/// - At most one exchange is in flight
/// - The transcript is append-only and frozen once concluded or abandoned
/// - `outcome` is `Some` exactly when the status is `Concluded`
#[derive(Debug, Clone)]
pub struct Encounter {
    id: EncounterId,
    mode: EncounterMode,
    settings: EncounterSettings,
    participants: [IslanderId; 2],
    status: EncounterStatus,

    // Turn state
    turn_owner: Seat,
    countdown: Countdown,
    transcript: Vec<Turn>,
    in_flight: Option<ExchangeTicket>,
    next_seq: u64,

    // Dialogue
    vibe: Vibe,
    points: SparkPoints,

    // Trivia
    round_index: u32,
    round: RoundProgress,
    ledger: ScoreLedger,

    conclude_pending: bool,
    abandoned: bool,
    outcome: Option<EncounterOutcome>,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
}

impl Encounter {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a pending encounter.
    ///
    /// # Errors
    /// - `InvalidParticipantPair` unless exactly two distinct ids are given
    /// - `Validation` for unusable settings
    pub fn new(
        id: EncounterId,
        mode: EncounterMode,
        settings: EncounterSettings,
        participants: &[IslanderId],
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let pair = match participants {
            [a, b] if a == b => {
                return Err(DomainError::invalid_pair(
                    "participants must be two different islanders",
                ))
            }
            [a, b] => [*a, *b],
            other => {
                return Err(DomainError::invalid_pair(format!(
                    "expected 2 participants, got {}",
                    other.len()
                )))
            }
        };
        settings.validate()?;

        Ok(Self {
            id,
            mode,
            settings,
            participants: pair,
            status: EncounterStatus::Pending,
            turn_owner: Seat::A,
            countdown: Countdown::new(),
            transcript: Vec::new(),
            in_flight: None,
            next_seq: 1,
            vibe: Vibe::default(),
            points: SparkPoints::default(),
            round_index: 0,
            round: RoundProgress::default(),
            ledger: ScoreLedger::new(),
            conclude_pending: false,
            abandoned: false,
            outcome: None,
            created_at: now,
            concluded_at: None,
        })
    }

    /// Love Shack chat with default settings
    pub fn chat(participants: &[IslanderId], now: DateTime<Utc>) -> Result<Self, DomainError> {
        Self::new(
            EncounterId::new(),
            EncounterMode::Dialogue,
            EncounterSettings::chat(),
            participants,
            now,
        )
    }

    /// Challenge Arena battle with default settings
    pub fn battle(participants: &[IslanderId], now: DateTime<Utc>) -> Result<Self, DomainError> {
        Self::new(
            EncounterId::new(),
            EncounterMode::Trivia,
            EncounterSettings::battle(),
            participants,
            now,
        )
    }

    /// Seed spark points (chat score display).
    pub fn with_points(mut self, points: SparkPoints) -> Self {
        self.points = points;
        self
    }

    /// Starting vibe for a chat.
    pub fn with_vibe(mut self, vibe: Vibe) -> Self {
        self.vibe = vibe;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> EncounterId {
        self.id
    }

    pub fn mode(&self) -> EncounterMode {
        self.mode
    }

    pub fn settings(&self) -> &EncounterSettings {
        &self.settings
    }

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn participants(&self) -> [IslanderId; 2] {
        self.participants
    }

    pub fn participant(&self, seat: Seat) -> IslanderId {
        self.participants[seat.index()]
    }

    pub fn seat_of(&self, islander: IslanderId) -> Option<Seat> {
        [Seat::A, Seat::B]
            .into_iter()
            .find(|seat| self.participant(*seat) == islander)
    }

    /// Seat that acts in the next participant exchange
    pub fn turn_owner(&self) -> Seat {
        self.turn_owner
    }

    /// Participant currently "typing", if the in-flight exchange is theirs
    pub fn typing(&self) -> Option<Seat> {
        self.in_flight
            .as_ref()
            .and_then(|ticket| ticket.step.speaker().seat())
    }

    pub fn in_flight(&self) -> Option<&ExchangeTicket> {
        self.in_flight.as_ref()
    }

    pub fn clock_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Completed battle rounds
    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn vibe(&self) -> Vibe {
        self.vibe
    }

    pub fn points(&self) -> SparkPoints {
        self.points
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn outcome(&self) -> Option<&EncounterOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_concluded(&self) -> bool {
        self.status == EncounterStatus::Concluded
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn concluded_at(&self) -> Option<DateTime<Utc>> {
        self.concluded_at
    }

    /// True when `begin_exchange` would hand out a ticket.
    pub fn can_begin_exchange(&self) -> bool {
        self.status == EncounterStatus::Active
            && !self.abandoned
            && !self.conclude_pending
            && !self.countdown.is_expired()
            && self.in_flight.is_none()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// `Pending -> Active`. Starts the countdown.
    ///
    /// A chat with an opening line has seat A say it straight away, which
    /// hands the first fetched line to seat B.
    pub fn activate(&mut self, now: DateTime<Utc>) -> Result<Vec<EncounterUpdate>, DomainError> {
        if self.abandoned || self.status != EncounterStatus::Pending {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot activate encounter in {:?} state",
                self.status
            )));
        }
        self.countdown.start(self.settings.duration_secs)?;
        self.status = EncounterStatus::Active;

        let mut updates = vec![EncounterUpdate::Activated];
        if self.mode == EncounterMode::Dialogue {
            if let Some(line) = self.settings.opening_line.clone() {
                let turn = Turn::new(Speaker::Participant(Seat::A), TurnKind::Line, line, now);
                updates.push(self.append(turn));
                self.turn_owner = Seat::B;
            }
        }
        Ok(updates)
    }

    /// Claim the next exchange.
    ///
    /// # Errors
    /// `InvalidStateTransition` when the encounter is not active, the clock
    /// has expired, or another exchange is still in flight.
    pub fn begin_exchange(&mut self) -> Result<ExchangeTicket, DomainError> {
        if !self.can_begin_exchange() {
            let reason = if self.in_flight.is_some() {
                "an exchange is already in flight".to_string()
            } else {
                format!(
                    "no exchange possible (status {:?}, abandoned {}, clock {}s)",
                    self.status,
                    self.abandoned,
                    self.countdown.remaining()
                )
            };
            return Err(DomainError::invalid_state_transition(reason));
        }

        let step = self.next_step();
        let ticket = ExchangeTicket {
            seq: self.next_seq,
            step,
        };
        self.next_seq += 1;
        self.in_flight = Some(ticket.clone());
        Ok(ticket)
    }

    /// Redeem a ticket with fetched content.
    ///
    /// Results for an abandoned encounter are discarded without effect.
    ///
    /// # Errors
    /// - `StaleExchange` if `ticket` is not the one in flight
    /// - `Validation` if the content kind does not fit the step; the exchange
    ///   stays in flight so the caller can fail it instead
    pub fn complete_exchange(
        &mut self,
        ticket: &ExchangeTicket,
        content: ExchangeContent,
        now: DateTime<Utc>,
        roll: Roll<'_>,
    ) -> Result<Vec<EncounterUpdate>, DomainError> {
        if self.abandoned {
            return Ok(vec![EncounterUpdate::Discarded { seq: ticket.seq }]);
        }
        self.check_in_flight(ticket)?;

        let expects_answer = ticket.step.expects_answer();
        match (&content, expects_answer) {
            (ExchangeContent::Text(_), false) | (ExchangeContent::Answer(_), true) => {}
            _ => {
                return Err(DomainError::validation(format!(
                    "content {:?} does not fit step {:?}",
                    content, ticket.step
                )))
            }
        }

        let mut updates = Vec::new();
        let step = ticket.step.clone();
        self.in_flight = None;

        match (step, content) {
            (ExchangeStep::Line { speaker, .. }, ExchangeContent::Text(line)) => {
                let turn = Turn::new(Speaker::Participant(speaker), TurnKind::Line, line, now);
                updates.push(self.append(turn));
                self.turn_owner = speaker.other();

                let from = self.vibe;
                let to = from.maybe_shift(&mut *roll);
                if to != from {
                    self.vibe = to;
                    updates.push(EncounterUpdate::VibeChanged { from, to });
                }
            }
            (ExchangeStep::Question { round }, ExchangeContent::Text(question)) => {
                let label = match self.settings.round_cap {
                    Some(cap) => format!("Question {}/{}: {}", round, cap, question),
                    None => format!("Question {}: {}", round, question),
                };
                updates.push(self.append(Turn::system(TurnKind::Question, label, now)));
                self.round.question = Some(question);
            }
            (ExchangeStep::Answer { speaker, .. }, ExchangeContent::Answer(answer)) => {
                let turn = Turn::new(
                    Speaker::Participant(speaker),
                    TurnKind::Answer,
                    answer.as_str(),
                    now,
                );
                updates.push(self.append(turn));
                self.round.set_answer(speaker, answer);
                self.turn_owner = speaker.other();
            }
            (ExchangeStep::Reveal { question, .. }, ExchangeContent::Answer(correct)) => {
                let text = format!("The correct answer is: {}", correct);
                updates.push(self.append(Turn::system(TurnKind::Reveal, text, now)));
                updates.push(self.score_round(question, correct));
                if self
                    .settings
                    .round_cap
                    .is_some_and(|cap| self.round_index >= cap)
                {
                    updates.push(self.conclude(now, &mut *roll));
                }
            }
            // Kinds were checked against the step above
            _ => {}
        }

        if self.conclude_pending && self.status == EncounterStatus::Active {
            updates.push(self.conclude(now, roll));
        }
        Ok(updates)
    }

    /// Redeem a ticket whose fetch failed.
    ///
    /// Appends a system error turn and keeps the turn with the same owner, so
    /// the next exchange retries it. The encounter stays active.
    pub fn fail_exchange(
        &mut self,
        ticket: &ExchangeTicket,
        message: impl Into<String>,
        now: DateTime<Utc>,
        roll: Roll<'_>,
    ) -> Result<Vec<EncounterUpdate>, DomainError> {
        if self.abandoned {
            return Ok(vec![EncounterUpdate::Discarded { seq: ticket.seq }]);
        }
        self.check_in_flight(ticket)?;
        self.in_flight = None;

        let mut updates = vec![self.append(Turn::system(TurnKind::Error, message, now))];
        if self.conclude_pending && self.status == EncounterStatus::Active {
            updates.push(self.conclude(now, roll));
        }
        Ok(updates)
    }

    /// Advance the countdown by one second.
    ///
    /// On expiry the encounter concludes, unless an exchange is in flight, in
    /// which case conclusion waits for that exchange to be redeemed.
    pub fn tick(&mut self, now: DateTime<Utc>, roll: Roll<'_>) -> Vec<EncounterUpdate> {
        if self.abandoned || self.status != EncounterStatus::Active {
            return Vec::new();
        }
        match self.countdown.tick() {
            CountdownTick::Ticked { remaining } => vec![EncounterUpdate::ClockTicked { remaining }],
            CountdownTick::Expired => {
                let mut updates = vec![EncounterUpdate::ClockExpired];
                if self.in_flight.is_some() {
                    self.conclude_pending = true;
                    updates.push(EncounterUpdate::ConclusionDeferred);
                } else {
                    updates.push(self.conclude(now, roll));
                }
                updates
            }
            CountdownTick::Idle => Vec::new(),
        }
    }

    /// The viewer left. Stops the clock and drops any in-flight exchange.
    /// Idempotent.
    pub fn abandon(&mut self) -> Vec<EncounterUpdate> {
        if self.abandoned {
            return Vec::new();
        }
        self.countdown.stop();
        self.in_flight = None;
        self.conclude_pending = false;
        self.abandoned = true;
        vec![EncounterUpdate::Abandoned]
    }

    /// Immutable view of the current state
    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            id: self.id,
            mode: self.mode,
            status: self.status,
            participants: self.participants,
            turn_owner: self.turn_owner,
            typing: self.typing(),
            clock_remaining: self.countdown.remaining(),
            transcript: self.transcript.clone(),
            round_index: self.round_index,
            vibe: match self.mode {
                EncounterMode::Dialogue => Some(self.vibe),
                EncounterMode::Trivia => None,
            },
            wins_a: self.ledger.wins(Seat::A),
            wins_b: self.ledger.wins(Seat::B),
            rounds: self.ledger.rounds().to_vec(),
            points: match self.mode {
                EncounterMode::Dialogue => Some(self.points),
                EncounterMode::Trivia => None,
            },
            outcome: self.outcome.clone(),
            abandoned: self.abandoned,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn next_step(&self) -> ExchangeStep {
        match self.mode {
            EncounterMode::Dialogue => ExchangeStep::Line {
                speaker: self.turn_owner,
                vibe: self.vibe,
            },
            EncounterMode::Trivia => {
                let round = self.round_index + 1;
                match &self.round.question {
                    None => ExchangeStep::Question { round },
                    Some(question) if self.round.answer(self.turn_owner).is_none() => {
                        ExchangeStep::Answer {
                            round,
                            speaker: self.turn_owner,
                            question: question.clone(),
                        }
                    }
                    Some(question) => ExchangeStep::Reveal {
                        round,
                        question: question.clone(),
                    },
                }
            }
        }
    }

    fn check_in_flight(&self, ticket: &ExchangeTicket) -> Result<(), DomainError> {
        match &self.in_flight {
            Some(current) if current.seq == ticket.seq => Ok(()),
            current => Err(DomainError::StaleExchange {
                expected: current.as_ref().map(|t| t.seq),
                got: ticket.seq,
            }),
        }
    }

    fn append(&mut self, turn: Turn) -> EncounterUpdate {
        self.transcript.push(turn.clone());
        EncounterUpdate::TurnAppended { turn }
    }

    fn score_round(&mut self, question: String, correct: Answer) -> EncounterUpdate {
        let progress = std::mem::take(&mut self.round);
        // Both answers precede every reveal
        let answer_a = progress.answer_a.unwrap_or(Answer::No);
        let answer_b = progress.answer_b.unwrap_or(Answer::No);
        let result: RoundResult = self.ledger.record(question, answer_a, answer_b, correct);
        self.round_index += 1;
        EncounterUpdate::RoundScored { result }
    }

    fn conclude(&mut self, now: DateTime<Utc>, roll: Roll<'_>) -> EncounterUpdate {
        self.countdown.stop();
        self.in_flight = None;
        self.conclude_pending = false;

        let (winner, point_deltas) = match self.mode {
            EncounterMode::Trivia => (self.ledger.leader(), None),
            EncounterMode::Dialogue => {
                let seat = if coin_flip(roll()) { Seat::A } else { Seat::B };
                let deltas =
                    self.points
                        .settle(seat, self.settings.win_points, self.settings.loss_points);
                (Winner::from_seat(seat), Some(deltas))
            }
        };

        let outcome = EncounterOutcome {
            winner,
            wins_a: self.ledger.wins(Seat::A),
            wins_b: self.ledger.wins(Seat::B),
            point_deltas,
        };
        self.status = EncounterStatus::Concluded;
        self.concluded_at = Some(now);
        self.outcome = Some(outcome.clone());
        EncounterUpdate::Concluded { outcome }
    }
}

/// Serializable, point-in-time view of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub id: EncounterId,
    pub mode: EncounterMode,
    pub status: EncounterStatus,
    pub participants: [IslanderId; 2],
    pub turn_owner: Seat,
    pub typing: Option<Seat>,
    pub clock_remaining: u32,
    pub transcript: Vec<Turn>,
    pub round_index: u32,
    pub vibe: Option<Vibe>,
    pub wins_a: u32,
    pub wins_b: u32,
    pub rounds: Vec<RoundResult>,
    pub points: Option<SparkPoints>,
    pub outcome: Option<EncounterOutcome>,
    pub abandoned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::sequence;
    use crate::value_objects::{participants_alternate, DEFAULT_OPENING_LINE};

    fn pair() -> [IslanderId; 2] {
        [IslanderId::new(), IslanderId::new()]
    }

    fn never() -> impl FnMut() -> f64 {
        || 0.99
    }

    fn active_chat(settings: EncounterSettings) -> Encounter {
        let mut encounter = Encounter::new(
            EncounterId::new(),
            EncounterMode::Dialogue,
            settings,
            &pair(),
            Utc::now(),
        )
        .expect("valid encounter");
        encounter.activate(Utc::now()).expect("activate");
        encounter
    }

    fn active_battle() -> Encounter {
        let mut encounter = Encounter::battle(&pair(), Utc::now()).expect("valid encounter");
        encounter.activate(Utc::now()).expect("activate");
        encounter
    }

    fn say(encounter: &mut Encounter, line: &str, roll: Roll<'_>) -> Vec<EncounterUpdate> {
        let ticket = encounter.begin_exchange().expect("ticket");
        encounter
            .complete_exchange(
                &ticket,
                ExchangeContent::Text(line.to_string()),
                Utc::now(),
                roll,
            )
            .expect("complete")
    }

    fn redeem(encounter: &mut Encounter, content: ExchangeContent) -> Vec<EncounterUpdate> {
        let ticket = encounter.begin_exchange().expect("ticket");
        encounter
            .complete_exchange(&ticket, content, Utc::now(), &mut never())
            .expect("complete")
    }

    fn play_round(
        encounter: &mut Encounter,
        answer_a: Answer,
        answer_b: Answer,
        correct: Answer,
    ) -> Vec<EncounterUpdate> {
        redeem(encounter, ExchangeContent::Text("Is it better to be loved or feared?".into()));
        redeem(encounter, ExchangeContent::Answer(answer_a));
        redeem(encounter, ExchangeContent::Answer(answer_b));
        redeem(encounter, ExchangeContent::Answer(correct))
    }

    fn run_clock(encounter: &mut Encounter, ticks: u32, roll: Roll<'_>) -> Vec<EncounterUpdate> {
        let mut updates = Vec::new();
        for _ in 0..ticks {
            updates.extend(encounter.tick(Utc::now(), &mut *roll));
        }
        updates
    }

    fn participant_turns(encounter: &Encounter) -> Vec<&Turn> {
        encounter
            .transcript()
            .iter()
            .filter(|t| !t.speaker.is_system())
            .collect()
    }

    #[test]
    fn rejects_equal_participants() {
        let id = IslanderId::new();
        let err = Encounter::chat(&[id, id], Utc::now()).expect_err("should fail");
        assert!(matches!(err, DomainError::InvalidParticipantPair(_)));
    }

    #[test]
    fn rejects_wrong_participant_count() {
        let one = Encounter::chat(&[IslanderId::new()], Utc::now()).expect_err("should fail");
        assert!(matches!(one, DomainError::InvalidParticipantPair(_)));

        let three = Encounter::battle(
            &[IslanderId::new(), IslanderId::new(), IslanderId::new()],
            Utc::now(),
        )
        .expect_err("should fail");
        assert!(matches!(three, DomainError::InvalidParticipantPair(_)));
    }

    #[test]
    fn starts_pending_and_refuses_exchanges() {
        let mut encounter = Encounter::chat(&pair(), Utc::now()).expect("valid");
        assert_eq!(encounter.status(), EncounterStatus::Pending);
        assert!(!encounter.can_begin_exchange());
        assert!(encounter.begin_exchange().is_err());
        assert!(encounter.tick(Utc::now(), &mut never()).is_empty());
    }

    #[test]
    fn activation_is_one_way() {
        let mut encounter = active_chat(EncounterSettings::chat());
        assert_eq!(encounter.status(), EncounterStatus::Active);
        assert_eq!(encounter.clock_remaining(), 30);
        assert!(matches!(
            encounter.activate(Utc::now()),
            Err(DomainError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn chat_opener_comes_from_seat_a() {
        let encounter = active_chat(EncounterSettings::chat());
        let first = &encounter.transcript()[0];
        assert_eq!(first.speaker, Speaker::Participant(Seat::A));
        assert_eq!(first.content, DEFAULT_OPENING_LINE);
        assert_eq!(encounter.turn_owner(), Seat::B);
    }

    #[test]
    fn only_one_exchange_in_flight() {
        let mut encounter = active_chat(EncounterSettings::chat());
        let ticket = encounter.begin_exchange().expect("ticket");
        assert_eq!(encounter.typing(), Some(Seat::B));
        assert!(!encounter.can_begin_exchange());
        assert!(matches!(
            encounter.begin_exchange(),
            Err(DomainError::InvalidStateTransition(_))
        ));

        encounter
            .complete_exchange(
                &ticket,
                ExchangeContent::Text("hi".into()),
                Utc::now(),
                &mut never(),
            )
            .expect("complete");
        assert_eq!(encounter.typing(), None);
        assert!(encounter.can_begin_exchange());
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut encounter = active_chat(EncounterSettings::chat());
        let first = encounter.begin_exchange().expect("ticket");
        encounter
            .complete_exchange(
                &first,
                ExchangeContent::Text("one".into()),
                Utc::now(),
                &mut never(),
            )
            .expect("complete");

        let _second = encounter.begin_exchange().expect("ticket");
        let err = encounter
            .complete_exchange(
                &first,
                ExchangeContent::Text("again".into()),
                Utc::now(),
                &mut never(),
            )
            .expect_err("should fail");
        assert_eq!(
            err,
            DomainError::StaleExchange {
                expected: Some(2),
                got: 1
            }
        );
        assert_eq!(encounter.transcript().len(), 2);
    }

    #[test]
    fn mismatched_content_leaves_exchange_in_flight() {
        let mut encounter = active_battle();
        let ticket = encounter.begin_exchange().expect("ticket");
        let err = encounter
            .complete_exchange(
                &ticket,
                ExchangeContent::Answer(Answer::Yes),
                Utc::now(),
                &mut never(),
            )
            .expect_err("should fail");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(encounter.in_flight(), Some(&ticket));
        assert!(encounter.transcript().is_empty());
    }

    #[test]
    fn ten_exchanges_alternate_from_seat_a() {
        let mut encounter = active_chat(EncounterSettings::chat().without_opening_line());
        let mut roll = sequence(vec![0.5, 0.1, 0.3, 0.9, 0.15, 0.6]);
        let mut vibe_changes = 0;
        for i in 0..10 {
            let updates = say(&mut encounter, &format!("line {}", i), &mut roll);
            vibe_changes += updates
                .iter()
                .filter(|u| matches!(u, EncounterUpdate::VibeChanged { .. }))
                .count();
        }
        run_clock(&mut encounter, 30, &mut roll);

        let turns = participant_turns(&encounter);
        assert_eq!(turns.len(), 10);
        assert_eq!(turns[0].speaker, Speaker::Participant(Seat::A));
        assert!(participants_alternate(encounter.transcript()));
        assert!(vibe_changes <= 10);
        assert!(encounter.is_concluded());
    }

    #[test]
    fn timed_chat_scenario_matches_cadence() {
        // 2.5 s cadence, 1 s typing delay, 1 s clock; clock handled before
        // completions, completions before new exchanges.
        let settings = EncounterSettings::chat();
        let mut encounter = active_chat(settings.clone());
        let mut roll = never();
        let mut in_flight: Option<(u64, ExchangeTicket)> = None;
        let mut completed = 0;

        for t in (500..=40_000u64).step_by(500) {
            if t % 1_000 == 0 {
                encounter.tick(Utc::now(), &mut roll);
            }
            if let Some((started, ticket)) = in_flight.take() {
                if t >= started + settings.typing_delay_ms {
                    encounter
                        .complete_exchange(
                            &ticket,
                            ExchangeContent::Text(format!("line at {}", t)),
                            Utc::now(),
                            &mut roll,
                        )
                        .expect("complete");
                    completed += 1;
                } else {
                    in_flight = Some((started, ticket));
                }
            }
            if t % settings.cadence_ms == 0 && encounter.can_begin_exchange() {
                in_flight = Some((t, encounter.begin_exchange().expect("ticket")));
            }
        }

        assert_eq!(completed, 11);
        let turns = participant_turns(&encounter);
        assert_eq!(turns.len(), 12);
        assert_eq!(turns[0].speaker, Speaker::Participant(Seat::A));
        assert!(participants_alternate(encounter.transcript()));
        assert!(encounter.is_concluded());
    }

    #[test]
    fn never_triggering_roll_keeps_vibe() {
        let mut encounter =
            active_chat(EncounterSettings::chat()).with_vibe(Vibe::Fun);
        let mut roll = never();
        for _ in 0..25 {
            let updates = say(&mut encounter, "still fun", &mut roll);
            assert!(!updates
                .iter()
                .any(|u| matches!(u, EncounterUpdate::VibeChanged { .. })));
        }
        assert_eq!(encounter.vibe(), Vibe::Fun);
    }

    #[test]
    fn vibe_shift_moves_to_a_different_vibe() {
        let mut encounter = active_chat(EncounterSettings::chat());
        let mut roll = sequence(vec![0.05, 0.0, 0.99]);
        let updates = say(&mut encounter, "ooh", &mut roll);
        assert!(updates.contains(&EncounterUpdate::VibeChanged {
            from: Vibe::Romantic,
            to: Vibe::Flirty,
        }));
        assert_eq!(encounter.vibe(), Vibe::Flirty);
    }

    #[test]
    fn chat_expiry_settles_by_coin_flip() {
        let mut encounter = active_chat(EncounterSettings::chat())
            .with_points(SparkPoints::new(2450, 1890));
        say(&mut encounter, "hello", &mut never());

        // 0.3 lands heads: seat A wins
        let updates = run_clock(&mut encounter, 30, &mut || 0.3);
        assert!(updates.contains(&EncounterUpdate::ClockExpired));

        let outcome = encounter.outcome().expect("outcome");
        assert_eq!(outcome.winner, Winner::ParticipantA);
        assert_eq!(
            outcome.point_deltas,
            Some(crate::value_objects::PointDeltas { a: 100, b: -50 })
        );
        assert_eq!(encounter.points(), SparkPoints::new(2550, 1840));
    }

    #[test]
    fn chat_coin_flip_can_favour_seat_b() {
        let mut encounter = active_chat(EncounterSettings::chat())
            .with_points(SparkPoints::new(2450, 1890));
        run_clock(&mut encounter, 30, &mut || 0.7);
        assert_eq!(
            encounter.outcome().map(|o| o.winner),
            Some(Winner::ParticipantB)
        );
        assert_eq!(encounter.points(), SparkPoints::new(2400, 1990));
    }

    #[test]
    fn clock_ticks_down_once_per_second() {
        let mut encounter = active_chat(EncounterSettings::chat().with_duration_secs(5));
        let updates = run_clock(&mut encounter, 3, &mut never());
        assert_eq!(
            updates,
            vec![
                EncounterUpdate::ClockTicked { remaining: 4 },
                EncounterUpdate::ClockTicked { remaining: 3 },
                EncounterUpdate::ClockTicked { remaining: 2 },
            ]
        );
        assert_eq!(encounter.clock_remaining(), 2);

        let rest = run_clock(&mut encounter, 10, &mut never());
        let expiries = rest
            .iter()
            .filter(|u| matches!(u, EncounterUpdate::ClockExpired))
            .count();
        assert_eq!(expiries, 1);
        assert_eq!(encounter.clock_remaining(), 0);
    }

    #[test]
    fn in_flight_turn_lands_before_conclusion() {
        let mut encounter = active_chat(EncounterSettings::chat().with_duration_secs(2));
        let ticket = encounter.begin_exchange().expect("ticket");

        let updates = run_clock(&mut encounter, 2, &mut never());
        assert!(updates.contains(&EncounterUpdate::ConclusionDeferred));
        assert_eq!(encounter.status(), EncounterStatus::Active);
        assert!(!encounter.can_begin_exchange());

        let updates = encounter
            .complete_exchange(
                &ticket,
                ExchangeContent::Text("made it".into()),
                Utc::now(),
                &mut never(),
            )
            .expect("complete");
        assert!(matches!(updates[0], EncounterUpdate::TurnAppended { .. }));
        assert!(updates.last().is_some_and(EncounterUpdate::is_conclusion));
        assert_eq!(
            encounter.transcript().last().map(|t| t.content.as_str()),
            Some("made it")
        );
        assert!(encounter.is_concluded());
    }

    #[test]
    fn failed_in_flight_exchange_still_concludes_after_expiry() {
        let mut encounter = active_chat(EncounterSettings::chat().with_duration_secs(2));
        let ticket = encounter.begin_exchange().expect("ticket");

        let updates = run_clock(&mut encounter, 2, &mut never());
        assert!(updates.contains(&EncounterUpdate::ConclusionDeferred));
        assert!(encounter.outcome().is_none());

        let updates = encounter
            .fail_exchange(&ticket, "Failed to generate chat message", Utc::now(), &mut never())
            .expect("fail");
        assert!(matches!(updates[0], EncounterUpdate::TurnAppended { .. }));
        assert!(updates.last().is_some_and(EncounterUpdate::is_conclusion));
        assert_eq!(
            encounter.transcript().last().map(|t| t.kind),
            Some(TurnKind::Error)
        );
        assert!(encounter.is_concluded());
        assert!(encounter.outcome().is_some());
        assert!(encounter.in_flight().is_none());
    }

    #[test]
    fn concluded_encounter_accepts_no_turns() {
        let mut encounter = active_chat(EncounterSettings::chat().with_duration_secs(1));
        run_clock(&mut encounter, 1, &mut never());
        assert!(encounter.is_concluded());
        let len = encounter.transcript().len();

        assert!(encounter.begin_exchange().is_err());
        assert!(encounter.tick(Utc::now(), &mut never()).is_empty());
        let forged = ExchangeTicket {
            seq: 1,
            step: ExchangeStep::Line {
                speaker: Seat::B,
                vibe: Vibe::Fun,
            },
        };
        assert!(encounter
            .complete_exchange(
                &forged,
                ExchangeContent::Text("late".into()),
                Utc::now(),
                &mut never()
            )
            .is_err());
        assert_eq!(encounter.transcript().len(), len);
        assert!(encounter.activate(Utc::now()).is_err());
    }

    #[test]
    fn abandon_suppresses_in_flight_append() {
        let mut encounter = active_chat(EncounterSettings::chat());
        let ticket = encounter.begin_exchange().expect("ticket");
        let len = encounter.transcript().len();

        assert_eq!(encounter.abandon(), vec![EncounterUpdate::Abandoned]);
        assert!(encounter.abandon().is_empty());

        let updates = encounter
            .complete_exchange(
                &ticket,
                ExchangeContent::Text("too late".into()),
                Utc::now(),
                &mut never(),
            )
            .expect("discard");
        assert_eq!(updates, vec![EncounterUpdate::Discarded { seq: ticket.seq }]);
        assert_eq!(encounter.transcript().len(), len);
        assert!(encounter.tick(Utc::now(), &mut never()).is_empty());
        assert_eq!(encounter.clock_remaining(), 30);
        assert!(encounter.outcome().is_none());
    }

    #[test]
    fn failed_exchange_keeps_owner_and_encounter() {
        let mut encounter = active_chat(EncounterSettings::chat());
        let ticket = encounter.begin_exchange().expect("ticket");
        let updates = encounter
            .fail_exchange(&ticket, "Failed to generate response", Utc::now(), &mut never())
            .expect("fail");

        match &updates[0] {
            EncounterUpdate::TurnAppended { turn } => {
                assert_eq!(turn.speaker, Speaker::System);
                assert_eq!(turn.kind, TurnKind::Error);
            }
            other => panic!("unexpected update {:?}", other),
        }
        assert_eq!(encounter.status(), EncounterStatus::Active);
        assert_eq!(encounter.turn_owner(), Seat::B);

        say(&mut encounter, "retry", &mut never());
        assert_eq!(
            participant_turns(&encounter)[1].speaker,
            Speaker::Participant(Seat::B)
        );
        assert!(participants_alternate(encounter.transcript()));
    }

    #[test]
    fn trivia_steps_follow_question_answers_reveal() {
        let mut encounter = active_battle();
        let question = encounter.begin_exchange().expect("ticket");
        assert_eq!(question.step, ExchangeStep::Question { round: 1 });
        encounter
            .complete_exchange(
                &question,
                ExchangeContent::Text("Is free will real or an illusion?".into()),
                Utc::now(),
                &mut never(),
            )
            .expect("question");
        assert_eq!(
            encounter.transcript()[0].content,
            "Question 1/5: Is free will real or an illusion?"
        );

        let a = encounter.begin_exchange().expect("ticket");
        assert!(matches!(a.step, ExchangeStep::Answer { speaker: Seat::A, .. }));
        encounter
            .complete_exchange(&a, ExchangeContent::Answer(Answer::Yes), Utc::now(), &mut never())
            .expect("answer a");

        let b = encounter.begin_exchange().expect("ticket");
        assert!(matches!(b.step, ExchangeStep::Answer { speaker: Seat::B, .. }));
        encounter
            .complete_exchange(&b, ExchangeContent::Answer(Answer::No), Utc::now(), &mut never())
            .expect("answer b");

        let reveal = encounter.begin_exchange().expect("ticket");
        assert!(matches!(reveal.step, ExchangeStep::Reveal { round: 1, .. }));
        let updates = encounter
            .complete_exchange(
                &reveal,
                ExchangeContent::Answer(Answer::Yes),
                Utc::now(),
                &mut never(),
            )
            .expect("reveal");

        assert_eq!(
            encounter.transcript().last().map(|t| t.content.as_str()),
            Some("The correct answer is: Yes")
        );
        let scored = updates.iter().find_map(|u| match u {
            EncounterUpdate::RoundScored { result } => Some(result.winner),
            _ => None,
        });
        assert_eq!(scored, Some(Winner::ParticipantA));
        assert_eq!(encounter.ledger().wins(Seat::A), 1);
        assert_eq!(encounter.ledger().wins(Seat::B), 0);
        assert_eq!(encounter.round_index(), 1);
    }

    #[test]
    fn five_rounds_conclude_with_majority() {
        let mut encounter = active_battle();
        play_round(&mut encounter, Answer::Yes, Answer::No, Answer::Yes);
        play_round(&mut encounter, Answer::No, Answer::Yes, Answer::Yes);
        play_round(&mut encounter, Answer::Yes, Answer::No, Answer::Yes);
        play_round(&mut encounter, Answer::No, Answer::Yes, Answer::Yes);
        assert_eq!(encounter.status(), EncounterStatus::Active);
        let updates = play_round(&mut encounter, Answer::No, Answer::Yes, Answer::No);

        assert!(updates.last().is_some_and(EncounterUpdate::is_conclusion));
        assert_eq!(encounter.status(), EncounterStatus::Concluded);
        let outcome = encounter.outcome().expect("outcome");
        assert_eq!(outcome.winner, Winner::ParticipantA);
        assert_eq!((outcome.wins_a, outcome.wins_b), (3, 2));
        assert_eq!(outcome.point_deltas, None);
        assert!(encounter.begin_exchange().is_err());
        assert!(participants_alternate(encounter.transcript()));
    }

    #[test]
    fn all_tied_rounds_tie_the_battle() {
        let mut encounter = active_battle();
        for correct in [Answer::Yes, Answer::No, Answer::Yes, Answer::No, Answer::Yes] {
            play_round(&mut encounter, Answer::Yes, Answer::Yes, correct);
        }
        let outcome = encounter.outcome().expect("outcome");
        assert_eq!(outcome.winner, Winner::Tie);
        assert_eq!((outcome.wins_a, outcome.wins_b), (0, 0));
    }

    #[test]
    fn battle_expiry_uses_ledger() {
        let mut encounter = active_battle();
        play_round(&mut encounter, Answer::No, Answer::Yes, Answer::Yes);
        run_clock(&mut encounter, 30, &mut never());
        let outcome = encounter.outcome().expect("outcome");
        assert_eq!(outcome.winner, Winner::ParticipantB);
        assert_eq!(encounter.round_index(), 1);
    }

    #[test]
    fn snapshot_reflects_state_and_serializes() {
        let mut encounter = active_chat(EncounterSettings::chat());
        let _ticket = encounter.begin_exchange().expect("ticket");
        let snapshot = encounter.snapshot();
        assert_eq!(snapshot.status, EncounterStatus::Active);
        assert_eq!(snapshot.typing, Some(Seat::B));
        assert_eq!(snapshot.vibe, Some(Vibe::Romantic));
        assert_eq!(snapshot.transcript.len(), 1);

        let json = serde_json::to_string(&snapshot).expect("serialize");
        let back: EncounterSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snapshot);
    }

    #[test]
    fn seat_lookup_matches_participants() {
        let [a, b] = pair();
        let encounter = Encounter::chat(&[a, b], Utc::now()).expect("valid");
        assert_eq!(encounter.seat_of(a), Some(Seat::A));
        assert_eq!(encounter.seat_of(b), Some(Seat::B));
        assert_eq!(encounter.seat_of(IslanderId::new()), None);
    }
}
