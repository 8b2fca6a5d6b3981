//! Encounter runner - one tokio task per live encounter.
//!
//! The task owns the [`Encounter`] outright and multiplexes four event
//! sources in a single `select!` loop: cancellation, the one-second clock,
//! the in-flight exchange, and the exchange cadence. Observers read state
//! through a `watch` channel of snapshots.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use island_domain::{
    Encounter, EncounterId, EncounterMode, EncounterSnapshot, EncounterUpdate, ExchangeContent,
    ExchangeStep, ExchangeTicket, Islander, Seat,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::start::{EncounterError, PreparedEncounter};
use crate::infrastructure::ports::{
    ClockPort, ContentError, DialogueContext, DialogueSource, RandomPort, TriviaSource,
};

/// Notice appended when a chat line could not be produced
pub const CHAT_FETCH_FAILED: &str = "Failed to generate chat message";

/// Notice appended when battle content could not be produced
pub const BATTLE_FETCH_FAILED: &str = "Failed to fetch battle content";

type ExchangeResult = (ExchangeTicket, Result<ExchangeContent, ContentError>);
type ExchangeFuture = Pin<Box<dyn Future<Output = ExchangeResult> + Send>>;

/// Spawns encounter tasks wired to a fixed set of providers.
pub struct EncounterRunner {
    dialogue: Arc<dyn DialogueSource>,
    trivia: Arc<dyn TriviaSource>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl EncounterRunner {
    pub fn new(
        dialogue: Arc<dyn DialogueSource>,
        trivia: Arc<dyn TriviaSource>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            dialogue,
            trivia,
            clock,
            random,
        }
    }

    /// Activate the encounter and start driving it on a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, prepared: PreparedEncounter) -> Result<EncounterHandle, EncounterError> {
        let PreparedEncounter {
            mut encounter,
            islanders,
        } = prepared;

        let updates = encounter.activate(self.clock.now())?;
        let id = encounter.id();
        tracing::info!(
            encounter_id = %id,
            mode = %encounter.mode(),
            duration_secs = encounter.settings().duration_secs,
            "Encounter started"
        );
        log_updates(id, &updates);

        let (snapshots, receiver) = watch::channel(encounter.snapshot());
        let cancel = CancellationToken::new();

        let task = EncounterTask {
            encounter,
            islanders,
            dialogue: self.dialogue.clone(),
            trivia: self.trivia.clone(),
            clock: self.clock.clone(),
            random: self.random.clone(),
            snapshots,
            cancel: cancel.clone(),
        };

        Ok(EncounterHandle {
            id,
            snapshots: receiver,
            cancel,
            task: tokio::spawn(task.run()),
        })
    }
}

/// Observer and controller for a running encounter.
pub struct EncounterHandle {
    id: EncounterId,
    snapshots: watch::Receiver<EncounterSnapshot>,
    cancel: CancellationToken,
    task: JoinHandle<EncounterSnapshot>,
}

impl EncounterHandle {
    pub fn id(&self) -> EncounterId {
        self.id
    }

    /// Most recently published state
    pub fn snapshot(&self) -> EncounterSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that wakes on every published change
    pub fn subscribe(&self) -> watch::Receiver<EncounterSnapshot> {
        self.snapshots.clone()
    }

    /// The viewer left. Any in-flight fetch is dropped without appending.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to end and return the final state.
    pub async fn join(self) -> Result<EncounterSnapshot, EncounterError> {
        self.task
            .await
            .map_err(|e| EncounterError::Task(e.to_string()))
    }
}

struct EncounterTask {
    encounter: Encounter,
    islanders: [Islander; 2],
    dialogue: Arc<dyn DialogueSource>,
    trivia: Arc<dyn TriviaSource>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    snapshots: watch::Sender<EncounterSnapshot>,
    cancel: CancellationToken,
}

impl EncounterTask {
    async fn run(mut self) -> EncounterSnapshot {
        let id = self.encounter.id();
        let start = Instant::now();

        let second = Duration::from_secs(1);
        let mut clock_tick = interval_at(start + second, second);

        let cadence_period = Duration::from_millis(self.encounter.settings().cadence_ms);
        let mut cadence = interval_at(start + cadence_period, cadence_period);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<ExchangeFuture> = None;

        while !self.encounter.is_concluded() {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    // Dropping the future discards whatever it would have appended
                    drop(in_flight.take());
                    let updates = self.encounter.abandon();
                    log_updates(id, &updates);
                    tracing::info!(encounter_id = %id, "Encounter abandoned");
                    self.publish();
                    break;
                }

                _ = clock_tick.tick() => {
                    let updates = {
                        let random = self.random.clone();
                        let mut roll = move || random.gen_unit();
                        self.encounter.tick(self.clock.now(), &mut roll)
                    };
                    log_updates(id, &updates);
                    self.publish();
                }

                (ticket, result) = poll_exchange(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    self.redeem(ticket, result);
                    self.publish();
                }

                _ = cadence.tick(), if in_flight.is_none() && self.encounter.can_begin_exchange() => {
                    match self.encounter.begin_exchange() {
                        Ok(ticket) => {
                            tracing::debug!(
                                encounter_id = %id,
                                seq = ticket.seq,
                                step = ?ticket.step,
                                "Exchange started"
                            );
                            in_flight = Some(self.fetch(ticket));
                            self.publish();
                        }
                        Err(e) => {
                            tracing::warn!(encounter_id = %id, error = %e, "Could not start exchange");
                        }
                    }
                }
            }
        }

        if let Some(outcome) = self.encounter.outcome() {
            tracing::info!(
                encounter_id = %id,
                winner = ?outcome.winner,
                wins_a = outcome.wins_a,
                wins_b = outcome.wins_b,
                deltas = ?outcome.point_deltas,
                turns = self.encounter.transcript().len(),
                "Encounter concluded"
            );
        }
        self.publish();
        self.encounter.snapshot()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.encounter.snapshot());
    }

    /// Apply a finished fetch. Provider failures become error turns.
    fn redeem(&mut self, ticket: ExchangeTicket, result: Result<ExchangeContent, ContentError>) {
        let id = self.encounter.id();
        let now = self.clock.now();
        let notice = self.failure_notice();
        let random = self.random.clone();
        let mut roll = move || random.gen_unit();

        let applied = match result {
            Ok(content) => match self
                .encounter
                .complete_exchange(&ticket, content, now, &mut roll)
            {
                Ok(updates) => Ok(updates),
                Err(e) => {
                    tracing::warn!(encounter_id = %id, seq = ticket.seq, error = %e, "Exchange rejected");
                    self.encounter
                        .fail_exchange(&ticket, notice, now, &mut roll)
                }
            },
            Err(e) => {
                tracing::warn!(encounter_id = %id, seq = ticket.seq, error = %e, "Content fetch failed");
                self.encounter
                    .fail_exchange(&ticket, notice, now, &mut roll)
            }
        };

        match applied {
            Ok(updates) => log_updates(id, &updates),
            Err(e) => tracing::error!(encounter_id = %id, error = %e, "Failed to apply exchange"),
        }
    }

    fn failure_notice(&self) -> &'static str {
        match self.encounter.mode() {
            EncounterMode::Dialogue => CHAT_FETCH_FAILED,
            EncounterMode::Trivia => BATTLE_FETCH_FAILED,
        }
    }

    /// Build the future for one exchange: the typing pause, then the fetch.
    ///
    /// The fetch is cut off after `fetch_timeout_ms` so a stalled provider
    /// cannot hold an expired encounter open.
    fn fetch(&self, ticket: ExchangeTicket) -> ExchangeFuture {
        let typing_delay = Duration::from_millis(self.encounter.settings().typing_delay_ms);
        let fetch_timeout_ms = self.encounter.settings().fetch_timeout_ms;
        let [a, b] = self.islanders.clone();
        let dialogue = self.dialogue.clone();
        let trivia = self.trivia.clone();

        let context = match &ticket.step {
            ExchangeStep::Line { speaker, vibe } => {
                let (me, other) = match speaker {
                    Seat::A => (a.clone(), b.clone()),
                    Seat::B => (b.clone(), a.clone()),
                };
                Some(DialogueContext {
                    vibe: *vibe,
                    speaker_seat: *speaker,
                    speaker: me,
                    listener: other,
                    transcript: self.encounter.transcript().to_vec(),
                })
            }
            _ => None,
        };

        Box::pin(async move {
            tokio::time::sleep(typing_delay).await;

            let provide = async {
                match (&ticket.step, context) {
                    (ExchangeStep::Line { .. }, Some(context)) => dialogue
                        .next_line(&context)
                        .await
                        .map(ExchangeContent::Text),
                    (ExchangeStep::Question { .. }, _) => trivia
                        .next_question(&a, &b)
                        .await
                        .map(ExchangeContent::Text),
                    (ExchangeStep::Answer {
                        speaker, question, ..
                    }, _) => {
                        let islander = match speaker {
                            Seat::A => &a,
                            Seat::B => &b,
                        };
                        trivia
                            .answer_for(islander, question)
                            .await
                            .map(ExchangeContent::Answer)
                    }
                    (ExchangeStep::Reveal { question, .. }, _) => trivia
                        .reveal_correct_answer(question)
                        .await
                        .map(ExchangeContent::Answer),
                    (ExchangeStep::Line { .. }, None) => Err(ContentError::Empty),
                }
            };

            let result = tokio::time::timeout(Duration::from_millis(fetch_timeout_ms), provide)
                .await
                .unwrap_or(Err(ContentError::Timeout {
                    after_ms: fetch_timeout_ms,
                }));
            (ticket, result)
        })
    }
}

async fn poll_exchange(in_flight: &mut Option<ExchangeFuture>) -> ExchangeResult {
    match in_flight.as_mut() {
        Some(exchange) => exchange.await,
        None => std::future::pending().await,
    }
}

fn log_updates(id: EncounterId, updates: &[EncounterUpdate]) {
    for update in updates {
        match update {
            EncounterUpdate::TurnAppended { turn } => tracing::debug!(
                encounter_id = %id,
                speaker = ?turn.speaker,
                kind = ?turn.kind,
                content = %turn.content,
                "Turn appended"
            ),
            EncounterUpdate::ClockTicked { remaining } => {
                tracing::trace!(encounter_id = %id, remaining, "Clock ticked")
            }
            EncounterUpdate::Discarded { seq } => {
                tracing::debug!(encounter_id = %id, seq, "Late exchange discarded")
            }
            other => tracing::debug!(encounter_id = %id, update = ?other, "Encounter updated"),
        }
    }
}
