//! Scoring: the battle score ledger and chat spark points

use serde::{Deserialize, Serialize};

use super::answer::Answer;
use super::transcript::Seat;

/// Winner designation for a round or a whole encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    ParticipantA,
    ParticipantB,
    Tie,
}

impl Winner {
    pub fn from_seat(seat: Seat) -> Self {
        match seat {
            Seat::A => Winner::ParticipantA,
            Seat::B => Winner::ParticipantB,
        }
    }

    pub fn seat(&self) -> Option<Seat> {
        match self {
            Winner::ParticipantA => Some(Seat::A),
            Winner::ParticipantB => Some(Seat::B),
            Winner::Tie => None,
        }
    }

    /// Judge one round: a participant wins only if they matched the correct
    /// answer and the other did not.
    pub fn judge(answer_a: Answer, answer_b: Answer, correct: Answer) -> Self {
        match (answer_a == correct, answer_b == correct) {
            (true, false) => Winner::ParticipantA,
            (false, true) => Winner::ParticipantB,
            _ => Winner::Tie,
        }
    }
}

/// Record of one question-answer-reveal cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based round number
    pub round: u32,
    pub question: String,
    pub answer_a: Answer,
    pub answer_b: Answer,
    pub correct: Answer,
    pub winner: Winner,
}

/// Per-participant tally of rounds won
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    wins_a: u32,
    wins_b: u32,
    rounds: Vec<RoundResult>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a round and keep its record.
    pub fn record(
        &mut self,
        question: impl Into<String>,
        answer_a: Answer,
        answer_b: Answer,
        correct: Answer,
    ) -> RoundResult {
        let winner = Winner::judge(answer_a, answer_b, correct);
        match winner {
            Winner::ParticipantA => self.wins_a += 1,
            Winner::ParticipantB => self.wins_b += 1,
            Winner::Tie => {}
        }
        let result = RoundResult {
            round: self.rounds.len() as u32 + 1,
            question: question.into(),
            answer_a,
            answer_b,
            correct,
            winner,
        };
        self.rounds.push(result.clone());
        result
    }

    pub fn wins(&self, seat: Seat) -> u32 {
        match seat {
            Seat::A => self.wins_a,
            Seat::B => self.wins_b,
        }
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    /// Higher tally wins; equal tallies tie.
    pub fn leader(&self) -> Winner {
        match self.wins_a.cmp(&self.wins_b) {
            std::cmp::Ordering::Greater => Winner::ParticipantA,
            std::cmp::Ordering::Less => Winner::ParticipantB,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }
}

/// Point change applied to each participant when a chat settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDeltas {
    pub a: i64,
    pub b: i64,
}

/// Chat presentation score. Seeded per encounter, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparkPoints {
    pub a: i64,
    pub b: i64,
}

impl SparkPoints {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    pub fn get(&self, seat: Seat) -> i64 {
        match seat {
            Seat::A => self.a,
            Seat::B => self.b,
        }
    }

    /// Reward the winner and dock the loser.
    pub fn settle(&mut self, winner: Seat, win_points: i64, loss_points: i64) -> PointDeltas {
        let deltas = match winner {
            Seat::A => PointDeltas {
                a: win_points,
                b: -loss_points,
            },
            Seat::B => PointDeltas {
                a: -loss_points,
                b: win_points,
            },
        };
        self.a += deltas.a;
        self.b += deltas.b;
        deltas
    }
}

/// Final result of a concluded encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterOutcome {
    pub winner: Winner,
    pub wins_a: u32,
    pub wins_b: u32,
    /// Spark point changes (chats only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_deltas: Option<PointDeltas>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_rewards_sole_correct_answer() {
        assert_eq!(
            Winner::judge(Answer::Yes, Answer::No, Answer::Yes),
            Winner::ParticipantA
        );
        assert_eq!(
            Winner::judge(Answer::Yes, Answer::No, Answer::No),
            Winner::ParticipantB
        );
        assert_eq!(Winner::judge(Answer::No, Answer::No, Answer::Yes), Winner::Tie);
        assert_eq!(Winner::judge(Answer::Yes, Answer::Yes, Answer::Yes), Winner::Tie);
    }

    #[test]
    fn ledger_three_two_goes_to_three_side() {
        let mut ledger = ScoreLedger::new();
        ledger.record("q1", Answer::Yes, Answer::No, Answer::Yes);
        ledger.record("q2", Answer::Yes, Answer::No, Answer::Yes);
        ledger.record("q3", Answer::Yes, Answer::No, Answer::Yes);
        ledger.record("q4", Answer::Yes, Answer::No, Answer::No);
        ledger.record("q5", Answer::Yes, Answer::No, Answer::No);

        assert_eq!(ledger.wins(Seat::A), 3);
        assert_eq!(ledger.wins(Seat::B), 2);
        assert_eq!(ledger.leader(), Winner::ParticipantA);
        assert_eq!(ledger.rounds().len(), 5);
        assert_eq!(ledger.rounds()[4].round, 5);
    }

    #[test]
    fn empty_ledger_ties() {
        assert_eq!(ScoreLedger::new().leader(), Winner::Tie);
    }

    #[test]
    fn settle_applies_win_and_loss() {
        let mut points = SparkPoints::new(2450, 1890);
        let deltas = points.settle(Seat::B, 100, 50);
        assert_eq!(deltas, PointDeltas { a: -50, b: 100 });
        assert_eq!(points, SparkPoints::new(2400, 1990));
    }
}
