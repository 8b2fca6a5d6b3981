//! Encounter use cases.
//!
//! The flow is:
//! 1. Matchmaking builds a pending encounter (StartChat / StartBattle)
//! 2. The runner activates it and drives turns on its own task
//! 3. Observers follow snapshots until it concludes or is cancelled

use std::sync::Arc;

mod runner;
mod start;

pub use runner::{EncounterHandle, EncounterRunner, BATTLE_FETCH_FAILED, CHAT_FETCH_FAILED};
pub use start::{EncounterError, PreparedEncounter, StartBattle, StartChat};

/// Container for encounter use cases.
pub struct EncounterUseCases {
    pub start_chat: Arc<StartChat>,
    pub start_battle: Arc<StartBattle>,
    pub runner: Arc<EncounterRunner>,
}

impl EncounterUseCases {
    pub fn new(
        start_chat: Arc<StartChat>,
        start_battle: Arc<StartBattle>,
        runner: Arc<EncounterRunner>,
    ) -> Self {
        Self {
            start_chat,
            start_battle,
            runner,
        }
    }

    /// Matchmake a chat for `wallet_address` and start running it.
    pub async fn chat(&self, wallet_address: &str) -> Result<EncounterHandle, EncounterError> {
        let prepared = self.start_chat.execute(wallet_address).await?;
        self.runner.spawn(prepared)
    }

    /// Matchmake a battle for `wallet_address` and start running it.
    pub async fn battle(&self, wallet_address: &str) -> Result<EncounterHandle, EncounterError> {
        let prepared = self.start_battle.execute(wallet_address).await?;
        self.runner.spawn(prepared)
    }
}
