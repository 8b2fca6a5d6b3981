//! Matchmaking use cases.
//!
//! Resolve the viewer's islander from their wallet, pick a partner from the
//! profile store and build a pending encounter. The caller hands the result
//! to the [`EncounterRunner`](super::EncounterRunner).

use std::sync::Arc;

use island_domain::{
    DomainError, Encounter, EncounterId, EncounterMode, EncounterSettings, Islander, SparkPoints,
};

use crate::infrastructure::ports::{ClockPort, IslanderRepo, RepoError};

/// A pending encounter plus the two profiles seated in it, A first.
#[derive(Debug, Clone)]
pub struct PreparedEncounter {
    pub encounter: Encounter,
    pub islanders: [Islander; 2],
}

impl PreparedEncounter {
    pub fn id(&self) -> EncounterId {
        self.encounter.id()
    }
}

/// Start a Love Shack chat.
///
/// The viewer's islander takes seat A and is paired with the most popular
/// single islander of the preferred gender.
pub struct StartChat {
    islanders: Arc<dyn IslanderRepo>,
    clock: Arc<dyn ClockPort>,
    settings: EncounterSettings,
}

impl StartChat {
    pub fn new(
        islanders: Arc<dyn IslanderRepo>,
        clock: Arc<dyn ClockPort>,
        settings: EncounterSettings,
    ) -> Self {
        Self {
            islanders,
            clock,
            settings,
        }
    }

    pub async fn execute(&self, wallet_address: &str) -> Result<PreparedEncounter, EncounterError> {
        let me = resolve_wallet(self.islanders.as_ref(), wallet_address).await?;

        let partner = self
            .islanders
            .find_match(me.id, me.gender.match_preference())
            .await?
            .ok_or(EncounterError::NoMatch)?;

        let encounter = Encounter::new(
            EncounterId::new(),
            EncounterMode::Dialogue,
            self.settings.clone(),
            &[me.id, partner.id],
            self.clock.now(),
        )?
        .with_points(SparkPoints::new(me.score, partner.score));

        tracing::info!(
            encounter_id = %encounter.id(),
            islander = %me.name,
            partner = %partner.name,
            "Chat encounter prepared"
        );

        Ok(PreparedEncounter {
            encounter,
            islanders: [me, partner],
        })
    }
}

/// Start a Challenge Arena battle against the most popular other islander.
pub struct StartBattle {
    islanders: Arc<dyn IslanderRepo>,
    clock: Arc<dyn ClockPort>,
    settings: EncounterSettings,
}

impl StartBattle {
    pub fn new(
        islanders: Arc<dyn IslanderRepo>,
        clock: Arc<dyn ClockPort>,
        settings: EncounterSettings,
    ) -> Self {
        Self {
            islanders,
            clock,
            settings,
        }
    }

    pub async fn execute(&self, wallet_address: &str) -> Result<PreparedEncounter, EncounterError> {
        let me = resolve_wallet(self.islanders.as_ref(), wallet_address).await?;

        let opponent = self
            .islanders
            .find_opponent(me.id)
            .await?
            .ok_or(EncounterError::NoOpponent)?;

        let encounter = Encounter::new(
            EncounterId::new(),
            EncounterMode::Trivia,
            self.settings.clone(),
            &[me.id, opponent.id],
            self.clock.now(),
        )?;

        tracing::info!(
            encounter_id = %encounter.id(),
            islander = %me.name,
            opponent = %opponent.name,
            "Battle encounter prepared"
        );

        Ok(PreparedEncounter {
            encounter,
            islanders: [me, opponent],
        })
    }
}

async fn resolve_wallet(
    islanders: &dyn IslanderRepo,
    wallet_address: &str,
) -> Result<Islander, EncounterError> {
    let wallet = wallet_address.trim();
    if wallet.is_empty() {
        return Err(EncounterError::MissingWallet);
    }
    islanders
        .get_by_wallet(wallet)
        .await?
        .ok_or_else(|| EncounterError::IslanderNotFound(wallet.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum EncounterError {
    #[error("Wallet address is required")]
    MissingWallet,
    #[error("No islander registered for wallet {0}")]
    IslanderNotFound(String),
    #[error("No match available")]
    NoMatch,
    #[error("No opponent available")]
    NoOpponent,
    #[error("Encounter task failed: {0}")]
    Task(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
