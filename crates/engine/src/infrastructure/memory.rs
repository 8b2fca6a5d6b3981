//! In-memory profile store
//!
//! Backs the engine when no Supabase project is configured, and seeds the
//! demo roster used by the binary.

use async_trait::async_trait;
use island_domain::{Gender, Islander, IslanderId, TraitLevel, TraitSliders};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{IslanderRepo, RepoError};

#[derive(Default)]
pub struct InMemoryIslanderRepo {
    islanders: RwLock<Vec<Islander>>,
}

impl InMemoryIslanderRepo {
    pub fn new(islanders: Vec<Islander>) -> Self {
        Self {
            islanders: RwLock::new(islanders),
        }
    }

    /// A small roster so encounters can run without a profile store.
    pub fn with_demo_roster() -> Self {
        Self::new(demo_roster())
    }

    pub async fn insert(&self, islander: Islander) {
        self.islanders.write().await.push(islander);
    }

    async fn most_popular<F>(&self, predicate: F) -> Option<Islander>
    where
        F: Fn(&Islander) -> bool,
    {
        self.islanders
            .read()
            .await
            .iter()
            .filter(|islander| predicate(islander))
            .max_by_key(|islander| islander.popularity)
            .cloned()
    }
}

#[async_trait]
impl IslanderRepo for InMemoryIslanderRepo {
    async fn get(&self, id: IslanderId) -> Result<Option<Islander>, RepoError> {
        Ok(self
            .islanders
            .read()
            .await
            .iter()
            .find(|islander| islander.id == id)
            .cloned())
    }

    async fn get_by_wallet(&self, wallet_address: &str) -> Result<Option<Islander>, RepoError> {
        Ok(self
            .islanders
            .read()
            .await
            .iter()
            .find(|islander| islander.wallet_address.as_deref() == Some(wallet_address))
            .cloned())
    }

    async fn find_match(
        &self,
        exclude: IslanderId,
        gender: Gender,
    ) -> Result<Option<Islander>, RepoError> {
        Ok(self
            .most_popular(|islander| {
                islander.id != exclude && islander.gender == gender && islander.is_single()
            })
            .await)
    }

    async fn find_opponent(&self, exclude: IslanderId) -> Result<Option<Islander>, RepoError> {
        Ok(self.most_popular(|islander| islander.id != exclude).await)
    }
}

fn demo_roster() -> Vec<Islander> {
    let dating = |confidence, humor, intelligence, kindness, charisma| {
        TraitSliders::new()
            .with("confidence", TraitLevel::clamped(confidence))
            .with("humor", TraitLevel::clamped(humor))
            .with("intelligence", TraitLevel::clamped(intelligence))
            .with("kindness", TraitLevel::clamped(kindness))
            .with("charisma", TraitLevel::clamped(charisma))
    };

    vec![
        Islander::new("Sarah", Gender::Female)
            .with_wallet("0xdemo-sarah")
            .with_personality("adventurous")
            .with_traits(dating(8, 7, 8, 6, 9))
            .with_score(2450)
            .with_popularity(42),
        Islander::new("Mike", Gender::Male)
            .with_wallet("0xdemo-mike")
            .with_personality("laid-back")
            .with_traits(dating(6, 9, 7, 8, 7))
            .with_score(1890)
            .with_popularity(37),
        Islander::new("Jade", Gender::Female)
            .with_wallet("0xdemo-jade")
            .with_personality("witty")
            .with_traits(dating(7, 9, 9, 5, 6))
            .with_score(2100)
            .with_popularity(29),
    ]
}
