//! Profile store port.

use async_trait::async_trait;
use island_domain::{Gender, Islander, IslanderId};

use super::error::RepoError;

// =============================================================================
// Islander Profiles (read-only)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IslanderRepo: Send + Sync {
    async fn get(&self, id: IslanderId) -> Result<Option<Islander>, RepoError>;
    async fn get_by_wallet(&self, wallet_address: &str) -> Result<Option<Islander>, RepoError>;

    /// Most popular single islander of `gender`, other than `exclude`.
    async fn find_match(
        &self,
        exclude: IslanderId,
        gender: Gender,
    ) -> Result<Option<Islander>, RepoError>;

    /// Most popular islander other than `exclude`.
    async fn find_opponent(&self, exclude: IslanderId) -> Result<Option<Islander>, RepoError>;
}
