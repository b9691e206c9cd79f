use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::domain::{AccommodationId, AccommodationRecord, User, UserId};

/// Storage abstraction for accommodation records.
///
/// Implementations are expected to observe `cancel` and return [`RepositoryError::Cancelled`]
/// once it fires.
#[async_trait]
pub trait AccommodationRepository: Send + Sync {
    async fn create(
        &self,
        record: AccommodationRecord,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError>;
    async fn update(
        &self,
        record: AccommodationRecord,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError>;
    async fn delete(
        &self,
        id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError>;
    async fn fetch(
        &self,
        id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<Option<AccommodationRecord>, RepositoryError>;
    async fn list(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<AccommodationRecord>, RepositoryError>;
}

/// Read-only view of users used by the authorization checks.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn get_by_id_with_accommodations(
        &self,
        id: UserId,
    ) -> Result<Option<User>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("operation cancelled")]
    Cancelled,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
