use async_trait::async_trait;

use super::domain::UserAccount;
use crate::accommodations::{RepositoryError, UserId};

/// Account storage used by registration and login.
///
/// `insert` reports [`RepositoryError::Conflict`] when the username is already taken.
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    async fn insert(&self, account: UserAccount) -> Result<(), RepositoryError>;
    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserAccount>, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, RepositoryError>;
}
