use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use chrono::Duration;

use crate::accommodations::{RepositoryError, UserId};
use crate::identity::domain::{LoginForm, RegistrationForm, UserAccount};
use crate::identity::repository::UserAccountRepository;
use crate::identity::service::IdentityService;
use crate::identity::session::SessionStore;

pub(super) const PASSWORD: &str = "s3cret-pass";

#[derive(Default, Clone)]
pub(super) struct MemoryAccounts {
    accounts: Arc<Mutex<HashMap<UserId, UserAccount>>>,
}

impl MemoryAccounts {
    pub(super) fn all(&self) -> Vec<UserAccount> {
        self.accounts
            .lock()
            .expect("accounts mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserAccountRepository for MemoryAccounts {
    async fn insert(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(account.id, account);
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

/// Repository whose writes always lose a race on the username.
pub(super) struct RacingAccounts;

#[async_trait]
impl UserAccountRepository for RacingAccounts {
    async fn insert(&self, _account: UserAccount) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    async fn find_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct OfflineAccounts;

#[async_trait]
impl UserAccountRepository for OfflineAccounts {
    async fn insert(&self, _account: UserAccount) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<UserAccount>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Minimal-cost argon2 so tests do not pay production hashing parameters.
pub(super) fn fast_hasher() -> Argon2<'static> {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("valid argon2 params");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

pub(super) fn build_service<R>(accounts: R) -> IdentityService<R>
where
    R: UserAccountRepository + 'static,
{
    IdentityService::with_hasher(
        Arc::new(accounts),
        Arc::new(SessionStore::new(Duration::minutes(30))),
        fast_hasher(),
    )
}

pub(super) fn registration(username: &str, landlord: bool) -> RegistrationForm {
    RegistrationForm {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
        is_landlord: landlord,
    }
}

pub(super) fn login(username: &str, password: &str) -> LoginForm {
    LoginForm {
        username: username.to_string(),
        password: password.to_string(),
    }
}
