use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use property_search::accommodations::{
    AccommodationId, AccommodationRecord, AccommodationRepository, RepositoryError, User,
    UserId, UserLookup,
};
use property_search::identity::{UserAccount, UserAccountRepository};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local storage backing accounts, the user lookup and accommodation records.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStore {
    accounts: Arc<Mutex<HashMap<UserId, UserAccount>>>,
    accommodations: Arc<Mutex<BTreeMap<AccommodationId, AccommodationRecord>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), RepositoryError> {
    if cancel.is_cancelled() {
        Err(RepositoryError::Cancelled)
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryStore {
    async fn insert(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = lock(&self.accounts)?;
        if accounts
            .values()
            .any(|existing| existing.username.eq_ignore_ascii_case(&account.username))
        {
            return Err(RepositoryError::Conflict);
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        let accounts = lock(&self.accounts)?;
        Ok(accounts
            .values()
            .find(|account| account.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(lock(&self.accounts)?.get(&id).cloned())
    }
}

#[async_trait]
impl UserLookup for InMemoryStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(lock(&self.accounts)?.get(&id).map(UserAccount::as_user))
    }

    async fn get_by_id_with_accommodations(
        &self,
        id: UserId,
    ) -> Result<Option<User>, RepositoryError> {
        let Some(mut user) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        user.accommodations = lock(&self.accommodations)?
            .values()
            .filter(|record| record.user_id == id)
            .map(|record| record.id)
            .collect();
        Ok(Some(user))
    }
}

#[async_trait]
impl AccommodationRepository for InMemoryStore {
    async fn create(
        &self,
        record: AccommodationRecord,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError> {
        ensure_live(cancel)?;
        let mut records = lock(&self.accommodations)?;
        if records.contains_key(&record.id) {
            return Ok(false);
        }
        records.insert(record.id, record);
        Ok(true)
    }

    async fn update(
        &self,
        record: AccommodationRecord,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError> {
        ensure_live(cancel)?;
        let mut records = lock(&self.accommodations)?;
        match records.get_mut(&record.id) {
            // The owner is fixed at creation.
            Some(existing) if existing.user_id == record.user_id => {
                *existing = record;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(
        &self,
        id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError> {
        ensure_live(cancel)?;
        Ok(lock(&self.accommodations)?.remove(&id).is_some())
    }

    async fn fetch(
        &self,
        id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<Option<AccommodationRecord>, RepositoryError> {
        ensure_live(cancel)?;
        Ok(lock(&self.accommodations)?.get(&id).cloned())
    }

    async fn list(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<AccommodationRecord>, RepositoryError> {
        ensure_live(cancel)?;
        Ok(lock(&self.accommodations)?.values().cloned().collect())
    }
}
