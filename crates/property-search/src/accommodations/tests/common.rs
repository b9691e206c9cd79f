use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::Duration;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::accommodations::domain::{
    Accommodation, AccommodationId, AccommodationRecord, User, UserId,
};
use crate::accommodations::repository::{AccommodationRepository, RepositoryError, UserLookup};
use crate::accommodations::{accommodation_router, AccommodationService};
use crate::identity::session::SessionStore;

pub(super) const ACCOMMODATION_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
pub(super) const USER_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

pub(super) fn fixed_ids() -> (AccommodationId, UserId) {
    (
        AccommodationId(Uuid::parse_str(ACCOMMODATION_ID).expect("valid uuid")),
        UserId(Uuid::parse_str(USER_ID).expect("valid uuid")),
    )
}

pub(super) fn accommodation(
    id: AccommodationId,
    user_id: UserId,
    title: &str,
    description: &str,
    price: i32,
) -> Accommodation {
    Accommodation {
        id,
        title: title.to_string(),
        description: description.to_string(),
        user_id,
        price,
    }
}

pub(super) fn landlord(id: UserId, owned: &[AccommodationId]) -> User {
    User {
        id,
        is_landlord: true,
        accommodations: owned.iter().copied().collect(),
    }
}

pub(super) fn renter(id: UserId, owned: &[AccommodationId]) -> User {
    User {
        id,
        is_landlord: false,
        accommodations: owned.iter().copied().collect(),
    }
}

/// Storage call captured by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum StorageCall {
    Create(AccommodationRecord),
    Update(AccommodationRecord),
    Delete(AccommodationId),
}

#[derive(Clone)]
pub(super) struct MemoryStorage {
    records: Arc<Mutex<HashMap<AccommodationId, AccommodationRecord>>>,
    calls: Arc<Mutex<Vec<StorageCall>>>,
    outcome: bool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::returning(true)
    }
}

impl MemoryStorage {
    pub(super) fn returning(outcome: bool) -> Self {
        Self {
            records: Arc::default(),
            calls: Arc::default(),
            outcome,
        }
    }

    pub(super) fn seed(&self, record: AccommodationRecord) {
        self.records
            .lock()
            .expect("storage mutex poisoned")
            .insert(record.id, record);
    }

    pub(super) fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record_call(&self, call: StorageCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl AccommodationRepository for MemoryStorage {
    async fn create(
        &self,
        record: AccommodationRecord,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError> {
        if cancel.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        self.record_call(StorageCall::Create(record.clone()));
        if self.outcome {
            self.seed(record);
        }
        Ok(self.outcome)
    }

    async fn update(
        &self,
        record: AccommodationRecord,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError> {
        if cancel.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        self.record_call(StorageCall::Update(record.clone()));
        if self.outcome {
            self.seed(record);
        }
        Ok(self.outcome)
    }

    async fn delete(
        &self,
        id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<bool, RepositoryError> {
        if cancel.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        self.record_call(StorageCall::Delete(id));
        if self.outcome {
            self.records
                .lock()
                .expect("storage mutex poisoned")
                .remove(&id);
        }
        Ok(self.outcome)
    }

    async fn fetch(
        &self,
        id: AccommodationId,
        _cancel: &CancellationToken,
    ) -> Result<Option<AccommodationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("storage mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn list(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Vec<AccommodationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("storage mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|left, right| left.title.cmp(&right.title));
        Ok(records)
    }
}

/// Which lookup variant the service used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LookupCall {
    UserOnly(UserId),
    WithAccommodations(UserId),
}

#[derive(Default, Clone)]
pub(super) struct MemoryUsers {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    lookups: Arc<Mutex<Vec<LookupCall>>>,
}

impl MemoryUsers {
    pub(super) fn with_user(user: User) -> Self {
        let users = Self::default();
        users.insert(user);
        users
    }

    pub(super) fn insert(&self, user: User) {
        self.users
            .lock()
            .expect("users mutex poisoned")
            .insert(user.id, user);
    }

    pub(super) fn lookups(&self) -> Vec<LookupCall> {
        self.lookups.lock().expect("lookups mutex poisoned").clone()
    }
}

#[async_trait]
impl UserLookup for MemoryUsers {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.lookups
            .lock()
            .expect("lookups mutex poisoned")
            .push(LookupCall::UserOnly(id));
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.get(&id).map(|user| User {
            accommodations: BTreeSet::new(),
            ..user.clone()
        }))
    }

    async fn get_by_id_with_accommodations(
        &self,
        id: UserId,
    ) -> Result<Option<User>, RepositoryError> {
        self.lookups
            .lock()
            .expect("lookups mutex poisoned")
            .push(LookupCall::WithAccommodations(id));
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

pub(super) struct UnavailableUsers;

#[async_trait]
impl UserLookup for UnavailableUsers {
    async fn get_by_id(&self, _id: UserId) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }

    async fn get_by_id_with_accommodations(
        &self,
        _id: UserId,
    ) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Unavailable("directory offline".to_string()))
    }
}

pub(super) fn build_service(
    user: User,
) -> (
    AccommodationService<MemoryStorage, MemoryUsers>,
    MemoryStorage,
    MemoryUsers,
) {
    let storage = MemoryStorage::default();
    let users = MemoryUsers::with_user(user);
    let service = AccommodationService::new(Arc::new(storage.clone()), Arc::new(users.clone()));
    (service, storage, users)
}

pub(super) fn build_router(
    service: AccommodationService<MemoryStorage, MemoryUsers>,
) -> (axum::Router, Arc<SessionStore>) {
    let sessions = Arc::new(SessionStore::new(Duration::minutes(30)));
    let router = accommodation_router(
        Arc::new(service),
        Arc::clone(&sessions),
        CancellationToken::new(),
    );
    (router, sessions)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
