use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::domain::{Accommodation, AccommodationId, UserId};
use super::error::AccommodationServiceError;
use super::mapper::{AccommodationMapper, RecordMapper};
use super::repository::{AccommodationRepository, UserLookup};
use super::user_validator::{LookupScope, UserValidator};
use super::validation::validate_accommodation;

/// Service composing shape validation, the user validator, the mapper and storage.
///
/// Every mutating operation performs at most one storage call, and only after all checks pass.
pub struct AccommodationService<S, U, M = RecordMapper> {
    storage: Arc<S>,
    mapper: Arc<M>,
    validator: UserValidator<U>,
}

impl<S, U> AccommodationService<S, U, RecordMapper>
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
{
    pub fn new(storage: Arc<S>, users: Arc<U>) -> Self {
        Self::with_mapper(storage, Arc::new(RecordMapper), UserValidator::new(users))
    }
}

impl<S, U, M> AccommodationService<S, U, M>
where
    S: AccommodationRepository + 'static,
    U: UserLookup + 'static,
    M: AccommodationMapper + 'static,
{
    pub fn with_mapper(storage: Arc<S>, mapper: Arc<M>, validator: UserValidator<U>) -> Self {
        Self {
            storage,
            mapper,
            validator,
        }
    }

    /// Publish a new offer on behalf of `accommodation.user_id`.
    pub async fn create_accommodation(
        &self,
        accommodation: &Accommodation,
        cancel: &CancellationToken,
    ) -> Result<bool, AccommodationServiceError> {
        validate_accommodation(accommodation)?;
        self.validator
            .ensure_user_exists_and_is_landlord(accommodation.user_id, LookupScope::UserOnly)
            .await?;

        let record = self.mapper.to_record(accommodation);
        let created = self.storage.create(record, cancel).await?;

        info!(accommodation_id = %accommodation.id, user_id = %accommodation.user_id, created, "accommodation created");
        Ok(created)
    }

    /// Replace an offer the submitting landlord owns.
    pub async fn update_accommodation(
        &self,
        accommodation: &Accommodation,
        cancel: &CancellationToken,
    ) -> Result<bool, AccommodationServiceError> {
        validate_accommodation(accommodation)?;
        let user = self
            .validator
            .ensure_user_exists_and_is_landlord(
                accommodation.user_id,
                LookupScope::WithAccommodations,
            )
            .await?;
        self.validator
            .ensure_user_owns_accommodation(&user, accommodation.id)?;

        let record = self.mapper.to_record(accommodation);
        let updated = self.storage.update(record, cancel).await?;

        info!(accommodation_id = %accommodation.id, user_id = %user.id, updated, "accommodation updated");
        Ok(updated)
    }

    /// Remove an offer the given landlord owns.
    pub async fn delete_accommodation(
        &self,
        user_id: UserId,
        accommodation_id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<bool, AccommodationServiceError> {
        let user = self
            .validator
            .ensure_user_exists_and_is_landlord(user_id, LookupScope::WithAccommodations)
            .await?;
        self.validator
            .ensure_user_owns_accommodation(&user, accommodation_id)?;

        let deleted = self.storage.delete(accommodation_id, cancel).await?;

        info!(%accommodation_id, %user_id, deleted, "accommodation deleted");
        Ok(deleted)
    }

    /// Fetch a single offer. Open to every caller.
    pub async fn get_accommodation(
        &self,
        accommodation_id: AccommodationId,
        cancel: &CancellationToken,
    ) -> Result<Option<Accommodation>, AccommodationServiceError> {
        let record = self.storage.fetch(accommodation_id, cancel).await?;
        Ok(record.map(|record| self.mapper.to_domain(record)))
    }

    /// All published offers, for renters browsing listings.
    pub async fn list_accommodations(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Accommodation>, AccommodationServiceError> {
        let records = self.storage.list(cancel).await?;
        Ok(records
            .into_iter()
            .map(|record| self.mapper.to_domain(record))
            .collect())
    }
}
