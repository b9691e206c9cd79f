use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{AccommodationId, User, UserId};
use super::error::{AccommodationServiceError, UserValidationError};
use super::repository::UserLookup;

/// Which user lookup variant to resolve with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupScope {
    /// Identity and landlord flag only.
    UserOnly,
    /// Also load the ids of the accommodations the user owns.
    WithAccommodations,
}

/// Role and ownership predicates shared by the accommodation operations.
pub struct UserValidator<U> {
    users: Arc<U>,
}

impl<U> Clone for UserValidator<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> UserValidator<U>
where
    U: UserLookup + 'static,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Resolve `user_id` and require the landlord capability.
    pub async fn ensure_user_exists_and_is_landlord(
        &self,
        user_id: UserId,
        scope: LookupScope,
    ) -> Result<User, AccommodationServiceError> {
        let user = match scope {
            LookupScope::UserOnly => self.users.get_by_id(user_id).await?,
            LookupScope::WithAccommodations => {
                self.users.get_by_id_with_accommodations(user_id).await?
            }
        };

        let Some(user) = user else {
            warn!(%user_id, "user lookup found no match");
            return Err(AccommodationServiceError::UserNotFound(user_id));
        };

        if !user.is_landlord {
            warn!(%user_id, "regular user attempted to manage accommodation offers");
            return Err(UserValidationError::NotLandlord.into());
        }

        debug!(%user_id, owned = user.accommodations.len(), "landlord resolved");
        Ok(user)
    }

    /// Require `accommodation_id` to be among the user's owned accommodations.
    pub fn ensure_user_owns_accommodation(
        &self,
        user: &User,
        accommodation_id: AccommodationId,
    ) -> Result<(), AccommodationServiceError> {
        if user.owns(&accommodation_id) {
            Ok(())
        } else {
            warn!(user_id = %user.id, %accommodation_id, "user does not own accommodation");
            Err(UserValidationError::NoAccess.into())
        }
    }
}
