use super::domain::UserId;
use super::repository::RepositoryError;
use super::validation::AccommodationValidationError;

/// Why a resolved user may not act on an accommodation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("Regular user does not have access to accommodation offers")]
    NotLandlord,
    #[error("Given user has no access to this accommodation")]
    NoAccess,
}

/// Error raised by the accommodation service and the user validator.
#[derive(Debug, thiserror::Error)]
pub enum AccommodationServiceError {
    #[error(transparent)]
    Validation(#[from] AccommodationValidationError),
    #[error("user {0} was not found")]
    UserNotFound(UserId),
    #[error(transparent)]
    UserValidation(#[from] UserValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
