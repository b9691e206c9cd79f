//! Accommodation listings and the landlord authorization rules guarding them.
//!
//! Mutations run a fixed pipeline: shape validation, user existence, landlord role, ownership
//! (update and delete only), then a single storage call. Any failing step short-circuits before
//! storage is touched.

pub mod domain;
pub mod error;
pub mod mapper;
pub mod repository;
pub mod router;
pub mod service;
pub mod user_validator;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Accommodation, AccommodationId, AccommodationRecord, User, UserId};
pub use error::{AccommodationServiceError, UserValidationError};
pub use mapper::{AccommodationMapper, RecordMapper};
pub use repository::{AccommodationRepository, RepositoryError, UserLookup};
pub use router::{accommodation_router, AccommodationForm};
pub use service::AccommodationService;
pub use user_validator::{LookupScope, UserValidator};
pub use validation::{validate_accommodation, AccommodationValidationError, FieldError};
