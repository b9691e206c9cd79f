use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for accommodation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccommodationId(pub Uuid);

impl AccommodationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccommodationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccommodationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier wrapper for registered users, landlords and renters alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Accommodation offer as submitted by a landlord.
///
/// Prices stay signed so malformed submissions can be represented and rejected by
/// [`super::validation::validate_accommodation`] rather than at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
    pub id: AccommodationId,
    pub title: String,
    pub description: String,
    pub user_id: UserId,
    pub price: i32,
}

/// Storage-facing shape of an accommodation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationRecord {
    pub id: AccommodationId,
    pub title: String,
    pub description: String,
    pub user_id: UserId,
    pub price: i32,
}

/// User as seen by the authorization checks.
///
/// `accommodations` is only populated by
/// [`super::repository::UserLookup::get_by_id_with_accommodations`]; the plain lookup leaves it
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: UserId,
    pub is_landlord: bool,
    pub accommodations: BTreeSet<AccommodationId>,
}

impl User {
    pub fn owns(&self, accommodation_id: &AccommodationId) -> bool {
        self.accommodations.contains(accommodation_id)
    }
}
