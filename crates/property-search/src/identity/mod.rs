//! Account registration, credential checks and bearer-token sessions.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{AccountView, LoginForm, RegistrationForm, UserAccount, MIN_PASSWORD_LENGTH};
pub use repository::UserAccountRepository;
pub use router::identity_router;
pub use service::{IdentityError, IdentityService};
pub use session::{bearer_token, Session, SessionStore};
