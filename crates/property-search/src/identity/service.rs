use std::sync::Arc;

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use tracing::{info, warn};

use super::domain::{AccountView, LoginForm, RegistrationForm, UserAccount};
use super::repository::UserAccountRepository;
use super::session::{Session, SessionStore};
use crate::accommodations::{RepositoryError, UserId};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Registration, login and sign-out over an account repository and session store.
pub struct IdentityService<R> {
    accounts: Arc<R>,
    sessions: Arc<SessionStore>,
    hasher: Argon2<'static>,
    // Verified against when the username is unknown so both refusals cost one argon2 run.
    decoy_hash: Option<String>,
}

impl<R> IdentityService<R>
where
    R: UserAccountRepository + 'static,
{
    pub fn new(accounts: Arc<R>, sessions: Arc<SessionStore>) -> Self {
        Self::with_hasher(accounts, sessions, Argon2::default())
    }

    pub fn with_hasher(
        accounts: Arc<R>,
        sessions: Arc<SessionStore>,
        hasher: Argon2<'static>,
    ) -> Self {
        let salt = SaltString::generate(&mut OsRng);
        let decoy_hash = hasher
            .hash_password(b"decoy password", &salt)
            .map(|hash| hash.to_string())
            .ok();
        Self {
            accounts,
            sessions,
            hasher,
            decoy_hash,
        }
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }

    /// Create an account after form validation and a duplicate-username check.
    pub async fn register(&self, form: RegistrationForm) -> Result<AccountView, IdentityError> {
        let errors = form.errors();
        if !errors.is_empty() {
            return Err(IdentityError::Authorization { errors });
        }

        let username = form.username.trim().to_string();
        if self.accounts.find_by_username(&username).await?.is_some() {
            return Err(username_taken(&username));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .hasher
            .hash_password(form.password.as_bytes(), &salt)
            .map_err(|err| IdentityError::Hashing(err.to_string()))?
            .to_string();

        let account = UserAccount {
            id: UserId::new(),
            username,
            password_hash,
            is_landlord: form.is_landlord,
        };
        let view = AccountView::from(&account);

        match self.accounts.insert(account).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => return Err(username_taken(&view.username)),
            Err(other) => return Err(other.into()),
        }

        info!(user_id = %view.id, landlord = view.is_landlord, "account registered");
        Ok(view)
    }

    /// Verify credentials and open a session.
    pub async fn login(&self, form: LoginForm) -> Result<Session, IdentityError> {
        let errors = form.errors();
        if !errors.is_empty() {
            return Err(IdentityError::Authorization { errors });
        }

        let Some(account) = self.accounts.find_by_username(form.username.trim()).await? else {
            self.verify_decoy(&form.password);
            warn!("login attempted for unknown username");
            return Err(invalid_credentials());
        };

        let parsed = PasswordHash::new(&account.password_hash)
            .map_err(|err| IdentityError::Hashing(err.to_string()))?;
        if self
            .hasher
            .verify_password(form.password.as_bytes(), &parsed)
            .is_err()
        {
            warn!(user_id = %account.id, "login rejected: wrong password");
            return Err(invalid_credentials());
        }

        let session = self.sessions.issue(account.id);
        info!(user_id = %account.id, expires_at = %session.expires_at, "session opened");
        Ok(session)
    }

    /// Close a session. Unknown tokens are ignored.
    pub fn sign_out(&self, token: &str) -> bool {
        let revoked = self.sessions.revoke(token);
        if revoked {
            info!("session closed");
        }
        revoked
    }

    pub fn authenticate(&self, token: &str) -> Option<UserId> {
        self.sessions.resolve(token)
    }

    /// Account behind a live session.
    pub async fn current_account(
        &self,
        token: &str,
    ) -> Result<Option<AccountView>, IdentityError> {
        let Some(user_id) = self.authenticate(token) else {
            return Ok(None);
        };
        let account = self.accounts.find_by_id(user_id).await?;
        Ok(account.as_ref().map(AccountView::from))
    }
}

impl<R> IdentityService<R> {
    /// Run the same argon2 verification a known user would get; the outcome is discarded.
    pub(crate) fn verify_decoy(&self, password: &str) -> bool {
        let Some(parsed) = self
            .decoy_hash
            .as_deref()
            .and_then(|hash| PasswordHash::new(hash).ok())
        else {
            return false;
        };
        self.hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

fn username_taken(username: &str) -> IdentityError {
    IdentityError::Authorization {
        errors: vec![format!("Username '{username}' is already taken.")],
    }
}

fn invalid_credentials() -> IdentityError {
    IdentityError::Authorization {
        errors: vec![INVALID_CREDENTIALS.to_string()],
    }
}

/// Error raised by the identity service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Problems the user can correct; surfaced as form errors.
    #[error("{}", .errors.join("; "))]
    Authorization { errors: Vec<String> },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl IdentityError {
    pub fn errors(&self) -> Option<&[String]> {
        match self {
            IdentityError::Authorization { errors } => Some(errors.as_slice()),
            _ => None,
        }
    }
}
