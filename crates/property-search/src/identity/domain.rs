use serde::{Deserialize, Serialize};

use crate::accommodations::{User, UserId};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Stored account. `password_hash` is a PHC string and never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub is_landlord: bool,
}

impl UserAccount {
    /// Authorization view of the account, without accommodations loaded.
    pub fn as_user(&self) -> User {
        User {
            id: self.id,
            is_landlord: self.is_landlord,
            accommodations: Default::default(),
        }
    }
}

/// Public projection of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: UserId,
    pub username: String,
    pub is_landlord: bool,
}

impl From<&UserAccount> for AccountView {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            is_landlord: account.is_landlord,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("The Username field is required.".to_string());
        }
        if self.password.is_empty() {
            errors.push("The Password field is required.".to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub is_landlord: bool,
}

impl RegistrationForm {
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("The Username field is required.".to_string());
        }
        if self.password.is_empty() {
            errors.push("The Password field is required.".to_string());
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "The Password must be at least {MIN_PASSWORD_LENGTH} characters long."
            ));
        }
        if self.password != self.confirm_password {
            errors.push("The password and confirmation password do not match.".to_string());
        }
        errors
    }
}
