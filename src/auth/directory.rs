//! In-memory user directory
//!
//! Demo-grade: accounts live only for the life of the process and
//! passwords are accepted without being checked or stored.

use crate::data::{EntityId, User, UserRole, seed};
use crate::error::{AppError, Result};

/// Sign-up form contents
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Known accounts: the seed users plus anyone registered since
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new(seed::users())
    }
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Sign-in by email
    ///
    /// # Errors
    /// `Unauthorized` if the email is unknown.
    pub fn authenticate(&self, email: &str, _password: &str) -> Result<User> {
        match self.find_user_by_email(email) {
            Some(user) => Ok(user.clone()),
            None => {
                tracing::debug!("Sign-in with unknown email");
                Err(AppError::Unauthorized.recorded())
            }
        }
    }

    /// First account holding `role`, for the demo shortcut buttons
    pub fn quick_login(&self, role: UserRole) -> Option<User> {
        self.users.iter().find(|u| u.role == role).cloned()
    }

    /// Create an account
    ///
    /// # Errors
    /// - `Validation` if a field is blank or the email has no `@`
    /// - `DuplicateEmail` if the email is already registered; the directory
    ///   is left untouched
    pub fn register_user(&mut self, registration: Registration) -> Result<User> {
        let name = registration.name.trim();
        let email = registration.email.trim();
        if name.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(
                AppError::Validation("name, email and password are required".to_string())
                    .recorded(),
            );
        }
        if !email.contains('@') {
            return Err(AppError::Validation(format!("invalid email: {}", email)).recorded());
        }
        if self.find_user_by_email(email).is_some() {
            tracing::warn!(email = %email, "Registration with existing email refused");
            return Err(AppError::DuplicateEmail(email.to_string()).recorded());
        }

        let user = User {
            id: EntityId::prefixed("u_").0,
            name: name.to_string(),
            email: email.to_string(),
            role: registration.role,
            avatar: avatar_url(name),
        };
        self.users.push(user.clone());
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(user)
    }
}

fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random&color=fff",
        urlencoding::encode(name)
    )
}
