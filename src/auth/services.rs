use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{
    jwt::JwtKeys,
    password,
    repo::UserRepository,
    repo_types::{NewUser, User},
};
use crate::error::{AppError, RepoError};

pub const MIN_PASSWORD_LEN: usize = 8;

const DUPLICATE_EMAIL: &str = "User with this email already exists";

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration and login on top of the user directory, hasher and token codec.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: Arc<JwtKeys>) -> Self {
        Self { users, keys }
    }

    /// Creates the user and returns its id.
    pub async fn register(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        let email = normalize_email(email);

        if !is_valid_email(&email) {
            warn!("register rejected: invalid email");
            return Err(AppError::Validation("Invalid email address".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            warn!("register rejected: password too short");
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
        }

        let password_hash = password::hash_password_blocking(password.to_owned()).await?;

        let new_user = NewUser {
            id: Uuid::new_v4(),
            email,
            password_hash,
        };
        let user = match self.users.create(new_user).await {
            Ok(u) => u,
            Err(RepoError::Duplicate) => {
                warn!("concurrent registration lost the race");
                return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.id)
    }

    /// Returns a signed bearer token. Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Email and password are required".into()));
        }

        let user = match self.users.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                password::verify_dummy_blocking(password.to_owned()).await;
                warn!("login unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        let ok =
            password::verify_password_blocking(password.to_owned(), user.password_hash.clone())
                .await?;
        if !ok {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .keys
            .issue(user.id)
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Loads the full record for an identity resolved by the access gate.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
