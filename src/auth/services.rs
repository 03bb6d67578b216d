use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{SignInRequest, SignUpRequest},
    error::AuthError,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::{NewUser, User},
};

pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PASSWORD_LEN: usize = 1024;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn bounded(field: &str, value: &str, max: usize) -> Result<(), AuthError> {
    if value.chars().count() > max {
        return Err(AuthError::InvalidInput(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn validate_sign_up(req: &SignUpRequest) -> Result<(), AuthError> {
    require("Email", &req.email)?;
    require("Password", &req.password)?;
    require("First name", &req.first_name)?;
    require("Last name", &req.last_name)?;
    bounded("Email", &req.email, MAX_EMAIL_LEN)?;
    bounded("Password", &req.password, MAX_PASSWORD_LEN)?;
    bounded("First name", &req.first_name, MAX_NAME_LEN)?;
    bounded("Last name", &req.last_name, MAX_NAME_LEN)?;
    if !is_valid_email(&req.email) {
        return Err(AuthError::InvalidInput("Invalid email".into()));
    }
    Ok(())
}

/// Create a new account.
///
/// Fails with [`AuthError::DuplicateAccount`] when the email is taken, either
/// by the lookup or by the store's atomic insert when a concurrent
/// registration wins between the two.
#[instrument(skip(store, req), fields(email = tracing::field::Empty))]
pub async fn register(store: &dyn UserStore, mut req: SignUpRequest) -> Result<User, AuthError> {
    req.email = normalize_email(&req.email);
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    tracing::Span::current().record("email", req.email.as_str());

    validate_sign_up(&req)?;

    if store.find_by_email(&req.email).await?.is_some() {
        warn!("email already registered");
        return Err(AuthError::DuplicateAccount);
    }

    let hash = hash_password(req.password.clone()).await?;

    let created = store
        .insert(NewUser {
            email: &req.email,
            password: &hash,
            first_name: &req.first_name,
            last_name: &req.last_name,
        })
        .await?;

    match created {
        Some(user) => {
            info!(user_id = %user.id, "user registered");
            Ok(user)
        }
        None => {
            warn!("email registered concurrently");
            Err(AuthError::DuplicateAccount)
        }
    }
}

/// Check an email/password pair and return the matching record.
#[instrument(skip(store, req), fields(email = tracing::field::Empty))]
pub async fn authenticate(store: &dyn UserStore, mut req: SignInRequest) -> Result<User, AuthError> {
    req.email = normalize_email(&req.email);
    tracing::Span::current().record("email", req.email.as_str());

    require("Email", &req.email)?;
    require("Password", &req.password)?;
    bounded("Password", &req.password, MAX_PASSWORD_LEN)?;

    let user = match store.find_by_email(&req.email).await? {
        Some(u) => u,
        None => {
            warn!("login unknown email");
            return Err(AuthError::AccountNotFound);
        }
    };

    if !verify_password(req.password, user.password.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredential);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
