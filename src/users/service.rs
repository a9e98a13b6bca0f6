use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::password::{hash_password, verify_password},
    error::ApiError,
    users::repo::{self, User, UserFilter, UserRole},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn count_users(db: &PgPool) -> Result<i64, ApiError> {
    repo::count(db, &UserFilter::default()).await
}

pub async fn list_users(db: &PgPool, filter: &UserFilter) -> Result<(i64, Vec<User>), ApiError> {
    let total = repo::count(db, filter).await?;
    let users = repo::list(db, filter).await?;
    Ok((total, users))
}

pub async fn create_user(
    db: &PgPool,
    email: &str,
    password: &str,
    name: &str,
    role: UserRole,
) -> Result<User, ApiError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }

    // Pre-check for a friendly error; the unique constraint still decides
    // the concurrent race inside repo::insert.
    if repo::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(password)?;
    let code = repo::generate_user_code(role);
    let user = repo::insert(db, &code, &email, &hash, name.trim(), role).await?;

    info!(user_id = %user.id, user_code = %user.user_code, "user created");
    Ok(user)
}

pub async fn update_user(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
    role: Option<UserRole>,
    is_active: Option<bool>,
) -> Result<User, ApiError> {
    let email = email.map(|e| e.trim().to_lowercase());
    if let Some(e) = email.as_deref() {
        if !is_valid_email(e) {
            return Err(ApiError::Validation("invalid email".into()));
        }
    }

    let user = repo::update(db, id, name, email.as_deref(), role, is_active)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    info!(user_id = %user.id, "user updated");
    Ok(user)
}

pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
    if !repo::delete(db, id).await? {
        return Err(ApiError::NotFound("user"));
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}

pub async fn change_password(
    db: &PgPool,
    id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    if new_password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }

    let user = repo::find_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if !verify_password(old_password, &user.password_hash)? {
        warn!(user_id = %id, "password change with wrong old password");
        return Err(ApiError::InvalidCredentials);
    }

    let hash = hash_password(new_password)?;
    repo::set_password_hash(db, id, &hash).await?;

    info!(user_id = %id, "password changed");
    Ok(())
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(db: &PgPool, email: &str, password: &str) -> Result<User, ApiError> {
    let user = repo::find_by_email(db, email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}
