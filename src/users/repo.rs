use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Supplier,
    Customer,
}

impl UserRole {
    pub fn code_prefix(self) -> &'static str {
        match self {
            UserRole::Owner => "OWN",
            UserRole::Supplier => "SUP",
            UserRole::Customer => "CUS",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_code: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Equality filters plus pagination for user listings. Defaults: limit
/// 100, offset 0, newest first.
#[derive(Debug, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

/// Short human-readable code, e.g. `SUP-4K7QX2BD`.
pub fn generate_user_code(role: UserRole) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    let random: String = (0..8)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("{}-{}", role.code_prefix(), random)
}

const USER_COLUMNS: &str =
    "id, user_code, email, password_hash, name, role, is_active, created_at, updated_at";

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn list(db: &PgPool, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(active) = filter.active {
        qb.push(" AND is_active = ").push_bind(active);
    }
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    let users = qb.build_query_as::<User>().fetch_all(db).await?;
    Ok(users)
}

pub async fn count(db: &PgPool, filter: &UserFilter) -> Result<i64, ApiError> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(active) = filter.active {
        qb.push(" AND is_active = ").push_bind(active);
    }
    let total: i64 = qb.build_query_scalar().fetch_one(db).await?;
    Ok(total)
}

pub async fn insert(
    db: &PgPool,
    user_code: &str,
    email: &str,
    password_hash: &str,
    name: &str,
    role: UserRole,
) -> Result<User, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (user_code, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_code)
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .fetch_one(db)
    .await
    .map_err(map_unique_violation)?;
    Ok(user)
}

/// Partial update; absent fields keep their stored values.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
    role: Option<UserRole>,
    is_active: Option<bool>,
) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            role = COALESCE($4, role),
            is_active = COALESCE($5, is_active),
            updated_at = now()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(is_active)
    .fetch_optional(db)
    .await
    .map_err(map_unique_violation)?;
    Ok(user)
}

pub async fn set_password_hash(db: &PgPool, id: Uuid, hash: &str) -> Result<(), ApiError> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(hash)
        .execute(db)
        .await?;
    Ok(())
}

/// Returns whether a row was deleted.
pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Concurrent duplicate creates lose at the store's unique constraint;
/// surface that as DuplicateEmail rather than a server error.
fn map_unique_violation(e: sqlx::Error) -> ApiError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return ApiError::DuplicateEmail;
        }
    }
    ApiError::from(e)
}
