use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const SUPPLIER_COLUMNS: &str = "id, name, phone, address, created_at, updated_at";

pub async fn list(db: &PgPool) -> Result<Vec<Supplier>, ApiError> {
    let suppliers = sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await?;
    Ok(suppliers)
}

pub async fn create(
    db: &PgPool,
    name: &str,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Supplier, ApiError> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!(
        r#"
        INSERT INTO suppliers (name, phone, address)
        VALUES ($1, $2, $3)
        RETURNING {SUPPLIER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(phone)
    .bind(address)
    .fetch_one(db)
    .await?;
    Ok(supplier)
}

/// Partial update; absent fields keep their stored values.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Option<Supplier>, ApiError> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!(
        r#"
        UPDATE suppliers
        SET name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            address = COALESCE($4, address),
            updated_at = now()
        WHERE id = $1
        RETURNING {SUPPLIER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(address)
    .fetch_optional(db)
    .await?;
    Ok(supplier)
}

/// Deletes and returns the removed row, or None if the id was absent.
pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<Supplier>, ApiError> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!(
        "DELETE FROM suppliers WHERE id = $1 RETURNING {SUPPLIER_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(supplier)
}
