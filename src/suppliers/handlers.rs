use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::ApiError,
    response::{ok, Envelope},
    state::AppState,
    suppliers::{
        dto::{CreateSupplierRequest, UpdateSupplierRequest},
        repo::{self, Supplier},
    },
};

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", put(update_supplier).delete(delete_supplier))
}

#[instrument(skip(state))]
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Supplier>>>, ApiError> {
    let suppliers = repo::list(&state.db).await?;
    Ok(ok(suppliers))
}

#[instrument(skip(state, payload))]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<Envelope<Supplier>>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }

    let supplier = repo::create(
        &state.db,
        payload.name.trim(),
        payload.phone.as_deref(),
        payload.address.as_deref(),
    )
    .await?;

    info!(supplier_id = %supplier.id, "supplier created");
    Ok((StatusCode::CREATED, ok(supplier)))
}

#[instrument(skip(state, payload))]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<Json<Envelope<Supplier>>, ApiError> {
    let supplier = repo::update(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.phone.as_deref(),
        payload.address.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("supplier"))?;

    info!(supplier_id = %supplier.id, "supplier updated");
    Ok(ok(supplier))
}

#[instrument(skip(state))]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Supplier>>, ApiError> {
    let supplier = repo::delete(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("supplier"))?;

    info!(supplier_id = %supplier.id, "supplier deleted");
    Ok(ok(supplier))
}
