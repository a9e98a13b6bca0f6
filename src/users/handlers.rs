use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        extractors::CurrentUser,
        policy::{authorize, UserAction},
    },
    error::ApiError,
    response::{ok, Envelope},
    state::AppState,
    users::{
        dto::{
            ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserListResponse,
            UserQuery,
        },
        repo::{self, User},
        service,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(me))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/users/:id/change-password", post(change_password))
}

#[instrument(skip_all, fields(user_id = %current.0.id))]
pub async fn me(current: CurrentUser) -> Json<Envelope<User>> {
    ok(current.0)
}

#[instrument(skip(state, _current))]
pub async fn list_users(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(query): Query<UserQuery>,
) -> Result<Json<Envelope<UserListResponse>>, ApiError> {
    let (total, users) = service::list_users(&state.db, &query.into()).await?;
    Ok(ok(UserListResponse { total, users }))
}

#[instrument(skip(state, _current))]
pub async fn get_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<User>>, ApiError> {
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(ok(user))
}

#[instrument(skip(state, current, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let user = service::create_user(
        &state.db,
        &payload.email,
        &payload.password,
        &payload.name,
        payload.role,
    )
    .await?;

    info!(user_id = %user.id, created_by = %current.0.id, "user created via api");
    Ok((StatusCode::CREATED, ok(user)))
}

#[instrument(skip(state, current, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<Envelope<User>>, ApiError> {
    authorize(&current.0, id, UserAction::Update)?;

    let user = service::update_user(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.role,
        payload.is_active,
    )
    .await?;
    Ok(ok(user))
}

#[instrument(skip(state, current))]
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    authorize(&current.0, id, UserAction::Delete)?;

    service::delete_user(&state.db, id).await?;
    info!(user_id = %id, deleted_by = %current.0.id, "user deleted via api");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    authorize(&current.0, id, UserAction::ChangePassword)?;

    service::change_password(&state.db, id, &payload.old_password, &payload.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}
