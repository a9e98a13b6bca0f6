use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, TokenForm, TokenResponse},
        jwt::JwtKeys,
    },
    error::ApiError,
    response::{ok, Envelope},
    state::AppState,
    users::{
        repo::{User, UserRole},
        service,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/token", post(token))
        .route("/auth/logout", get(logout))
}

/// First-user bootstrap. Only works while the users table is empty and
/// always creates an owner.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    if service::count_users(&state.db).await? > 0 {
        warn!("register attempted with existing users");
        return Err(ApiError::Forbidden(
            "registration is only allowed when no users exist",
        ));
    }

    let user = service::create_user(
        &state.db,
        &payload.email,
        &payload.password,
        &payload.name,
        UserRole::Owner,
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "first user registered");
    Ok((StatusCode::CREATED, ok(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = service::authenticate(&state.db, &payload.email, &payload.password).await?;
    let access_token = JwtKeys::from_ref(&state).issue(&user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(ok(LoginResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// OAuth2-compatible token endpoint. Form clients expect `access_token`
/// at the top level, so this one response skips the envelope.
#[instrument(skip(state, form))]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = form.username.trim().to_lowercase();
    let user = service::authenticate(&state.db, &email, &form.password).await?;
    let access_token = JwtKeys::from_ref(&state).issue(&user.email)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Tokens are stateless, so logout is an acknowledgement only.
#[instrument]
pub async fn logout() -> Json<Envelope<serde_json::Value>> {
    info!("user logged out");
    ok(json!({ "message": "logged out successfully" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn login_response_never_leaks_the_hash() {
        let user = User {
            id: Uuid::new_v4(),
            user_code: "OWN-ABCD1234".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: "A".into(),
            role: UserRole::Owner,
            is_active: true,
            created_at: time::OffsetDateTime::now_utc(),
            updated_at: time::OffsetDateTime::now_utc(),
        };
        let body = serde_json::to_value(LoginResponse {
            access_token: "tok".into(),
            token_type: "bearer",
            user,
        })
        .unwrap();
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["user"].get("password_hash").is_none());
    }
}
