use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{auth::jwt::JwtKeys, error::ApiError, state::AppState, users::repo::User};

/// Resolves the authenticated principal for a request: bearer token out
/// of the Authorization header, signature/expiry check, then a fresh user
/// lookup by the subject email. No caching between requests.
pub struct CurrentUser(pub User);

pub(crate) fn bearer_token(header: Option<&str>) -> Result<&str, ApiError> {
    let value = header.ok_or(ApiError::MissingCredentials)?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingCredentials)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?;

        let claims = JwtKeys::from_ref(state).verify(token)?;

        let user = crate::users::repo::find_by_email(&state.db, &claims.sub)
            .await?
            .ok_or(ApiError::UnknownSubject)?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_bearer_header() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn missing_header_is_missing_credentials() {
        assert!(matches!(
            bearer_token(None),
            Err(ApiError::MissingCredentials)
        ));
    }

    #[test]
    fn wrong_scheme_is_missing_credentials() {
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwdw==")),
            Err(ApiError::MissingCredentials)
        ));
    }

    #[test]
    fn empty_token_is_missing_credentials() {
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(ApiError::MissingCredentials)
        ));
    }
}
