use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Payload of an access token. `sub` carries the subject's email; the
/// user row is re-resolved from it on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    pub fn issue(&self, subject_email: &str) -> Result<String, ApiError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: subject_email.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: (now + self.ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(e.into()))?;
        debug!(subject = %subject_email, "jwt signed");
        Ok(token)
    }

    /// A token is valid only if its signature verifies and its expiry is
    /// still in the future. Zero leeway, so `exp` is taken literally.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(subject = %data.claims.sub, "jwt verified");
                Ok(data.claims)
            }
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(ApiError::ExpiredToken)
            }
            Err(_) => Err(ApiError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ttl_minutes: i64) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes,
        })
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let keys = keys(5);
        let token = keys.issue("a@x.com").expect("issue");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn zero_ttl_token_expires_immediately() {
        let keys = keys(0);
        let token = keys.issue("a@x.com").expect("issue");
        // exp == iat; one tick past the issuing second it is stale.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        match keys.verify(&token) {
            Err(ApiError::ExpiredToken) => {}
            other => panic!("expected ExpiredToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let keys = keys(5);
        let token = keys.issue("a@x.com").expect("issue");
        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let token = String::from_utf8(bytes).unwrap();
        match keys.verify(&token) {
            Err(ApiError::InvalidToken) => {}
            other => panic!("expected InvalidToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let token = keys(5).issue("a@x.com").expect("issue");
        let other = JwtKeys::from_config(&JwtConfig {
            secret: "different-secret".into(),
            ttl_minutes: 5,
        });
        assert!(matches!(other.verify(&token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            keys(5).verify("not.a.jwt"),
            Err(ApiError::InvalidToken)
        ));
    }
}
