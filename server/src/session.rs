//! Viewer identity from identity-provider session tokens.
//!
//! The identity provider signs a short-lived JWT and hands it to the browser
//! in the `__session` cookie (API clients may send it as a bearer token).
//! Handlers receive the resolved [`Viewer`] as an extractor and pass it down
//! to the components that need it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::convert::Infallible;

use crate::models::Organizer;
use crate::state::AppState;
use crate::utils::error::AppError;

pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "firstName", default)]
    first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    last_name: Option<String>,
}

/// The signed-in user behind the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Viewer {
    pub fn as_organizer(&self) -> Organizer {
        Organizer {
            id: self.user_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Verifies session tokens. Without a secret every request is anonymous.
pub struct SessionVerifier {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: Option<&str>) -> Self {
        if secret.is_none() {
            tracing::warn!("Session: no SESSION_JWT_SECRET configured, all requests are anonymous");
        }

        // Audience is not part of the session contract.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Option<Viewer> {
        let key = self.key.as_ref()?;

        match decode::<SessionClaims>(token, key, &self.validation) {
            Ok(data) => {
                let claims = data.claims;
                Some(Viewer {
                    user_id: claims.user_id.unwrap_or(claims.sub),
                    first_name: claims.first_name.unwrap_or_default(),
                    last_name: claims.last_name.unwrap_or_default(),
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session: rejected token");
                None
            }
        }
    }

    /// First candidate token that verifies: the session cookie, then the bearer header.
    pub fn viewer_from_parts(&self, parts: &Parts) -> Option<Viewer> {
        cookie_tokens(parts)
            .chain(bearer_token(parts))
            .find_map(|token| self.verify(token))
    }
}

fn cookie_tokens(parts: &Parts) -> impl Iterator<Item = &str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
        })
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// The viewer, if the request carries a valid session.
#[derive(Debug, Clone)]
pub struct OptionalViewer(pub Option<Viewer>);

impl OptionalViewer {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|viewer| viewer.user_id.as_str())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalViewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(state.sessions.viewer_from_parts(parts)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .sessions
            .viewer_from_parts(parts)
            .ok_or_else(|| AppError::AuthError("Please sign in to continue".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    fn parts(header_name: &str, value: &str) -> Parts {
        Request::builder()
            .header(header_name, value)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_user_id_claim_preferred_over_sub() {
        let verifier = SessionVerifier::new(Some(SECRET));
        let viewer = verifier
            .verify(&token(json!({
                "sub": "sess_sub",
                "userId": "user_42",
                "firstName": "Ada",
                "exp": exp(),
            })))
            .unwrap();

        assert_eq!(viewer.user_id, "user_42");
        assert_eq!(viewer.first_name, "Ada");
        assert_eq!(viewer.last_name, "");
    }

    #[test]
    fn test_falls_back_to_sub() {
        let verifier = SessionVerifier::new(Some(SECRET));
        let viewer = verifier
            .verify(&token(json!({ "sub": "user_7", "exp": exp() })))
            .unwrap();
        assert_eq!(viewer.user_id, "user_7");
    }

    #[test]
    fn test_expired_or_forged_tokens_rejected() {
        let verifier = SessionVerifier::new(Some(SECRET));
        let expired = token(json!({ "sub": "user_7", "exp": 1 }));
        assert!(verifier.verify(&expired).is_none());

        let forged = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": "user_7", "exp": exp() }),
            &EncodingKey::from_secret(b"other"),
        )
        .unwrap();
        assert!(verifier.verify(&forged).is_none());
    }

    #[test]
    fn test_audience_claim_is_accepted() {
        let verifier = SessionVerifier::new(Some(SECRET));
        let viewer = verifier
            .verify(&token(json!({ "sub": "user_7", "aud": "evently", "exp": exp() })))
            .unwrap();
        assert_eq!(viewer.user_id, "user_7");
    }

    #[test]
    fn test_stale_cookie_falls_back_to_bearer() {
        let verifier = SessionVerifier::new(Some(SECRET));
        let value = token(json!({ "sub": "user_7", "exp": exp() }));

        let parts = Request::builder()
            .header("cookie", format!("{}=stale.garbage.token", SESSION_COOKIE))
            .header("authorization", format!("Bearer {}", value))
            .body(())
            .unwrap()
            .into_parts()
            .0;
        assert_eq!(verifier.viewer_from_parts(&parts).unwrap().user_id, "user_7");
    }

    #[test]
    fn test_without_secret_everyone_is_anonymous() {
        let verifier = SessionVerifier::new(None);
        assert!(verifier
            .verify(&token(json!({ "sub": "user_7", "exp": exp() })))
            .is_none());
    }

    #[test]
    fn test_token_from_cookie_and_bearer() {
        let verifier = SessionVerifier::new(Some(SECRET));
        let value = token(json!({ "sub": "user_7", "exp": exp() }));

        let cookie = parts("cookie", &format!("theme=dark; {}={}", SESSION_COOKIE, value));
        assert_eq!(verifier.viewer_from_parts(&cookie).unwrap().user_id, "user_7");

        let bearer = parts("authorization", &format!("Bearer {}", value));
        assert_eq!(verifier.viewer_from_parts(&bearer).unwrap().user_id, "user_7");

        let unrelated = parts("cookie", "theme=dark");
        assert!(verifier.viewer_from_parts(&unrelated).is_none());
    }
}
