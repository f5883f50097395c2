//! Authentication extractor.
//!
//! When `AUTH_SECRET` is configured every request must carry
//! `Authorization: Bearer <AUTH_SECRET>`. Without it the server is open.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};

use crate::AppState;

/// Authenticated caller extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The bearer token, or "anonymous" when auth is disabled
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        authorize(auth_header, state.config.auth_secret.as_deref())
    }
}

fn authorize(
    auth_header: Option<&str>,
    secret: Option<&str>,
) -> Result<AuthUser, (StatusCode, &'static str)> {
    match (auth_header, secret) {
        (Some(header), _) if header.starts_with("Bearer ") => {
            let token = header.trim_start_matches("Bearer ").trim().to_string();

            if token.is_empty() {
                return Err((StatusCode::UNAUTHORIZED, "Empty bearer token"));
            }

            match secret {
                Some(secret) if secret != token => {
                    tracing::warn!("Rejected request with wrong bearer token");
                    Err((StatusCode::UNAUTHORIZED, "Invalid bearer token"))
                }
                _ => Ok(AuthUser { token }),
            }
        }
        (Some(_), _) => Err((
            StatusCode::UNAUTHORIZED,
            "Invalid authorization header format",
        )),
        (None, None) => Ok(AuthUser {
            token: "anonymous".to_string(),
        }),
        (None, Some(_)) => Err((StatusCode::UNAUTHORIZED, "Missing authorization header")),
    }
}
