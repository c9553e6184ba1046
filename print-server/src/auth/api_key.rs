//! Shared-secret authorization
//!
//! Print routes require the `x-PrintRAPI-key` header to equal the
//! configured `API_SECRET`. Without a configured secret nothing matches.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::core::AppState;
use crate::utils::{AppError, AppResult};

/// Header carrying the shared secret (header names are case-insensitive)
pub const API_KEY_HEADER: &str = "x-printrapi-key";

/// Check a caller-supplied key against the configured secret
pub fn authorize(provided: Option<&str>, secret: Option<&str>) -> AppResult<()> {
    match (provided, secret) {
        (Some(provided), Some(secret)) if provided == secret => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Extractor for print routes; rejects with 401 before the handler runs
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|h| h.to_str().ok());

        authorize(provided, state.config.api_secret.as_deref()).inspect_err(|_| {
            warn!(
                target: "security",
                uri = %parts.uri.path(),
                header_present = provided.is_some(),
                "Rejected print request"
            );
        })?;

        Ok(ApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_exact_match() {
        assert!(authorize(Some("s3cret"), Some("s3cret")).is_ok());
        assert!(authorize(Some("S3CRET"), Some("s3cret")).is_err());
        assert!(authorize(Some("s3cret "), Some("s3cret")).is_err());
        assert!(authorize(None, Some("s3cret")).is_err());
    }

    #[test]
    fn test_authorize_fails_closed_without_secret() {
        assert!(matches!(authorize(None, None), Err(AppError::Unauthorized)));
        assert!(authorize(Some(""), None).is_err());
        assert!(authorize(Some("anything"), None).is_err());
    }
}
