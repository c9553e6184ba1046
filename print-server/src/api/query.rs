//! Query string extractor with 422 rejections

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::utils::AppError;

/// Like [`Query`], but a malformed or missing parameter yields
/// [`AppError::Validation`] naming the offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ValidQuery(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                let field = offending_field(&message).unwrap_or("query").to_string();
                Err(AppError::validation(field, message))
            }
        }
    }
}

/// Pull the field name out of a rejection message
///
/// Handles serde's "missing field `text`" and path-prefixed messages such
/// as "cut: provided string was not `true` or `false`".
fn offending_field(message: &str) -> Option<&str> {
    let detail = message
        .split_once(": ")
        .map(|(_, detail)| detail)
        .unwrap_or(message);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        return rest.split('`').next();
    }

    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    is_path.then_some(path)
}
