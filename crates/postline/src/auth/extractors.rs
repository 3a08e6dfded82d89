//! Axum extractors for the authenticated caller.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use postline_core::auth::{parse_bearer_token, AuthError, UserContext};

use super::JwtValidator;
use crate::handlers::AppError;

/// Extractor for an authenticated caller. Rejects with 401 without a valid token.
pub struct CurrentUser(pub UserContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<JwtValidator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let validator = Arc::<JwtValidator>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken("invalid authorization header".to_string()))?;

        let token = parse_bearer_token(header)?;
        let user = validator.validate(token).await?;

        Ok(CurrentUser(user))
    }
}

/// Extractor for an optional caller. Missing or invalid tokens yield `None`.
pub struct OptionalUser(pub Option<UserContext>);

impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<JwtValidator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let validator = Arc::<JwtValidator>::from_ref(state);

        let Some(header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(OptionalUser(None));
        };

        let Ok(token) = parse_bearer_token(header) else {
            return Ok(OptionalUser(None));
        };

        match validator.validate(token).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring unusable bearer token");
                Ok(OptionalUser(None))
            }
        }
    }
}
