//! Access-token verification.

use std::sync::Arc;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use postline_core::auth::{claims_to_user, AccessClaims, AuthError, UserContext};
use postline_core::cache::{user_token_key, Cache};

/// Verifies HS256 access tokens issued by the user service.
///
/// With a token store attached, a token is only accepted while it is the one
/// stored at `jwt:token:{user_id}`, so each user has a single active token.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    token_store: Option<Arc<dyn Cache>>,
}

impl JwtValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_store: None,
        }
    }

    pub fn with_token_store(mut self, store: Arc<dyn Cache>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub async fn validate(&self, token: &str) -> Result<UserContext, AuthError> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(err.to_string()),
            })?
            .claims;

        if let Some(store) = &self.token_store {
            let stored = store
                .get(&user_token_key(claims.id))
                .await
                .map_err(|err| AuthError::Storage(err.to_string()))?;

            if stored.as_deref() != Some(token.as_bytes()) {
                tracing::debug!(user_id = claims.id, "Token is not the active one");
                return Err(AuthError::Revoked);
            }
        }

        Ok(claims_to_user(claims))
    }
}
