use super::{AccessClaims, AuthError, Role, UserContext};

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from an `Authorization` header value.
pub fn parse_bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AuthError::InvalidToken("expected a Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Builds the caller identity from verified claims.
pub fn claims_to_user(claims: AccessClaims) -> UserContext {
    UserContext {
        id: claims.id,
        display_name: claims.name,
        email: claims.email,
        role: Role::from_user_type(&claims.user_type),
    }
}
