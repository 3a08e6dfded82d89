//! Token helpers for tests. Issuing tokens is the user service's job.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use postline_core::auth::AccessClaims;

pub const SECRET: &[u8] = b"test-secret";

/// Signs an access token for `id` that expires `ttl_seconds` from now.
pub fn issue_token(id: i64, name: &str, ttl_seconds: i64) -> String {
    let claims = AccessClaims {
        id,
        email: format!("{name}@example.com"),
        name: name.to_string(),
        user_type: "NORMAL".to_string(),
        exp: Utc::now().timestamp() + ttl_seconds,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}
