mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{claims_to_user, parse_bearer_token};
pub use types::{AccessClaims, Role, UserContext};
