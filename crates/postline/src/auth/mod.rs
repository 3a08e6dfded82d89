//! Caller identity from bearer access tokens.

mod extractors;
mod validator;

pub use extractors::{CurrentUser, OptionalUser};
pub use validator::JwtValidator;

#[cfg(test)]
pub(crate) mod testing;
