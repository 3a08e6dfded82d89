//! Authorization of comment updates and deletions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{verify_secret, Comment};
use crate::auth::UserContext;

/// How a caller proves the right to change a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentAuthPolicy {
    /// The authenticated caller must be the comment owner.
    #[default]
    Ownership,
    /// The caller must present the password chosen when the comment was created.
    SharedSecret,
}

impl CommentAuthPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ownership => "ownership",
            Self::SharedSecret => "shared-secret",
        }
    }
}

impl std::fmt::Display for CommentAuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown comment auth policy: {0}")]
pub struct UnknownPolicy(String);

impl FromStr for CommentAuthPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ownership" => Ok(Self::Ownership),
            "shared-secret" | "shared_secret" | "password" => Ok(Self::SharedSecret),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// What the caller presented with a mutation request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub user: Option<UserContext>,
    pub secret: Option<String>,
}

impl Credentials {
    pub fn user(user: UserContext) -> Self {
        Self {
            user: Some(user),
            secret: None,
        }
    }

    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }
}

/// Reason a mutation was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Denied {
    #[error("authentication required")]
    Unauthenticated,
    #[error("only the owner can modify this comment")]
    NotOwner,
    #[error("a password is required to modify this comment")]
    MissingSecret,
    #[error("password does not match")]
    WrongSecret,
}

/// Decides whether `credentials` may update or delete `comment` under `policy`.
///
/// Ownership compares ids strictly; there is no admin override. A comment
/// created without a password can never be changed under the shared-secret
/// policy.
pub fn authorize_comment_mutation(
    policy: CommentAuthPolicy,
    comment: &Comment,
    credentials: &Credentials,
) -> Result<(), Denied> {
    match policy {
        CommentAuthPolicy::Ownership => {
            let user = credentials.user.as_ref().ok_or(Denied::Unauthenticated)?;
            if user.id != comment.owner_id {
                return Err(Denied::NotOwner);
            }
            Ok(())
        }
        CommentAuthPolicy::SharedSecret => {
            let secret = credentials.secret.as_deref().ok_or(Denied::MissingSecret)?;
            let stored = comment.secret_hash.as_deref().ok_or(Denied::WrongSecret)?;
            match verify_secret(secret, stored) {
                Ok(true) => Ok(()),
                Ok(false) | Err(_) => Err(Denied::WrongSecret),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::comment::{hash_secret, NewComment};
    use chrono::{TimeZone, Utc};

    fn comment_owned_by(owner_id: i64) -> Comment {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        NewComment::new(1, owner_id, "owner", "text").into_comment(5, now)
    }

    #[test]
    fn test_owner_is_allowed() {
        let credentials = Credentials::user(UserContext::new(10, "owner", "o@example.com"));
        assert_eq!(
            authorize_comment_mutation(
                CommentAuthPolicy::Ownership,
                &comment_owned_by(10),
                &credentials
            ),
            Ok(())
        );
    }

    #[test]
    fn test_other_user_is_denied() {
        let credentials = Credentials::user(UserContext::new(11, "other", "x@example.com"));
        assert_eq!(
            authorize_comment_mutation(
                CommentAuthPolicy::Ownership,
                &comment_owned_by(10),
                &credentials
            ),
            Err(Denied::NotOwner)
        );
    }

    #[test]
    fn test_admin_gets_no_override() {
        let admin = UserContext::new(1, "admin", "a@example.com").with_role(Role::Admin);
        assert_eq!(
            authorize_comment_mutation(
                CommentAuthPolicy::Ownership,
                &comment_owned_by(10),
                &Credentials::user(admin)
            ),
            Err(Denied::NotOwner)
        );
    }

    #[test]
    fn test_anonymous_caller_is_denied() {
        assert_eq!(
            authorize_comment_mutation(
                CommentAuthPolicy::Ownership,
                &comment_owned_by(10),
                &Credentials::default()
            ),
            Err(Denied::Unauthenticated)
        );
    }

    #[test]
    fn test_shared_secret_accepts_matching_password() {
        let mut comment = comment_owned_by(10);
        comment.secret_hash = Some(hash_secret("pw").unwrap());
        let credentials = Credentials::default().with_secret(Some("pw".to_string()));

        assert_eq!(
            authorize_comment_mutation(CommentAuthPolicy::SharedSecret, &comment, &credentials),
            Ok(())
        );
    }

    #[test]
    fn test_shared_secret_ignores_identity() {
        let mut comment = comment_owned_by(10);
        comment.secret_hash = Some(hash_secret("pw").unwrap());
        let owner = Credentials::user(UserContext::new(10, "owner", "o@example.com"))
            .with_secret(Some("nope".to_string()));

        assert_eq!(
            authorize_comment_mutation(CommentAuthPolicy::SharedSecret, &comment, &owner),
            Err(Denied::WrongSecret)
        );
    }

    #[test]
    fn test_shared_secret_requires_password() {
        let mut comment = comment_owned_by(10);
        comment.secret_hash = Some(hash_secret("pw").unwrap());

        assert_eq!(
            authorize_comment_mutation(
                CommentAuthPolicy::SharedSecret,
                &comment,
                &Credentials::default()
            ),
            Err(Denied::MissingSecret)
        );
    }

    #[test]
    fn test_shared_secret_without_stored_hash_is_denied() {
        let credentials = Credentials::default().with_secret(Some("pw".to_string()));
        assert_eq!(
            authorize_comment_mutation(
                CommentAuthPolicy::SharedSecret,
                &comment_owned_by(10),
                &credentials
            ),
            Err(Denied::WrongSecret)
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "ownership".parse::<CommentAuthPolicy>(),
            Ok(CommentAuthPolicy::Ownership)
        );
        assert_eq!(
            "Shared-Secret".parse::<CommentAuthPolicy>(),
            Ok(CommentAuthPolicy::SharedSecret)
        );
        assert!("acl".parse::<CommentAuthPolicy>().is_err());
    }
}
