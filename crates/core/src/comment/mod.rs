mod policy;
mod requests;
mod secret;
mod types;

pub use policy::{
    authorize_comment_mutation, CommentAuthPolicy, Credentials, Denied, UnknownPolicy,
};
pub use requests::{CreateCommentRequest, DeleteCommentRequest, UpdateCommentRequest};
pub use secret::{hash_secret, verify_secret, SecretError, SECRET_HASH_LEN, SECRET_SALT_LEN};
pub use types::{Comment, CommentView, NewComment};
