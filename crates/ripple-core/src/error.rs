use thiserror::Error;
use uuid::Uuid;

/// Every expected, recoverable outcome of a service operation. The
/// adapter layer maps each kind to a transport status; here they are
/// only distinguishable kinds with a detail message.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("post {0} not found")]
    PostNotFound(Uuid),

    #[error("username {0} is duplicated")]
    DuplicateUser(String),

    #[error("password does not match")]
    InvalidCredential,

    #[error("{username} has no permission with post {post_id}")]
    PermissionDenied { username: String, post_id: Uuid },

    #[error("{username} already liked post {post_id}")]
    AlreadyLiked { username: String, post_id: Uuid },

    #[error("token is invalid")]
    TokenInvalid,

    #[error("token is expired")]
    TokenExpired,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code, surfaced in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::PostNotFound(_) => "POST_NOT_FOUND",
            Self::DuplicateUser(_) => "DUPLICATED_USER_NAME",
            Self::InvalidCredential => "INVALID_PASSWORD",
            Self::PermissionDenied { .. } => "INVALID_PERMISSION",
            Self::AlreadyLiked { .. } => "ALREADY_LIKED",
            Self::TokenInvalid => "INVALID_TOKEN",
            Self::TokenExpired => "EXPIRED_TOKEN",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Storage(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
