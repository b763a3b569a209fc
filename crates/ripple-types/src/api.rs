use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

// -- Envelope --

/// Uniform response envelope: `{"success": true, "data": ...}` on the
/// happy path, `{"success": false, "error": {"code", "message"}}`
/// otherwise.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: &str, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message,
            }),
        }
    }
}

impl Envelope<()> {
    /// Success with no payload (create/delete/like acknowledgements).
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub nickname: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinResponse {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostCreateRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostModifyRequest {
    pub title: String,
    pub body: String,
}

// -- Engagement --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeCountResponse {
    pub count: i64,
}
