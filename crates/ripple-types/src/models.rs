use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "ADMIN" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// The public view of a user. The password hash never leaves the
/// storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nickname: String,
    pub role: UserRole,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub registered_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub body: String,
    pub registered_at: DateTime<Utc>,
}

/// What kind of interaction produced an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmKind {
    #[serde(rename = "NEW_LIKE_ON_POST")]
    NewLikeOnPost,
    #[serde(rename = "NEW_COMMENT_ON_POST")]
    NewCommentOnPost,
}

impl AlarmKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewLikeOnPost => "NEW_LIKE_ON_POST",
            Self::NewCommentOnPost => "NEW_COMMENT_ON_POST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_LIKE_ON_POST" => Some(Self::NewLikeOnPost),
            "NEW_COMMENT_ON_POST" => Some(Self::NewCommentOnPost),
            _ => None,
        }
    }
}

/// An interaction notification. Immutable once written; the recipient
/// reads them newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub id: Uuid,
    pub kind: AlarmKind,
    /// User whose action produced the alarm.
    pub from_user_id: Uuid,
    /// The post the interaction targeted.
    pub target_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

/// One page of a larger result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}

/// Zero-based page request. Offsets are computed here so the storage
/// layer only ever sees limit/offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_offset() {
        assert_eq!(PageRequest::new(0, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
    }

    #[test]
    fn role_round_trips_through_storage_form() {
        assert_eq!(UserRole::parse(UserRole::Admin.as_str()), UserRole::Admin);
        assert_eq!(UserRole::parse("USER"), UserRole::User);
        // Unknown values degrade to the least-privileged role.
        assert_eq!(UserRole::parse("garbage"), UserRole::User);
    }
}
