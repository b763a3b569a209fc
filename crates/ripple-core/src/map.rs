//! Row-to-domain conversions. Storage keeps ids and timestamps as
//! text; corrupt values are logged and degrade to defaults instead of
//! failing the whole read.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use ripple_db::models::{AlarmRow, CommentRow, PostRow, UserRow};
use ripple_types::models::{Alarm, AlarmKind, Comment, Post, User, UserRole};

pub(crate) fn parse_uuid(field: &str, raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", field, raw, e);
        Uuid::default()
    })
}

pub(crate) fn parse_ts(field: &str, raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}': {}", field, raw, e);
            DateTime::default()
        })
}

pub(crate) fn user_from_row(row: UserRow) -> User {
    User {
        id: parse_uuid("user id", &row.id),
        username: row.username,
        email: row.email,
        nickname: row.nickname,
        role: UserRole::parse(&row.role),
        registered_at: parse_ts("user registered_at", &row.registered_at),
    }
}

pub(crate) fn post_from_row(row: PostRow) -> Post {
    Post {
        id: parse_uuid("post id", &row.id),
        title: row.title,
        body: row.body,
        author_id: parse_uuid("post user_id", &row.user_id),
        author_username: row.author_username,
        registered_at: parse_ts("post registered_at", &row.registered_at),
        updated_at: row.updated_at.as_deref().map(|ts| parse_ts("post updated_at", ts)),
    }
}

pub(crate) fn comment_from_row(row: CommentRow) -> Comment {
    Comment {
        id: parse_uuid("comment id", &row.id),
        post_id: parse_uuid("comment post_id", &row.post_id),
        author_id: parse_uuid("comment user_id", &row.user_id),
        author_username: row.author_username,
        body: row.body,
        registered_at: parse_ts("comment registered_at", &row.registered_at),
    }
}

pub(crate) fn alarm_from_row(row: AlarmRow) -> Alarm {
    let kind = AlarmKind::parse(&row.kind).unwrap_or_else(|| {
        warn!("Corrupt alarm kind '{}' on alarm '{}'", row.kind, row.id);
        AlarmKind::NewLikeOnPost
    });
    Alarm {
        id: parse_uuid("alarm id", &row.id),
        kind,
        from_user_id: parse_uuid("alarm from_user_id", &row.from_user_id),
        target_id: parse_uuid("alarm target_id", &row.target_id),
        registered_at: parse_ts("alarm registered_at", &row.registered_at),
    }
}
