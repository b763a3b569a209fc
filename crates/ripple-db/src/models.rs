//! Database row types — these map directly to SQLite rows.
//! Distinct from the ripple-types API models so the storage layer
//! stays independent of the wire shapes.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub nickname: String,
    pub role: String,
    pub registered_at: String,
}

pub struct PostRow {
    pub id: String,
    pub user_id: String,
    pub author_username: String,
    pub title: String,
    pub body: String,
    pub registered_at: String,
    pub updated_at: Option<String>,
}

pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub author_username: String,
    pub body: String,
    pub registered_at: String,
}

pub struct AlarmRow {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub from_user_id: String,
    pub target_id: String,
    pub registered_at: String,
}
