//! Engagement engine: likes (at most one per user and post) and
//! comments. Both write an alarm row for the post owner in the same
//! transaction as the engagement itself.

use std::sync::Arc;

use uuid::Uuid;

use ripple_db::{Database, is_unique_violation, queries};
use ripple_types::models::{AlarmKind, Comment, Page, PageRequest};

use crate::error::ServiceError;
use crate::map::comment_from_row;
use crate::posts::{resolve_post, resolve_user};

#[derive(Clone)]
pub struct EngagementService {
    db: Arc<Database>,
}

impl EngagementService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Like a post, once. The SELECT pre-check gives the friendly path;
    /// the UNIQUE(user_id, post_id) constraint decides races, and its
    /// violation maps to the same `AlreadyLiked` outcome.
    pub fn like(&self, post_id: Uuid, username: &str) -> Result<(), ServiceError> {
        self.db.with_tx(|tx| {
            let post = resolve_post(tx, post_id)?;
            let user = resolve_user(tx, username)?;

            if queries::find_like(tx, &user.id, &post.id)?.is_some() {
                return Err(already_liked(username, post_id));
            }

            queries::insert_like(tx, &Uuid::new_v4().to_string(), &user.id, &post.id).map_err(
                |e| {
                    if is_unique_violation(&e) {
                        already_liked(username, post_id)
                    } else {
                        e.into()
                    }
                },
            )?;

            queries::insert_alarm(
                tx,
                &Uuid::new_v4().to_string(),
                &post.user_id,
                AlarmKind::NewLikeOnPost.as_str(),
                &user.id,
                &post.id,
            )?;
            Ok(())
        })
    }

    pub fn like_count(&self, post_id: Uuid) -> Result<i64, ServiceError> {
        self.db.with_read(|conn| {
            let post = resolve_post(conn, post_id)?;
            Ok(queries::count_likes(conn, &post.id)?)
        })
    }

    pub fn comment(&self, post_id: Uuid, username: &str, text: &str) -> Result<(), ServiceError> {
        self.db.with_tx(|tx| {
            let post = resolve_post(tx, post_id)?;
            let user = resolve_user(tx, username)?;

            queries::insert_comment(tx, &Uuid::new_v4().to_string(), &post.id, &user.id, text)?;
            queries::insert_alarm(
                tx,
                &Uuid::new_v4().to_string(),
                &post.user_id,
                AlarmKind::NewCommentOnPost.as_str(),
                &user.id,
                &post.id,
            )?;
            Ok(())
        })
    }

    /// Comments on a post in creation order.
    pub fn comments(&self, post_id: Uuid, page: PageRequest) -> Result<Page<Comment>, ServiceError> {
        self.db.with_read(|conn| {
            let post = resolve_post(conn, post_id)?;
            let rows = queries::list_comments(conn, &post.id, page.size, page.offset())?;
            let total = queries::count_comments(conn, &post.id)?;
            Ok(Page {
                items: rows.into_iter().map(comment_from_row).collect(),
                page: page.page,
                size: page.size,
                total,
            })
        })
    }
}

fn already_liked(username: &str, post_id: Uuid) -> ServiceError {
    ServiceError::AlreadyLiked {
        username: username.to_string(),
        post_id,
    }
}
