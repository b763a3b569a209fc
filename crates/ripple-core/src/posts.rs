//! Post store: CRUD with ownership enforcement. The ownership read and
//! the write always share one transaction, so concurrent modifies of a
//! post serialize instead of interleaving.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use ripple_db::models::{PostRow, UserRow};
use ripple_db::{Database, queries};
use ripple_types::models::{Page, PageRequest, Post};

use crate::error::ServiceError;
use crate::map::post_from_row;

#[derive(Clone)]
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(&self, title: &str, body: &str, username: &str) -> Result<(), ServiceError> {
        let id = Uuid::new_v4();
        self.db.with_tx(|tx| -> Result<(), ServiceError> {
            let user = resolve_user(tx, username)?;
            queries::insert_post(tx, &id.to_string(), &user.id, title, body)?;
            Ok(())
        })?;
        info!("Post {} created by {}", id, username);
        Ok(())
    }

    /// Update title and body. Only the owner may modify; ownership is
    /// decided by comparing user ids, never loaded-object identity.
    pub fn modify(
        &self,
        title: &str,
        body: &str,
        username: &str,
        post_id: Uuid,
    ) -> Result<Post, ServiceError> {
        self.db
            .with_tx(|tx| {
                let user = resolve_user(tx, username)?;
                let post = resolve_post(tx, post_id)?;
                check_owner(&user, &post, username, post_id)?;

                queries::update_post(tx, &post.id, title, body)?;
                resolve_post(tx, post_id)
            })
            .map(post_from_row)
    }

    /// Soft-delete a post. Same resolution and ownership rules as
    /// [`modify`](Self::modify).
    pub fn delete(&self, username: &str, post_id: Uuid) -> Result<(), ServiceError> {
        self.db.with_tx(|tx| -> Result<(), ServiceError> {
            let user = resolve_user(tx, username)?;
            let post = resolve_post(tx, post_id)?;
            check_owner(&user, &post, username, post_id)?;

            queries::soft_delete_post(tx, &post.id)?;
            Ok(())
        })?;
        info!("Post {} deleted by {}", post_id, username);
        Ok(())
    }

    /// All active posts, newest-first.
    pub fn list(&self, page: PageRequest) -> Result<Page<Post>, ServiceError> {
        self.db.with_read(|conn| {
            let rows = queries::list_posts(conn, page.size, page.offset())?;
            let total = queries::count_posts(conn)?;
            Ok(page_of(rows, page, total))
        })
    }

    /// Active posts owned by one user, newest-first.
    pub fn list_by_owner(&self, username: &str, page: PageRequest) -> Result<Page<Post>, ServiceError> {
        self.db.with_read(|conn| {
            let user = resolve_user(conn, username)?;
            let rows = queries::list_posts_by_user(conn, &user.id, page.size, page.offset())?;
            let total = queries::count_posts_by_user(conn, &user.id)?;
            Ok(page_of(rows, page, total))
        })
    }
}

fn page_of(rows: Vec<PostRow>, page: PageRequest, total: u64) -> Page<Post> {
    Page {
        items: rows.into_iter().map(post_from_row).collect(),
        page: page.page,
        size: page.size,
        total,
    }
}

pub(crate) fn resolve_user(
    conn: &rusqlite::Connection,
    username: &str,
) -> Result<UserRow, ServiceError> {
    queries::find_user_by_username(conn, username)?
        .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
}

pub(crate) fn resolve_post(conn: &rusqlite::Connection, post_id: Uuid) -> Result<PostRow, ServiceError> {
    queries::find_post(conn, &post_id.to_string())?.ok_or(ServiceError::PostNotFound(post_id))
}

fn check_owner(
    user: &UserRow,
    post: &PostRow,
    username: &str,
    post_id: Uuid,
) -> Result<(), ServiceError> {
    if post.user_id != user.id {
        return Err(ServiceError::PermissionDenied {
            username: username.to_string(),
            post_id,
        });
    }
    Ok(())
}
