//! Query functions over a borrowed connection. Callers compose these
//! inside [`Database::with_read`] / [`Database::with_tx`] scopes.
//!
//! Soft delete is an invariant of this layer: every read filters
//! `deleted_at IS NULL`, and deletes only ever stamp that column.

use rusqlite::{Connection, OptionalExtension, params};

use crate::models::{AlarmRow, CommentRow, PostRow, UserRow};
use crate::now;

// -- Users --

pub fn insert_user(
    conn: &Connection,
    id: &str,
    username: &str,
    password_hash: &str,
    email: &str,
    nickname: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, password, email, nickname, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, username, password_hash, email, nickname, now()],
    )?;
    Ok(())
}

pub fn find_user_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<UserRow>> {
    conn.query_row(
        "SELECT id, username, password, email, nickname, role, registered_at
         FROM users
         WHERE username = ?1 AND deleted_at IS NULL",
        [username],
        |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
                nickname: row.get(4)?,
                role: row.get(5)?,
                registered_at: row.get(6)?,
            })
        },
    )
    .optional()
}

// -- Posts --

pub fn insert_post(
    conn: &Connection,
    id: &str,
    user_id: &str,
    title: &str,
    body: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO posts (id, user_id, title, body, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, user_id, title, body, now()],
    )?;
    Ok(())
}

pub fn find_post(conn: &Connection, id: &str) -> rusqlite::Result<Option<PostRow>> {
    conn.query_row(
        &format!("{POST_SELECT} WHERE p.id = ?1 AND p.deleted_at IS NULL"),
        [id],
        map_post_row,
    )
    .optional()
}

pub fn update_post(conn: &Connection, id: &str, title: &str, body: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE posts SET title = ?2, body = ?3, updated_at = ?4
         WHERE id = ?1 AND deleted_at IS NULL",
        params![id, title, body, now()],
    )?;
    Ok(())
}

pub fn soft_delete_post(conn: &Connection, id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE posts SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
        params![id, now()],
    )?;
    Ok(())
}

pub fn list_posts(conn: &Connection, limit: u32, offset: u64) -> rusqlite::Result<Vec<PostRow>> {
    let mut stmt = conn.prepare(&format!(
        "{POST_SELECT}
         WHERE p.deleted_at IS NULL
         ORDER BY p.registered_at DESC, p.rowid DESC
         LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt
        .query_map(params![limit, offset as i64], map_post_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn count_posts(conn: &Connection) -> rusqlite::Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE deleted_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

pub fn list_posts_by_user(
    conn: &Connection,
    user_id: &str,
    limit: u32,
    offset: u64,
) -> rusqlite::Result<Vec<PostRow>> {
    let mut stmt = conn.prepare(&format!(
        "{POST_SELECT}
         WHERE p.user_id = ?1 AND p.deleted_at IS NULL
         ORDER BY p.registered_at DESC, p.rowid DESC
         LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt
        .query_map(params![user_id, limit, offset as i64], map_post_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn count_posts_by_user(conn: &Connection, user_id: &str) -> rusqlite::Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE user_id = ?1 AND deleted_at IS NULL",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

const POST_SELECT: &str =
    "SELECT p.id, p.user_id, u.username, p.title, p.body, p.registered_at, p.updated_at
     FROM posts p
     LEFT JOIN users u ON p.user_id = u.id";

fn map_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        author_username: row
            .get::<_, Option<String>>(2)?
            .unwrap_or_else(|| "unknown".to_string()),
        title: row.get(3)?,
        body: row.get(4)?,
        registered_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// -- Likes --

pub fn find_like(conn: &Connection, user_id: &str, post_id: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT id FROM likes WHERE user_id = ?1 AND post_id = ?2",
        params![user_id, post_id],
        |row| row.get(0),
    )
    .optional()
}

/// Insert is guarded by UNIQUE(user_id, post_id); a constraint failure
/// here is the authoritative duplicate-like signal.
pub fn insert_like(conn: &Connection, id: &str, user_id: &str, post_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO likes (id, user_id, post_id, registered_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, user_id, post_id, now()],
    )?;
    Ok(())
}

pub fn count_likes(conn: &Connection, post_id: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM likes WHERE post_id = ?1",
        [post_id],
        |row| row.get(0),
    )
}

// -- Comments --

pub fn insert_comment(
    conn: &Connection,
    id: &str,
    post_id: &str,
    user_id: &str,
    body: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO comments (id, post_id, user_id, body, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, post_id, user_id, body, now()],
    )?;
    Ok(())
}

pub fn list_comments(
    conn: &Connection,
    post_id: &str,
    limit: u32,
    offset: u64,
) -> rusqlite::Result<Vec<CommentRow>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.post_id, c.user_id, u.username, c.body, c.registered_at
         FROM comments c
         LEFT JOIN users u ON c.user_id = u.id
         WHERE c.post_id = ?1 AND c.deleted_at IS NULL
         ORDER BY c.registered_at ASC, c.rowid ASC
         LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt
        .query_map(params![post_id, limit, offset as i64], |row| {
            Ok(CommentRow {
                id: row.get(0)?,
                post_id: row.get(1)?,
                user_id: row.get(2)?,
                author_username: row
                    .get::<_, Option<String>>(3)?
                    .unwrap_or_else(|| "unknown".to_string()),
                body: row.get(4)?,
                registered_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn count_comments(conn: &Connection, post_id: &str) -> rusqlite::Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE post_id = ?1 AND deleted_at IS NULL",
        [post_id],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

// -- Alarms --

pub fn insert_alarm(
    conn: &Connection,
    id: &str,
    user_id: &str,
    kind: &str,
    from_user_id: &str,
    target_id: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO alarms (id, user_id, kind, from_user_id, target_id, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, user_id, kind, from_user_id, target_id, now()],
    )?;
    Ok(())
}

pub fn list_alarms(
    conn: &Connection,
    user_id: &str,
    limit: u32,
    offset: u64,
) -> rusqlite::Result<Vec<AlarmRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, kind, from_user_id, target_id, registered_at
         FROM alarms
         WHERE user_id = ?1 AND deleted_at IS NULL
         ORDER BY registered_at DESC, rowid DESC
         LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt
        .query_map(params![user_id, limit, offset as i64], |row| {
            Ok(AlarmRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                kind: row.get(2)?,
                from_user_id: row.get(3)?,
                target_id: row.get(4)?,
                registered_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn count_alarms(conn: &Connection, user_id: &str) -> rusqlite::Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM alarms WHERE user_id = ?1 AND deleted_at IS NULL",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, is_unique_violation};

    fn seed_user(db: &Database, id: &str, username: &str) {
        db.with_tx::<_, rusqlite::Error, _>(|tx| {
            insert_user(tx, id, username, "hash", "u@example.com", "nick")
        })
        .unwrap();
    }

    #[test]
    fn soft_deleted_post_is_invisible() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "u1", "alice");
        db.with_tx::<_, rusqlite::Error, _>(|tx| insert_post(tx, "p1", "u1", "t", "b"))
            .unwrap();

        db.with_tx::<_, rusqlite::Error, _>(|tx| soft_delete_post(tx, "p1"))
            .unwrap();

        let found = db
            .with_read::<_, rusqlite::Error, _>(|conn| find_post(conn, "p1"))
            .unwrap();
        assert!(found.is_none());
        assert_eq!(
            db.with_read::<_, rusqlite::Error, _>(|conn| count_posts(conn))
                .unwrap(),
            0
        );
    }

    #[test]
    fn duplicate_like_hits_unique_constraint() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "u1", "alice");
        db.with_tx::<_, rusqlite::Error, _>(|tx| insert_post(tx, "p1", "u1", "t", "b"))
            .unwrap();

        db.with_tx::<_, rusqlite::Error, _>(|tx| insert_like(tx, "l1", "u1", "p1"))
            .unwrap();
        let err = db
            .with_tx::<_, rusqlite::Error, _>(|tx| insert_like(tx, "l2", "u1", "p1"))
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn active_username_is_unique() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "u1", "alice");
        let err = db
            .with_tx::<_, rusqlite::Error, _>(|tx| {
                insert_user(tx, "u2", "alice", "hash", "a@example.com", "al")
            })
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
