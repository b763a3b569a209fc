use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL,
            password        TEXT NOT NULL,
            email           TEXT NOT NULL,
            nickname        TEXT NOT NULL,
            role            TEXT NOT NULL DEFAULT 'USER',
            registered_at   TEXT NOT NULL,
            updated_at      TEXT,
            deleted_at      TEXT
        );

        -- Usernames are unique among active users only; a soft-deleted
        -- row releases the name.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_active
            ON users(username) WHERE deleted_at IS NULL;

        CREATE TABLE IF NOT EXISTS posts (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            title           TEXT NOT NULL,
            body            TEXT NOT NULL,
            registered_at   TEXT NOT NULL,
            updated_at      TEXT,
            deleted_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_posts_user
            ON posts(user_id, registered_at);

        CREATE TABLE IF NOT EXISTS likes (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            post_id         TEXT NOT NULL REFERENCES posts(id),
            registered_at   TEXT NOT NULL,
            UNIQUE(user_id, post_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_post
            ON likes(post_id);

        CREATE TABLE IF NOT EXISTS comments (
            id              TEXT PRIMARY KEY,
            post_id         TEXT NOT NULL REFERENCES posts(id),
            user_id         TEXT NOT NULL REFERENCES users(id),
            body            TEXT NOT NULL,
            registered_at   TEXT NOT NULL,
            updated_at      TEXT,
            deleted_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments(post_id, registered_at);

        CREATE TABLE IF NOT EXISTS alarms (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            kind            TEXT NOT NULL,
            from_user_id    TEXT NOT NULL REFERENCES users(id),
            target_id       TEXT NOT NULL,
            registered_at   TEXT NOT NULL,
            deleted_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_alarms_user
            ON alarms(user_id, registered_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
