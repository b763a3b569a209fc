//! User directory and alarm feed: join, login, lookup, and the paged
//! notification read-model.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use ripple_db::{Database, is_unique_violation, queries};
use ripple_types::models::{Alarm, Page, PageRequest, User};

use crate::credential;
use crate::error::ServiceError;
use crate::map::{alarm_from_row, user_from_row};
use crate::token::TokenConfig;

#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
    tokens: TokenConfig,
}

impl UserService {
    pub fn new(db: Arc<Database>, tokens: TokenConfig) -> Self {
        Self { db, tokens }
    }

    /// Register a new user. The username must be free among active
    /// users; the password is hashed before it ever reaches storage.
    pub fn join(
        &self,
        username: &str,
        password: &str,
        email: &str,
        nickname: &str,
    ) -> Result<User, ServiceError> {
        let digest = credential::hash(password)?;
        let id = Uuid::new_v4();

        let row = self.db.with_tx(|tx| {
            if queries::find_user_by_username(tx, username)?.is_some() {
                return Err(ServiceError::DuplicateUser(username.to_string()));
            }
            queries::insert_user(tx, &id.to_string(), username, &digest, email, nickname)
                .map_err(|e| {
                    // The partial unique index wins any race the
                    // pre-check missed.
                    if is_unique_violation(&e) {
                        ServiceError::DuplicateUser(username.to_string())
                    } else {
                        e.into()
                    }
                })?;
            queries::find_user_by_username(tx, username)?
                .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
        })?;

        info!("User {} joined", username);
        Ok(user_from_row(row))
    }

    /// Verify credentials and issue a session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let row = self
            .db
            .with_read(|conn| queries::find_user_by_username(conn, username).map_err(ServiceError::from))?
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;

        if !credential::verify(password, &row.password) {
            return Err(ServiceError::InvalidCredential);
        }

        self.tokens.issue(username)
    }

    pub fn lookup(&self, username: &str) -> Result<User, ServiceError> {
        self.db
            .with_read(|conn| queries::find_user_by_username(conn, username).map_err(ServiceError::from))?
            .map(user_from_row)
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }

    /// The recipient's alarms, newest-first.
    pub fn alarms(&self, username: &str, page: PageRequest) -> Result<Page<Alarm>, ServiceError> {
        self.db.with_read(|conn| {
            let user = queries::find_user_by_username(conn, username)?
                .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;

            let rows = queries::list_alarms(conn, &user.id, page.size, page.offset())?;
            let total = queries::count_alarms(conn, &user.id)?;
            Ok(Page {
                items: rows.into_iter().map(alarm_from_row).collect(),
                page: page.page,
                size: page.size,
                total,
            })
        })
    }
}
