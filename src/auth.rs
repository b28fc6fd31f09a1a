//! Credential verification against the `base_user` table.

use crate::db::{Command, ExecContext, SqlHelper, Value};
use anyhow::{Context, Result};

const LOGIN_SQL: &str =
    "SELECT COUNT(1) FROM base_user WHERE user_name = :user_name AND password = :password";
const CREATE_USER_SQL: &str =
    "INSERT INTO base_user (user_name, password) VALUES (:user_name, :password)";

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Checks whether a username/password pair belongs to a known user.
pub trait UserInfo {
    /// True iff at least one user row matches both values exactly.
    ///
    /// Wrong credentials give `Ok(false)`; database failures are returned
    /// as errors.
    fn is_login_success(&self, username: &str, password: &str) -> rusqlite::Result<bool>;
}

/// [`UserInfo`] backed by the `base_user` table.
#[derive(Debug, Clone)]
pub struct SqlUserInfo {
    helper: SqlHelper,
}

impl SqlUserInfo {
    pub fn new(helper: SqlHelper) -> Self {
        Self { helper }
    }

    pub fn helper(&self) -> &SqlHelper {
        &self.helper
    }

    /// Inserts a user and returns the generated id.
    pub fn create_user(&self, username: &str, password: &str) -> rusqlite::Result<i64> {
        let cmd = Command::text(CREATE_USER_SQL)
            .param("user_name", username.to_owned())
            .param("password", password.to_owned());
        self.helper.execute_insert(ExecContext::Owned, &cmd)
    }
}

impl UserInfo for SqlUserInfo {
    fn is_login_success(&self, username: &str, password: &str) -> rusqlite::Result<bool> {
        let cmd = Command::text(LOGIN_SQL)
            .param("user_name", username.to_owned())
            .param("password", password.to_owned());
        let matched = match self.helper.execute_scalar(ExecContext::Owned, &cmd)? {
            Value::Integer(count) => count > 0,
            _ => false,
        };
        Ok(matched)
    }
}

/// Verifies `credentials`, logging the outcome by username.
pub fn login(users: &impl UserInfo, credentials: Credentials) -> Result<bool> {
    let success = users
        .is_login_success(&credentials.username, &credentials.password)
        .context("⚠️ Authentication failed")?;
    if success {
        log::info!("Login succeeded for '{}'", credentials.username);
    } else {
        log::warn!("Login rejected for '{}'", credentials.username);
    }
    Ok(success)
}

/// Registers a new user and returns its id.
pub fn register(users: &SqlUserInfo, credentials: Credentials) -> Result<i64> {
    let id = users
        .create_user(&credentials.username, &credentials.password)
        .with_context(|| format!("⚠️ Could not register '{}'", credentials.username))?;
    log::info!("Registered '{}' with id {}", credentials.username, id);
    Ok(id)
}
