//! A single database link with an explicit open/closed state.

use rusqlite::{Connection, Error, Result, Transaction};
use std::path::PathBuf;

/// Lifecycle state of a [`DbConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live handle. Initial state, and the state after `close`.
    Closed,
    /// A live SQLite handle is held.
    Open,
}

/// One link to the database, opened lazily from a connection string.
///
/// The connection string is a SQLite path or `file:` URI. Dropping a
/// `DbConnection` closes the underlying handle.
#[derive(Debug)]
pub struct DbConnection {
    connection_string: String,
    inner: Option<Connection>,
}

impl DbConnection {
    /// Creates a closed connection for `connection_string`.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            inner: None,
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Whether a live SQLite handle is held.
    pub fn state(&self) -> ConnectionState {
        match self.inner {
            Some(_) => ConnectionState::Open,
            None => ConnectionState::Closed,
        }
    }

    /// Opens the connection if it is not already open and returns the handle.
    ///
    /// # Errors
    ///
    /// An empty connection string fails with [`Error::InvalidPath`]; any other
    /// failure is whatever SQLite reports when opening the file.
    pub fn open(&mut self) -> Result<&Connection> {
        let conn: &Connection = self.open_mut()?;
        Ok(conn)
    }

    /// Starts a transaction, opening the connection first if needed.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.open_mut()?.transaction()
    }

    /// Closes the connection. Closing an already closed connection is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(conn) => conn.close().map_err(|(_, err)| err),
            None => Ok(()),
        }
    }

    fn open_mut(&mut self) -> Result<&mut Connection> {
        let conn = match self.inner.take() {
            Some(conn) => conn,
            None => {
                if self.connection_string.is_empty() {
                    return Err(Error::InvalidPath(PathBuf::new()));
                }
                log::debug!("Opening connection to {}", self.connection_string);
                Connection::open(&self.connection_string)?
            }
        };
        Ok(self.inner.insert(conn))
    }
}
