//! Database module for sqlauth.
//!
//! This module wraps `rusqlite` in a small command-execution helper. Every
//! operation takes an [`ExecContext`] that says which connection to run on, and
//! a [`Command`] holding the SQL text, its kind, and its bound parameters. The
//! primary entry points are [`SqlHelper`] and [`init_db`].

mod command;
mod connection;
mod reader;
mod table;

pub use command::{Command, CommandKind, Parameter};
pub use connection::{ConnectionState, DbConnection};
pub use reader::{DataReader, DataRow};
pub use rusqlite::types::Value;
pub use table::{DataSet, DataTable};

use crate::config::Settings;
use command::{bind_parameters, Binding};
use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection, Result, Statement, Transaction};

/// The schema the credential check depends on.
const SCHEMA: &str = include_str!("schema.sql");

/// Which connection a command runs on.
#[derive(Default)]
pub enum ExecContext<'a> {
    /// A fresh connection opened from the helper's connection string and
    /// closed before the call returns, on success or failure.
    #[default]
    Owned,
    /// A caller-owned connection. It is opened if closed and left open.
    Connection(&'a mut DbConnection),
    /// A caller-owned transaction. Committing or rolling back is up to the
    /// caller.
    Transaction(&'a Transaction<'a>),
}

/// Executes commands against the database named by a connection string.
///
/// Calls block until SQLite responds. There is no retry and no pooling: an
/// [`ExecContext::Owned`] call opens its own connection every time. Errors are
/// returned exactly as `rusqlite` reports them.
#[derive(Debug, Clone)]
pub struct SqlHelper {
    connection_string: String,
}

impl SqlHelper {
    /// A helper for the SQLite file at `connection_string`. Nothing is opened
    /// until a command runs; an empty string fails at that point with
    /// `rusqlite::Error::InvalidPath`.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    /// A helper for the configured `connection_string`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.connection_string.clone())
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// A new, closed connection for use with [`ExecContext::Connection`].
    pub fn connection(&self) -> DbConnection {
        DbConnection::new(self.connection_string.clone())
    }

    /// Runs an insert, update, or delete and returns the number of rows it
    /// changed.
    ///
    /// # Errors
    ///
    /// A statement that produces rows fails with
    /// `rusqlite::Error::ExecuteReturnedResults`.
    pub fn execute_non_query(&self, ctx: ExecContext<'_>, cmd: &Command) -> Result<usize> {
        self.with_connection(ctx, |conn| prepare(conn, cmd)?.raw_execute())
    }

    /// Runs a command and returns the first column of the first row, or
    /// [`Value::Null`] when there are no rows.
    pub fn execute_scalar(&self, ctx: ExecContext<'_>, cmd: &Command) -> Result<Value> {
        self.with_connection(ctx, |conn| {
            let mut stmt = prepare(conn, cmd)?;
            let mut rows = stmt.raw_query();
            let value = match rows.next()? {
                Some(row) => row.get(0)?,
                None => Value::Null,
            };
            Ok(value)
        })
    }

    /// Like [`execute_scalar`](Self::execute_scalar), coerced to a string.
    ///
    /// NULL, a missing row, and a blob that is not UTF-8 all give `""`.
    pub fn execute_scalar_value(&self, ctx: ExecContext<'_>, cmd: &Command) -> Result<String> {
        self.execute_scalar(ctx, cmd).map(value_to_string)
    }

    /// Runs a query and lends a forward-only [`DataReader`] to `read`.
    ///
    /// The statement lives only as long as the closure. When `read` returns,
    /// whether it drained the reader, closed it, or failed, the statement is
    /// finalized; for [`ExecContext::Owned`] the connection is then closed
    /// before this call returns.
    ///
    /// ```no_run
    /// # use sqlauth::db::{Command, ExecContext, SqlHelper};
    /// # fn main() -> rusqlite::Result<()> {
    /// let helper = SqlHelper::new("users.db");
    /// let rows = helper.execute_reader(
    ///     ExecContext::Owned,
    ///     &Command::text("SELECT user_name FROM base_user"),
    ///     |reader| reader.collect::<rusqlite::Result<Vec<_>>>(),
    /// )?;
    /// println!("{} users", rows.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute_reader<T, F>(&self, ctx: ExecContext<'_>, cmd: &Command, read: F) -> Result<T>
    where
        F: FnOnce(DataReader<'_>) -> Result<T>,
    {
        self.with_connection(ctx, |conn| {
            let mut stmt = prepare(conn, cmd)?;
            let columns = column_names(&stmt);
            let result = read(DataReader::new(columns, stmt.raw_query()));
            result
        })
    }

    /// Runs a query and materializes every row.
    pub fn get_data_table(&self, ctx: ExecContext<'_>, cmd: &Command) -> Result<DataTable> {
        self.execute_reader(ctx, cmd, DataTable::from_reader)
    }

    /// Runs every `;`-separated statement in the command text.
    ///
    /// Each statement that returns columns contributes one [`DataTable`]; the
    /// others are executed for their effects. A named parameter is bound into
    /// each statement that references it.
    pub fn get_data_set(&self, ctx: ExecContext<'_>, cmd: &Command) -> Result<DataSet> {
        self.with_connection(ctx, |conn| {
            log_command(cmd);
            let sql = cmd.sql();
            let mut batch = Batch::new(conn, &sql);
            let mut set = DataSet::default();
            while let Some(mut stmt) = batch.next()? {
                bind_parameters(&mut stmt, cmd.parameters(), Binding::Lenient)?;
                if stmt.column_count() > 0 {
                    let columns = column_names(&stmt);
                    let table = DataTable::from_reader(DataReader::new(columns, stmt.raw_query()))?;
                    set.tables.push(table);
                } else {
                    stmt.raw_execute()?;
                }
            }
            Ok(set)
        })
    }

    /// Runs an insert and returns the row id SQLite generated for it.
    pub fn execute_insert(&self, ctx: ExecContext<'_>, cmd: &Command) -> Result<i64> {
        self.with_connection(ctx, |conn| {
            prepare(conn, cmd)?.raw_execute()?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn with_connection<T>(
        &self,
        ctx: ExecContext<'_>,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        match ctx {
            ExecContext::Owned => {
                let mut conn = self.connection();
                // On error the connection is dropped, which closes it.
                let value = f(conn.open()?)?;
                conn.close()?;
                Ok(value)
            }
            ExecContext::Connection(conn) => f(conn.open()?),
            ExecContext::Transaction(tx) => f(&**tx),
        }
    }
}

/// Creates the `base_user` table if it does not exist yet.
///
/// # Errors
///
/// Fails when the database cannot be opened or the schema cannot be applied.
pub fn init_db(helper: &SqlHelper) -> Result<()> {
    let mut conn = helper.connection();
    conn.open()?.execute_batch(SCHEMA)?;
    conn.close()
}

/// Display form of a scalar: `""` for NULL and for non-UTF-8 blobs.
pub fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => String::from_utf8(b).unwrap_or_default(),
    }
}

fn prepare<'conn>(conn: &'conn Connection, cmd: &Command) -> Result<Statement<'conn>> {
    log_command(cmd);
    let mut stmt = conn.prepare(&cmd.sql())?;
    bind_parameters(&mut stmt, cmd.parameters(), Binding::Strict)?;
    Ok(stmt)
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn log_command(cmd: &Command) {
    log::debug!(
        "Executing {:?} command with {} parameter(s)",
        cmd.kind(),
        cmd.parameters().len()
    );
    log::trace!("SQL: {}", cmd.sql());
}
