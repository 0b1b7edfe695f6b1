use crate::{Connection, DbConfig, SqlWriter};

/// Failures reported by a driver, surfaced unchanged through
/// [`crate::Error::Driver`].
pub type DriverResult<T> = anyhow::Result<T>;

/// Entry point of a database backend.
pub trait Driver {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    /// Human readable backend name, used in log messages.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;

    /// Opens a connection described by `config`.
    fn connect(&self, config: &DbConfig) -> DriverResult<Self::Connection>;
}
