use crate::{MemoryConnection, storage::Database};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use stow_core::{DbConfig, Driver, DriverResult, MySqlWriter};

/// Driver keeping its databases in process memory.
///
/// Clones share the same databases, connections opened with the same
/// `database` name see the same tables.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    pub(crate) databases: Arc<Mutex<HashMap<String, Database>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Driver for MemoryDriver {
    type Connection = MemoryConnection;
    type SqlWriter = MySqlWriter;
    const NAME: &'static str = "memory";

    fn sql_writer(&self) -> Self::SqlWriter {
        MySqlWriter
    }

    fn connect(&self, config: &DbConfig) -> DriverResult<Self::Connection> {
        log::debug!("Opening memory database `{}`", config.database);
        Ok(MemoryConnection::new(self.clone(), config.database.clone()))
    }
}
