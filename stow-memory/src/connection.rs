use crate::{
    MemoryDriver,
    parse::parse,
    storage::{Database, Outcome},
};
use anyhow::{Context, bail};
use std::sync::{Arc, PoisonError};
use stow_core::{Connection, Cursor, Driver, DriverResult, RowsAffected, Statement, Value};

pub struct MemoryConnection {
    driver: MemoryDriver,
    database: String,
}

impl MemoryConnection {
    pub(crate) fn new(driver: MemoryDriver, database: String) -> Self {
        Self { driver, database }
    }

    fn run(&mut self, statement: &Statement) -> DriverResult<Outcome> {
        let command = parse(&statement.sql)
            .with_context(|| format!("Could not parse the statement:\n{statement}"))?;
        log::trace!("{}: {:?}", <MemoryDriver as Driver>::NAME, command);
        let mut databases = self
            .driver
            .databases
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        databases
            .entry(self.database.clone())
            .or_insert_with(Database::default)
            .run(command, &statement.params)
    }
}

impl Connection for MemoryConnection {
    type Driver = MemoryDriver;
    type Cursor<'c> = MemoryCursor;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn execute(&mut self, statement: &Statement) -> DriverResult<RowsAffected> {
        match self.run(statement)? {
            Outcome::Affected(v) => Ok(v),
            Outcome::Rows { .. } => bail!("The statement returns rows, use a query instead"),
        }
    }

    fn query(&mut self, statement: &Statement) -> DriverResult<Self::Cursor<'_>> {
        match self.run(statement)? {
            Outcome::Rows { columns, rows } => Ok(MemoryCursor {
                columns,
                rows: rows.into_iter(),
                current: None,
            }),
            Outcome::Affected(..) => bail!("The statement does not return rows"),
        }
    }
}

/// Snapshot of the rows selected by a query.
pub struct MemoryCursor {
    columns: Arc<[String]>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl Cursor for MemoryCursor {
    fn next(&mut self) -> DriverResult<bool> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn column_value(&self, name: &str) -> DriverResult<Value> {
        let Some(row) = &self.current else {
            bail!("The cursor is not positioned on a row");
        };
        let index = self
            .columns
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("Unknown column `{name}`"))?;
        Ok(row[index].clone())
    }
}
