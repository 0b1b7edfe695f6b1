use crate::{Driver, DriverResult, Statement, Value};

/// Outcome of a statement that does not return rows.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Key generated by the last inserted row, when the backend reports one.
    pub last_insert_id: Option<i64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_insert_id.is_some() {
                self.last_insert_id = elem.last_insert_id;
            }
        }
    }
}

/// An open connection able to run statements.
pub trait Connection {
    type Driver: Driver;
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    fn driver(&self) -> &Self::Driver;

    fn execute(&mut self, statement: &Statement) -> DriverResult<RowsAffected>;

    fn query(&mut self, statement: &Statement) -> DriverResult<Self::Cursor<'_>>;
}

/// Forward only row cursor returned by [`Connection::query`].
pub trait Cursor {
    /// Moves to the next row, `false` once the rows are exhausted.
    fn next(&mut self) -> DriverResult<bool>;

    /// Value of the named column in the current row.
    fn column_value(&self, name: &str) -> DriverResult<Value>;

    fn is_null(&self, name: &str) -> DriverResult<bool> {
        Ok(self.column_value(name)?.is_null())
    }

    fn close(&mut self) -> DriverResult<()> {
        Ok(())
    }
}
