use stow::{Connection, DriverResult, RowsAffected, Statement};

/// Connection wrapper keeping every statement it forwards, in order.
pub struct Recording<C: Connection> {
    inner: C,
    history: Vec<Statement>,
}

impl<C: Connection> Recording<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Statement] {
        &self.history
    }

    /// Returns the recorded statements, leaving the history empty.
    pub fn take_history(&mut self) -> Vec<Statement> {
        std::mem::take(&mut self.history)
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Connection> Connection for Recording<C> {
    type Driver = C::Driver;
    type Cursor<'c>
        = C::Cursor<'c>
    where
        Self: 'c;

    fn driver(&self) -> &Self::Driver {
        self.inner.driver()
    }

    fn execute(&mut self, statement: &Statement) -> DriverResult<RowsAffected> {
        self.history.push(statement.clone());
        self.inner.execute(statement)
    }

    fn query(&mut self, statement: &Statement) -> DriverResult<Self::Cursor<'_>> {
        self.history.push(statement.clone());
        self.inner.query(statement)
    }
}
