use crate::{Connection, DbConfig, Driver, Error, Result, Session};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Process wide home of a [`Session`], initialized once.
///
/// ```ignore
/// static DATABASE: SessionCell<MemoryConnection> = SessionCell::new();
///
/// DATABASE.initialize(&MemoryDriver::new(), config)?;
/// let user = DATABASE.get()?.get::<User>(1)?;
/// ```
pub struct SessionCell<C: Connection> {
    session: OnceLock<Mutex<Session<C>>>,
}

impl<C: Connection> SessionCell<C> {
    pub const fn new() -> Self {
        Self {
            session: OnceLock::new(),
        }
    }

    /// Connects on the first call, later calls keep the existing session and
    /// ignore their arguments.
    pub fn initialize<D>(&self, driver: &D, config: DbConfig) -> Result<MutexGuard<'_, Session<C>>>
    where
        D: Driver<Connection = C>,
    {
        if self.session.get().is_some() {
            log::debug!("Session already initialized, ignoring the new configuration");
        } else {
            let session = Session::connect(driver, config)?;
            if self.session.set(Mutex::new(session)).is_err() {
                log::debug!("Session initialized concurrently, dropping the extra connection");
            }
        }
        self.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.session.get().is_some()
    }

    /// Exclusive access to the session.
    pub fn get(&self) -> Result<MutexGuard<'_, Session<C>>> {
        match self.session.get() {
            Some(session) => Ok(session.lock().unwrap_or_else(PoisonError::into_inner)),
            None => Err(Error::Configuration(
                "the session is used before being initialized".into(),
            )),
        }
    }
}

impl<C: Connection> Default for SessionCell<C> {
    fn default() -> Self {
        Self::new()
    }
}
