#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use stow::{DbConfig, Driver, Entity, SessionCell};
    use stow_memory::{MemoryConnection, MemoryDriver};
    use stow_tests::{User, execute_tests, init_logs};

    static MUTEX: Mutex<()> = Mutex::new(());

    fn config(database: &str) -> DbConfig {
        DbConfig {
            database: database.into(),
            ..Default::default()
        }
    }

    #[test]
    fn memory() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let driver = MemoryDriver::new();
        let config = config("stow_tests");
        let connection = driver
            .connect(&config)
            .expect("Could not open the database");
        execute_tests(connection, config);
    }

    #[test]
    fn shared_databases() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let driver = MemoryDriver::new();
        let mut first = stow::Session::connect(&driver, config("shared")).unwrap();
        let mut second = stow::Session::connect(&driver, config("shared")).unwrap();
        let mut other = stow::Session::connect(&driver, config("other")).unwrap();
        first.create_table::<User>(true).unwrap();
        let mut user = User {
            username: "shared".into(),
            password: "pw".into(),
            email: "shared@example.com".into(),
            ..Default::default()
        };
        first.insert(&mut user).unwrap();
        assert_eq!(second.get::<User>(user.id.into()).unwrap(), Some(user));
        assert!(matches!(
            other.get::<User>(1),
            Err(stow::Error::Driver(..))
        ));
    }

    static DATABASE: SessionCell<MemoryConnection> = SessionCell::new();

    #[test]
    fn session_cell() {
        init_logs();
        assert!(matches!(
            DATABASE.get().map(|_| ()),
            Err(stow::Error::Configuration(..))
        ));
        let driver = MemoryDriver::new();
        DATABASE
            .initialize(&driver, config("cell"))
            .unwrap()
            .create_table::<User>(false)
            .unwrap();
        // Later initializations keep the first session
        let session = DATABASE.initialize(&driver, config("ignored")).unwrap();
        assert_eq!(session.config().database, "cell");
        drop(session);
        assert!(DATABASE.is_initialized());
        let descriptor = User::descriptor().unwrap();
        assert_eq!(descriptor.table_name, "user");
        assert!(DATABASE.get().unwrap().get_all::<User>(false, None).unwrap().is_empty());
    }
}
