use crate::{Recording, user::User};
use stow::{Connection, DbConfig, Error, Session};

/// Reopens the connection of `session` in safe mode, checks that destructive
/// operations never reach the database, then restores the original session.
pub fn safe_mode<C: Connection>(session: Session<Recording<C>>) -> Session<Recording<C>> {
    let config = session.config().clone();
    let mut safe = Session::new(
        session.into_connection(),
        DbConfig {
            safe_mode: true,
            ..config.clone()
        },
    );
    safe.connection().take_history();

    let result = crate::silent_logs! { safe.drop_table::<User>() };
    assert!(matches!(result, Err(Error::SafeMode(..))));
    let result = crate::silent_logs! { safe.create_table::<User>(true) };
    assert!(matches!(result, Err(Error::SafeMode(..))));
    assert!(safe.connection().history().is_empty());

    // Everything else still works
    let users = safe
        .get_all::<User>(false, None)
        .expect("Failed to read in safe mode");
    assert_eq!(users.len(), 2);

    Session::new(safe.into_connection(), config)
}
