use crate::{Recording, user::User};
use stow::{Connection, Session, expr};

/// Runs after `users`, expects the users `a` (id 1) and `b` (id 2).
pub fn predicates<C: Connection>(session: &mut Session<Recording<C>>) {
    session.connection().take_history();

    let found = session
        .get_all_by::<User>(User::id.gt(1))
        .expect("Failed to filter");
    assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), [2]);
    let history = session.connection().take_history();
    assert_eq!(history[0].sql, "SELECT * FROM user WHERE user.user_id > @user_id;");

    let found = session
        .get_all_by::<User>(expr!(User::username != "a"))
        .expect("Failed to filter");
    assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), [2]);
    let history = session.connection().take_history();
    assert_eq!(
        history[0].sql,
        "SELECT * FROM user WHERE NOT user.username = @username;"
    );

    let found = session
        .get_all_by::<User>(!User::id.le(1))
        .expect("Failed to filter");
    assert_eq!(found.len(), 1);

    let minimum = 1;
    let found = session
        .get_all_by::<User>(expr!(id >= { minimum }))
        .expect("Failed to filter");
    assert_eq!(found.len(), 2);

    let found = session
        .get_by::<User>(expr!(email == "nobody@example.com"))
        .expect("Failed to filter");
    assert_eq!(found, None);

    // Rejected before reaching the database
    let result = session.get_all_by::<User>(expr!(id == id));
    assert!(matches!(result, Err(stow::Error::UnsupportedExpression(..))));
    let result = session.get_all_by::<User>(expr!(id + 1 == 2));
    assert!(matches!(result, Err(stow::Error::UnsupportedExpression(..))));
    let result = session.get_all_by::<User>(expr!(nickname == "a"));
    assert!(matches!(result, Err(stow::Error::UnsupportedExpression(..))));
    let result = session.get_all_by::<User>(expr!(id > 1 && id < 3));
    assert!(matches!(result, Err(stow::Error::UnsupportedExpression(..))));
    assert!(session.connection().history().is_empty());
}
