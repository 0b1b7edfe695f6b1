use crate::Recording;
use stow::{Connection, Entity, Session};
use time::macros::datetime;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[stow(table = "user")]
pub struct User {
    #[stow(primary_key)]
    pub id: i32,
    #[stow(unique, not_null)]
    pub username: String,
    #[stow(not_null)]
    pub password: String,
    #[stow(not_null)]
    pub email: String,
    pub last_login: Option<time::PrimitiveDateTime>,
}

pub fn users<C: Connection>(session: &mut Session<Recording<C>>) {
    // Setup
    let result = session.create_table::<User>(true);
    assert!(
        result.is_ok(),
        "Failed to create the user table: {:?}",
        result.unwrap_err()
    );
    let history = session.connection().take_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sql, "DROP TABLE IF EXISTS user;");
    assert_eq!(
        history[1].sql,
        "CREATE TABLE user( user_id INT NOT NULL AUTO_INCREMENT, username VARCHAR(255) NOT NULL UNIQUE, password VARCHAR(255) NOT NULL, email VARCHAR(255) NOT NULL, last_login TIMESTAMP , PRIMARY KEY (user_id));"
    );

    // Insert
    let mut alice = User {
        username: "a".into(),
        password: "secret".into(),
        email: "a@example.com".into(),
        last_login: Some(datetime!(2025-07-15 10:00:00)),
        ..Default::default()
    };
    let mut bob = User {
        username: "b".into(),
        password: "hunter2".into(),
        email: "b@example.com".into(),
        ..Default::default()
    };
    let result = session.insert(&mut alice);
    assert!(result.is_ok(), "Failed to insert: {:?}", result.unwrap_err());
    assert_eq!(result.unwrap().rows_affected, 1);
    session.insert(&mut bob).expect("Failed to insert the second user");
    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);
    let history = session.connection().take_history();
    assert_eq!(
        history[0].sql,
        "INSERT INTO user (username, password, email, last_login) VALUES(@username, @password, @email, @last_login);"
    );
    assert_eq!(history[0].params.len(), 4);

    // Unique username
    let mut clone = User {
        id: 0,
        ..bob.clone()
    };
    assert!(matches!(session.insert(&mut clone), Err(stow::Error::Driver(..))));

    // Get
    let found = session.get::<User>(1).expect("Failed to get the user");
    assert_eq!(found.as_ref().map(|u| u.username.as_str()), Some("a"));
    assert_eq!(found, Some(alice.clone()));
    assert_eq!(session.get::<User>(3).expect("Failed to get the user"), None);
    let found = session
        .get_by::<User>(User::username.eq("b"))
        .expect("Failed to get the user by username");
    assert_eq!(found, Some(bob.clone()));

    // Update
    bob.email = "bob@example.com".into();
    bob.last_login = Some(datetime!(2025-08-01 08:30:00));
    let result = session.update(&bob).expect("Failed to update");
    assert_eq!(result.rows_affected, 1);
    let found = session.get::<User>(2).expect("Failed to get the user");
    assert_eq!(found, Some(bob.clone()));
    // Never inserted, the key 0 matches no row
    let unsaved = User {
        id: 0,
        username: "c".into(),
        ..bob.clone()
    };
    let result = session.update(&unsaved).expect("Failed to update");
    assert_eq!(result.rows_affected, 0);

    // All
    let all = session.get_all::<User>(false, None).expect("Failed to get all");
    assert_eq!(all.len(), 2);
    let limited = session
        .get_all::<User>(false, Some(1))
        .expect("Failed to get all");
    assert_eq!(limited.len(), 1);
    session.connection().take_history();
}
