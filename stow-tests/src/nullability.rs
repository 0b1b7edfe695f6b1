use crate::Recording;
use stow::{Connection, Entity, Session};
use time::macros::datetime;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[stow(table = "note")]
pub struct Note {
    #[stow(primary_key)]
    pub id: i32,
    #[stow(not_null)]
    pub title: Option<String>,
    pub body: Option<String>,
    pub rating: Option<i16>,
    pub attachment: Option<Vec<u8>>,
    #[stow(column = "created_at")]
    pub created: Option<time::PrimitiveDateTime>,
    #[stow(skip)]
    pub cached: Option<String>,
}

pub fn nullability<C: Connection>(session: &mut Session<Recording<C>>) {
    session
        .create_table::<Note>(true)
        .expect("Failed to create the note table");
    let history = session.connection().take_history();
    assert_eq!(
        history[1].sql,
        "CREATE TABLE note( note_id INT NOT NULL AUTO_INCREMENT, title VARCHAR(255) NOT NULL, body VARCHAR(255) , rating SMALLINT(6) , attachment MEDIUMBLOB , created_at TIMESTAMP , PRIMARY KEY (note_id));"
    );

    // Absent values round trip as absent
    let mut empty = Note {
        title: Some("empty".into()),
        cached: Some("not stored".into()),
        ..Default::default()
    };
    session.insert(&mut empty).expect("Failed to insert");
    let found = session
        .get::<Note>(empty.id.into())
        .expect("Failed to get")
        .expect("The note was not found");
    assert_eq!(
        found,
        Note {
            cached: None,
            ..empty.clone()
        }
    );

    // Present values round trip as present
    let mut full = Note {
        title: Some("full".into()),
        body: Some("Lorem ipsum dolor sit amet".into()),
        rating: Some(-3),
        attachment: Some(vec![0, 1, 2, 254, 255]),
        created: Some(datetime!(2024-02-29 23:59:59)),
        ..Default::default()
    };
    session.insert(&mut full).expect("Failed to insert");
    let found = session
        .get::<Note>(full.id.into())
        .expect("Failed to get")
        .expect("The note was not found");
    assert_eq!(found, full);

    // Clearing a value stores NULL
    full.body = None;
    session.update(&full).expect("Failed to update");
    let found = session
        .get::<Note>(full.id.into())
        .expect("Failed to get")
        .expect("The note was not found");
    assert_eq!(found.body, None);
    assert_eq!(found.rating, Some(-3));

    // The database refuses a missing required value
    let mut untitled = Note::default();
    let result = session.insert(&mut untitled);
    assert!(matches!(result, Err(stow::Error::Driver(..))));
    assert_eq!(untitled.id, 0);
    session.connection().take_history();
}
