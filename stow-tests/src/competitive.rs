use crate::Recording;
use stow::{Connection, Entity, Session};
use time::macros::datetime;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[stow(table = "profile")]
pub struct Profile {
    #[stow(primary_key)]
    pub id: i32,
    #[stow(unique, not_null)]
    pub nickname: String,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[stow(table = "competitive")]
pub struct Competitive {
    #[stow(primary_key)]
    pub id: i32,
    #[stow(dedup = "key", not_null)]
    pub profile_id: i32,
    pub season_id: i32,
    #[stow(order_by = "desc")]
    pub date: Option<time::PrimitiveDateTime>,
    #[stow(dedup = "field")]
    pub wins: i32,
    #[stow(dedup = "field")]
    pub lost: i32,
    #[stow(dedup = "field")]
    pub ties: i32,
    #[stow(dedup = "field")]
    pub play_time: i32,
}

/// Declares a dedup key but no ordering hint, so the most recent row cannot
/// be told apart.
#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[stow(table = "score")]
pub struct Score {
    #[stow(primary_key)]
    pub id: i32,
    #[stow(dedup = "key")]
    pub owner: i32,
    #[stow(dedup = "field")]
    pub points: i32,
}

pub fn competitive<C: Connection>(session: &mut Session<Recording<C>>) {
    session
        .create_table::<Profile>(true)
        .expect("Failed to create the profile table");
    session
        .create_table::<Competitive>(true)
        .expect("Failed to create the competitive table");
    let mut profile = Profile {
        nickname: "rick".into(),
        ..Default::default()
    };
    session.insert(&mut profile).expect("Failed to insert the profile");
    session.connection().take_history();

    let record = Competitive {
        profile_id: profile.id,
        season_id: 3,
        date: Some(datetime!(2025-01-10 20:00:00)),
        wins: 10,
        lost: 4,
        ties: 1,
        play_time: 7200,
        ..Default::default()
    };

    // First insert is always stored
    let mut first = record.clone();
    session.insert(&mut first).expect("Failed to insert");
    assert_eq!(first.id, 1);
    let history = session.connection().take_history();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[0].sql,
        "SELECT * FROM competitive WHERE competitive.profile_id = @profile_id ORDER BY competitive.date DESC LIMIT 2;"
    );
    assert!(history[1].sql.starts_with("INSERT INTO competitive "));

    // Same statistics, later date: the stored row moves forward
    let mut second = Competitive {
        date: Some(datetime!(2025-01-11 20:00:00)),
        ..record.clone()
    };
    session.insert(&mut second).expect("Failed to insert");
    assert_eq!(second.id, 1);
    assert_eq!(second.date, Some(datetime!(2025-01-11 20:00:00)));
    let history = session.connection().take_history();
    assert_eq!(history.len(), 2);
    assert!(history[1].sql.starts_with("UPDATE competitive SET "));
    let all = session
        .get_all::<Competitive>(false, None)
        .expect("Failed to get all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].date, Some(datetime!(2025-01-11 20:00:00)));

    // Repeating the same insert changes nothing
    let mut third = second.clone();
    third.id = 0;
    session.insert(&mut third).expect("Failed to insert");
    assert_eq!(third, second);
    assert_eq!(
        session
            .get_all::<Competitive>(false, None)
            .expect("Failed to get all")
            .len(),
        1
    );

    // Different statistics are stored as a new row
    let mut fourth = Competitive {
        date: Some(datetime!(2025-01-12 20:00:00)),
        wins: 11,
        ..record.clone()
    };
    session.insert(&mut fourth).expect("Failed to insert");
    assert_eq!(fourth.id, 2);

    // Back to the older statistics: differs from the latest row, inserted again
    let mut fifth = Competitive {
        date: Some(datetime!(2025-01-13 20:00:00)),
        ..record.clone()
    };
    session.insert(&mut fifth).expect("Failed to insert");
    assert_eq!(fifth.id, 3);

    // Another profile never matches the first one
    let mut other = Profile {
        nickname: "morty".into(),
        ..Default::default()
    };
    session.insert(&mut other).expect("Failed to insert the profile");
    let mut foreign = Competitive {
        profile_id: other.id,
        ..record.clone()
    };
    session.insert(&mut foreign).expect("Failed to insert");
    assert_eq!(foreign.id, 4);

    // Children of a profile, most recent first
    let records = session
        .get_all_by_parent::<Competitive, _>(&profile, true, None)
        .expect("Failed to get the records of the profile");
    assert_eq!(
        records.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );
    let latest = session
        .get_all_by_parent::<Competitive, _>(&profile, true, Some(1))
        .expect("Failed to get the records of the profile");
    assert_eq!(latest, vec![fifth]);
    let history = session.connection().take_history();
    assert_eq!(
        history.last().map(|s| s.sql.as_str()),
        Some(
            "SELECT * FROM competitive WHERE competitive.profile_id = @profile_id ORDER BY competitive.date DESC LIMIT 1;"
        )
    );

    // A profile never inserted has the key 0, no row references it
    let orphans = session
        .get_all_by_parent::<Competitive, _>(&Profile::default(), true, None)
        .expect("Failed to get the records of an unsaved profile");
    assert!(orphans.is_empty());
    session.connection().take_history();

    // Bulk insert cannot check for duplicates
    let result = session.insert_all([&record]);
    assert!(matches!(result, Err(stow::Error::UnsupportedOperation(..))));
    assert!(session.connection().history().is_empty());

    // Dedup key without ordering hint, refused before any statement
    let mut score = Score {
        owner: profile.id,
        points: 5,
        ..Default::default()
    };
    let result = session.insert(&mut score);
    assert!(matches!(result, Err(stow::Error::Configuration(..))));
    assert_eq!(score.id, 0);
    assert!(session.connection().history().is_empty());
}
