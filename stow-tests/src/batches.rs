use crate::Recording;
use stow::{BATCH_SIZE, Connection, Entity, Session};

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[stow(table = "reading", primary_key = "reading_id")]
pub struct Reading {
    #[stow(primary_key)]
    pub id: i32,
    #[stow(not_null)]
    pub sensor: String,
    #[stow(order_by = "asc")]
    pub sequence: i32,
}

pub fn batches<C: Connection>(session: &mut Session<Recording<C>>) {
    session
        .create_table::<Reading>(true)
        .expect("Failed to create the reading table");
    session.connection().take_history();

    let readings = (0..250)
        .map(|i| Reading {
            sensor: format!("sensor-{}", i % 7),
            sequence: i,
            ..Default::default()
        })
        .collect::<Vec<_>>();
    let result = session.insert_all(readings.iter());
    assert!(
        result.is_ok(),
        "Failed to insert the readings: {:?}",
        result.unwrap_err()
    );
    assert_eq!(result.unwrap().rows_affected, 250);

    let history = session.connection().take_history();
    let rows = history
        .iter()
        .map(|statement| statement.params.len() / 2)
        .collect::<Vec<_>>();
    assert_eq!(rows, [BATCH_SIZE, BATCH_SIZE, 50]);
    assert!(history[0].sql.starts_with(
        "INSERT INTO reading (sensor, sequence) VALUES(@sensor0, @sequence0), (@sensor1, @sequence1), "
    ));
    assert!(history[2].sql.ends_with("(@sensor49, @sequence49);"));

    // Stored in insertion order, read back by the ordering hint
    let stored = session
        .get_all::<Reading>(true, None)
        .expect("Failed to get the readings");
    assert_eq!(stored.len(), 250);
    assert!(stored.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert_eq!(stored[249].sensor, "sensor-4");
    let history = session.connection().take_history();
    assert_eq!(
        history[0].sql,
        "SELECT * FROM reading ORDER BY reading.sequence ASC;"
    );

    // Nothing to insert, nothing sent
    let result = session
        .insert_all(Vec::<Reading>::new().iter())
        .expect("Failed to insert nothing");
    assert_eq!(result.rows_affected, 0);
    assert!(session.connection().history().is_empty());
}
