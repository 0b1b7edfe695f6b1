#[cfg(test)]
mod tests {
    use stow::{
        Entity, Error, Filter, MySqlWriter, Order, OrderBy, SelectOptions, SqlWriter, Statement,
        Value, translate,
    };
    use time::macros::datetime;

    #[derive(Entity, Default)]
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

    #[derive(Entity, Default)]
    #[stow(table = "match_result", primary_key = "match_id")]
    pub struct MatchResult {
        #[stow(primary_key)]
        pub id: i32,
        #[stow(column = "profile_id")]
        pub profile: i32,
        #[stow(unique)]
        pub code: Option<String>,
        pub replay: Option<Box<[u8]>>,
        pub kills: i16,
        #[stow(order_by = "desc")]
        pub played: Option<time::PrimitiveDateTime>,
    }

    #[derive(Entity, Default)]
    #[stow(table = "flags")]
    pub struct Flags {
        #[stow(primary_key)]
        pub id: i32,
        pub enabled: bool,
    }

    const WRITER: MySqlWriter = MySqlWriter::new();

    #[test]
    fn create_and_drop() {
        let descriptor = User::descriptor().unwrap();
        let statement = WRITER.write_create_table(descriptor).unwrap();
        assert_eq!(
            statement.sql,
            "CREATE TABLE user( user_id INT NOT NULL AUTO_INCREMENT, username VARCHAR(255) NOT NULL UNIQUE, password VARCHAR(255) NOT NULL, email VARCHAR(255) NOT NULL, last_login TIMESTAMP , PRIMARY KEY (user_id));"
        );
        assert!(statement.params.is_empty());
        assert_eq!(
            WRITER.write_drop_table(descriptor).sql,
            "DROP TABLE IF EXISTS user;"
        );

        let statement = WRITER
            .write_create_table(MatchResult::descriptor().unwrap())
            .unwrap();
        assert_eq!(
            statement.sql,
            "CREATE TABLE match_result( match_id INT NOT NULL AUTO_INCREMENT, profile_id INT , code VARCHAR(255) UNIQUE, replay MEDIUMBLOB , kills SMALLINT(6) , played TIMESTAMP , PRIMARY KEY (match_id));"
        );
    }

    #[test]
    fn unsupported_column_type() {
        let result = WRITER.write_create_table(Flags::descriptor().unwrap());
        assert!(matches!(
            result,
            Err(Error::UnsupportedType { column, value }) if column == "enabled" && value == "boolean"
        ));
    }

    #[test]
    fn insert() {
        let user = User {
            id: 0,
            username: "rick".into(),
            password: "pickle".into(),
            email: "rick@example.com".into(),
            last_login: Some(datetime!(2025-03-01 12:00:00)),
        };
        let statement = WRITER
            .write_insert(User::descriptor().unwrap(), &user.values())
            .unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO user (username, password, email, last_login) VALUES(@username, @password, @email, @last_login);"
        );
        assert_eq!(
            statement.param("username"),
            Some(&Value::Varchar(Some("rick".into())))
        );
        assert_eq!(
            statement.param("last_login"),
            Some(&Value::Timestamp(Some(datetime!(2025-03-01 12:00:00))))
        );
        assert_eq!(statement.param("user_id"), None);
    }

    #[test]
    fn bulk_insert() {
        let descriptor = MatchResult::descriptor().unwrap();
        let rows = (0..3)
            .map(|i| {
                MatchResult {
                    profile: 7,
                    kills: i,
                    ..Default::default()
                }
                .values()
            })
            .collect::<Vec<_>>();
        let statement = WRITER.write_bulk_insert(descriptor, &rows).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO match_result (profile_id, code, replay, kills, played) VALUES\
            (@profile_id0, @code0, @replay0, @kills0, @played0), \
            (@profile_id1, @code1, @replay1, @kills1, @played1), \
            (@profile_id2, @code2, @replay2, @kills2, @played2);"
        );
        assert_eq!(statement.params.len(), 15);
        assert_eq!(statement.param("kills2"), Some(&Value::Int16(Some(2))));
        assert_eq!(statement.param("code1"), Some(&Value::Varchar(None)));
        assert!(matches!(
            WRITER.write_bulk_insert(descriptor, &[]),
            Err(Error::UnsupportedOperation(..))
        ));
    }

    #[test]
    fn update() {
        let user = User {
            id: 5,
            username: "morty".into(),
            ..Default::default()
        };
        let descriptor = User::descriptor().unwrap();
        let statement = WRITER.write_update(descriptor, &user.values()).unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE user SET username = @username, password = @password, email = @email, last_login = @last_login WHERE user.user_id = @user_id;"
        );
        assert_eq!(statement.param("user_id"), Some(&Value::Int32(Some(5))));
        assert_eq!(statement.param("last_login"), Some(&Value::Timestamp(None)));

        let mut values = user.values();
        values[0] = Value::Int32(None);
        assert!(matches!(
            WRITER.write_update(descriptor, &values),
            Err(Error::MissingKey(..))
        ));
        assert!(matches!(
            WRITER.write_update(descriptor, &values[..2]),
            Err(Error::Configuration(..))
        ));
    }

    #[test]
    fn select() {
        let descriptor = MatchResult::descriptor().unwrap();
        let sql = |filter: &Filter, order: OrderBy, limit: Option<u32>| -> Statement {
            WRITER
                .write_select(descriptor, filter, SelectOptions { order, limit })
                .unwrap()
        };
        assert_eq!(
            sql(&Filter::All, OrderBy::Unordered, None).sql,
            "SELECT * FROM match_result;"
        );
        assert_eq!(
            sql(&Filter::PrimaryKey(42), OrderBy::Unordered, None).sql,
            "SELECT * FROM match_result WHERE match_result.match_id = 42;"
        );
        assert_eq!(
            sql(&Filter::All, OrderBy::Declared, Some(10)).sql,
            "SELECT * FROM match_result ORDER BY match_result.played DESC LIMIT 10;"
        );
        assert_eq!(
            sql(&Filter::All, OrderBy::Forced(Order::Asc), None).sql,
            "SELECT * FROM match_result ORDER BY match_result.played ASC;"
        );

        let statement = sql(
            &Filter::Column {
                column: "profile_id",
                value: Value::Int64(Some(7)),
            },
            OrderBy::Forced(Order::Desc),
            Some(2),
        );
        assert_eq!(
            statement.sql,
            "SELECT * FROM match_result WHERE match_result.profile_id = @profile_id ORDER BY match_result.played DESC LIMIT 2;"
        );
        assert_eq!(statement.params, [("profile_id".to_string(), Value::Int32(Some(7)))]);

        let statement = sql(
            &Filter::Parent {
                column: "profile_id",
                value: Value::Int32(Some(3)),
            },
            OrderBy::Unordered,
            None,
        );
        assert_eq!(
            statement.sql,
            "SELECT * FROM match_result WHERE match_result.profile_id = @profile_id;"
        );
    }

    #[test]
    fn select_errors() {
        let descriptor = MatchResult::descriptor().unwrap();
        let parent = Filter::Parent {
            column: "profile_id",
            value: Value::Int32(None),
        };
        assert!(matches!(
            WRITER.write_select(descriptor, &parent, SelectOptions::default()),
            Err(Error::MissingKey(..))
        ));
        let unknown = Filter::Parent {
            column: "team_id",
            value: Value::Int32(Some(1)),
        };
        assert!(matches!(
            WRITER.write_select(descriptor, &unknown, SelectOptions::default()),
            Err(Error::Configuration(..))
        ));
        let forced = SelectOptions {
            order: OrderBy::Forced(Order::Desc),
            limit: None,
        };
        assert!(matches!(
            WRITER.write_select(User::descriptor().unwrap(), &Filter::All, forced),
            Err(Error::Configuration(..))
        ));
        // Without a hint a declared order is simply omitted
        let declared = SelectOptions {
            order: OrderBy::Declared,
            limit: Some(1),
        };
        assert_eq!(
            WRITER
                .write_select(User::descriptor().unwrap(), &Filter::All, declared)
                .unwrap()
                .sql,
            "SELECT * FROM user LIMIT 1;"
        );
    }

    #[test]
    fn conditions() {
        let descriptor = MatchResult::descriptor().unwrap();
        let select = |predicate: stow::Predicate<MatchResult>| {
            let condition = translate(descriptor, &predicate.expression).unwrap();
            WRITER
                .write_select(
                    descriptor,
                    &Filter::Condition(&condition),
                    SelectOptions::default(),
                )
                .unwrap()
        };
        let statement = select(MatchResult::kills.ge(3));
        assert_eq!(
            statement.sql,
            "SELECT * FROM match_result WHERE match_result.kills >= @kills;"
        );
        assert_eq!(statement.param("kills"), Some(&Value::Int16(Some(3))));
        assert_eq!(
            select(!MatchResult::profile.eq(1)).sql,
            "SELECT * FROM match_result WHERE NOT match_result.profile_id = @profile_id;"
        );
        assert_eq!(
            select(MatchResult::kills.lt(1)).sql,
            "SELECT * FROM match_result WHERE match_result.kills < @kills;"
        );
        assert_eq!(
            select(MatchResult::kills.le(1)).sql,
            "SELECT * FROM match_result WHERE match_result.kills <= @kills;"
        );
        // Nullable columns take the inner type as well
        let statement = select(MatchResult::code.ne("abc"));
        assert_eq!(
            statement.sql,
            "SELECT * FROM match_result WHERE NOT match_result.code = @code;"
        );
        assert_eq!(statement.param("code"), Some(&Value::from("abc")));
        let played = datetime!(2024-03-01 20:00);
        let statement = select(MatchResult::played.gt(played));
        assert_eq!(
            statement.sql,
            "SELECT * FROM match_result WHERE match_result.played > @played;"
        );
        assert_eq!(statement.param("played"), Some(&Value::Timestamp(Some(played))));
        assert_eq!(
            select(MatchResult::played.gt(Some(played))).param("played"),
            Some(&Value::Timestamp(Some(played)))
        );
    }

    #[test]
    fn statement_display() {
        let mut statement = Statement::new("SELECT * FROM user;");
        statement.bind("unused", Value::Null);
        assert_eq!(statement.to_string(), "SELECT * FROM user;");
        let long = Statement::new(format!("SELECT * FROM user WHERE {};", "x".repeat(600)));
        let shown = long.to_string();
        assert!(shown.len() < 510);
        assert!(shown.ends_with("..."));
    }
}
