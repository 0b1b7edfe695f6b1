mod batches;
mod competitive;
mod nullability;
mod predicates;
mod recording;
mod safe_mode;
mod user;

pub use competitive::{Competitive, Profile};
pub use recording::Recording;
pub use user::User;

use crate::{
    batches::batches, competitive::competitive, nullability::nullability, predicates::predicates,
    safe_mode::safe_mode, user::users,
};
use log::LevelFilter;
use std::env;
use stow::{Connection, DbConfig, Session};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every scenario against `connection`, which must point to a database
/// the tests are free to modify.
pub fn execute_tests<C: Connection>(connection: C, config: DbConfig) {
    let mut session = Session::new(Recording::new(connection), config);
    users(&mut session);
    predicates(&mut session);
    competitive(&mut session);
    batches(&mut session);
    nullability(&mut session);
    let mut session = safe_mode(session);
    assert!(!session.config().safe_mode);
    session.connection().take_history();
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}
