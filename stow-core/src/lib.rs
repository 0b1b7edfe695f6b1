mod as_value;
mod column;
mod config;
mod connection;
mod driver;
mod entity;
mod error;
mod expression;
mod resolve;
mod session;
mod session_cell;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use config::*;
pub use connection::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use expression::*;
pub use resolve::*;
pub use session::*;
pub use session_cell::*;
pub use util::*;
pub use value::*;
pub use writer::*;
