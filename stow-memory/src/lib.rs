mod connection;
mod driver;
mod parse;
mod storage;

pub use connection::*;
pub use driver::*;
