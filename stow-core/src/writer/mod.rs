mod sql_writer;
mod statement;

pub use sql_writer::*;
pub use statement::*;
