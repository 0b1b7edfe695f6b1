mod column;
mod condition;
mod expression;

pub use column::*;
pub use condition::*;
pub use expression::*;
