use crate::{Value, truncate_long};
use std::fmt::{self, Display, Formatter};

/// SQL text together with the values bound to its `@name` placeholders.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Binds `value` to the placeholder `@name`.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.params.push((name.into(), value));
    }

    /// Value bound to `@name`.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
