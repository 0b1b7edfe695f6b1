use crate::Value;

/// Column constraints declared on a field.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub unique: bool,
    pub not_null: bool,
}

impl Constraints {
    /// DDL suffix written after the column type.
    pub fn ddl_suffix(&self) -> &'static str {
        match (self.unique, self.not_null) {
            (true, true) => "NOT NULL UNIQUE",
            (true, false) => "UNIQUE",
            (false, true) => "NOT NULL",
            (false, false) => "",
        }
    }
}

/// Role of a field in the duplicate avoidance policy applied by
/// [`crate::Session::insert`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupRole {
    #[default]
    None,
    /// Identifies the group of rows a new object is compared against.
    Key,
    /// Compared between the new object and the stored rows.
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Field annotations as declared on the type, produced by `#[derive(Entity)]`.
#[derive(Default, Debug, Clone)]
pub struct FieldDeclaration {
    /// Rust field name.
    pub name: &'static str,
    /// Explicit column name, the field name is used otherwise.
    pub column: Option<&'static str>,
    /// Empty value of the field's semantic type.
    pub value: Value,
    pub primary_key: bool,
    pub constraints: Constraints,
    pub dedup: DedupRole,
    pub order_by: Option<Order>,
}

/// Resolved field metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Position in [`crate::Entity::fields`] and [`crate::Entity::values`].
    pub index: usize,
    pub name: &'static str,
    pub column: &'static str,
    pub value: Value,
    pub primary_key: bool,
    pub constraints: Constraints,
    pub dedup: DedupRole,
    /// Ordering hint, kept only on the one field whose hint is honoured.
    pub ordering: Option<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_suffix() {
        let suffix = |unique, not_null| Constraints { unique, not_null }.ddl_suffix();
        assert_eq!(suffix(true, true), "NOT NULL UNIQUE");
        assert_eq!(suffix(true, false), "UNIQUE");
        assert_eq!(suffix(false, true), "NOT NULL");
        assert_eq!(suffix(false, false), "");
    }
}
