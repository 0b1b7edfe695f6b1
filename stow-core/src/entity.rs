use crate::{DedupRole, FieldDeclaration, FieldDescriptor, Result, Value, resolve};

/// Table level annotations.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDeclaration {
    pub name: Option<&'static str>,
    /// Explicit primary key column, must agree with the primary key field.
    pub primary_key: Option<&'static str>,
}

/// A plain data type mapped onto a table.
///
/// Normally implemented through `#[derive(Entity)]`. `values` and `set_value`
/// index fields by their position in `fields`.
pub trait Entity: Default + 'static {
    fn table() -> TableDeclaration;
    fn fields() -> &'static [FieldDeclaration];
    /// Current value of every declared field, in declaration order.
    fn values(&self) -> Vec<Value>;
    /// Assigns the field at `index`, converting the value to the field type.
    fn set_value(&mut self, index: usize, value: Value) -> Result<()>;

    /// Resolved and cached metadata.
    fn descriptor() -> Result<&'static EntityDescriptor> {
        resolve::<Self>()
    }
}

/// Metadata of an entity type, resolved once and shared for the rest of the
/// process.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub type_name: &'static str,
    pub table_name: &'static str,
    pub primary_key_column: &'static str,
    pub fields: Box<[FieldDescriptor]>,
    pub(crate) primary_key: usize,
    pub(crate) ordering: Option<usize>,
    pub(crate) dedup_key: Option<usize>,
}

impl EntityDescriptor {
    pub fn primary_key_field(&self) -> &FieldDescriptor {
        &self.fields[self.primary_key]
    }

    /// The field whose ordering hint is honoured.
    pub fn ordering_field(&self) -> Option<&FieldDescriptor> {
        self.ordering.map(|i| &self.fields[i])
    }

    pub fn dedup_key_field(&self) -> Option<&FieldDescriptor> {
        self.dedup_key.map(|i| &self.fields[i])
    }

    pub fn dedup_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.dedup == DedupRole::Field)
    }

    /// Every field except the primary key, in declaration order.
    pub fn non_key_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.primary_key)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_column(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.column == column)
    }
}
