use crate::{
    EntityDescriptor, Error, FieldDescriptor, Operator, Order, PredicateCondition, Result,
    Statement, Value, convert_value, separated_by,
};

/// Row selection of a `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter<'a> {
    All,
    /// Primary key equality, the key is written as an integer literal.
    PrimaryKey(i64),
    /// Equality on any column, bound to `@<column>`.
    Column { column: &'a str, value: Value },
    /// Rows referencing a parent: the child column named after the parent's
    /// primary key equals the parent's key value.
    Parent { column: &'a str, value: Value },
    Condition(&'a PredicateCondition),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    Unordered,
    /// Ordering hint field with its declared direction, nothing if the entity
    /// has no hint.
    Declared,
    /// Ordering hint field with the given direction, the hint is required.
    Forced(Order),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    pub order: OrderBy,
    pub limit: Option<u32>,
}

/// Printer turning entity metadata into SQL statements.
///
/// Every method has a default implementation producing the MySQL flavoured
/// text the drivers expect, a driver overrides only what differs.
pub trait SqlWriter {
    /// SQL type of a non key column.
    fn write_column_type(&self, out: &mut String, field: &FieldDescriptor) -> Result<()> {
        out.push_str(match field.value {
            Value::Int16(..) => "SMALLINT(6)",
            Value::Int32(..) => "INT",
            Value::Varchar(..) => "VARCHAR(255)",
            Value::Blob(..) => "MEDIUMBLOB",
            Value::Timestamp(..) => "TIMESTAMP",
            _ => {
                return Err(Error::UnsupportedType {
                    column: field.column.into(),
                    value: field.value.type_name().into(),
                });
            }
        });
        Ok(())
    }

    fn write_create_table(&self, descriptor: &EntityDescriptor) -> Result<Statement> {
        let mut out = String::with_capacity(64 + descriptor.fields.len() * 32);
        out.push_str("CREATE TABLE ");
        out.push_str(descriptor.table_name);
        out.push_str("( ");
        out.push_str(descriptor.primary_key_column);
        out.push_str(" INT NOT NULL AUTO_INCREMENT, ");
        for field in descriptor.non_key_fields() {
            out.push_str(field.column);
            out.push(' ');
            self.write_column_type(&mut out, field)?;
            out.push(' ');
            out.push_str(field.constraints.ddl_suffix());
            out.push_str(", ");
        }
        out.push_str("PRIMARY KEY (");
        out.push_str(descriptor.primary_key_column);
        out.push_str("));");
        Ok(traced(Statement::new(out)))
    }

    fn write_drop_table(&self, descriptor: &EntityDescriptor) -> Statement {
        traced(Statement::new(format!(
            "DROP TABLE IF EXISTS {};",
            descriptor.table_name
        )))
    }

    fn write_select(
        &self,
        descriptor: &EntityDescriptor,
        filter: &Filter,
        options: SelectOptions,
    ) -> Result<Statement> {
        let mut statement = Statement::default();
        let out = &mut statement.sql;
        out.push_str("SELECT * FROM ");
        out.push_str(descriptor.table_name);
        self.write_where(&mut statement, descriptor, filter)?;
        self.write_order_by(&mut statement.sql, descriptor, options.order)?;
        if let Some(limit) = options.limit {
            let mut buffer = itoa::Buffer::new();
            statement.sql.push_str(" LIMIT ");
            statement.sql.push_str(buffer.format(limit));
        }
        statement.sql.push(';');
        Ok(traced(statement))
    }

    /// Appends ` WHERE ...` for every filter but [`Filter::All`].
    fn write_where(
        &self,
        statement: &mut Statement,
        descriptor: &EntityDescriptor,
        filter: &Filter,
    ) -> Result<()> {
        let (column, value) = match filter {
            Filter::All => return Ok(()),
            Filter::PrimaryKey(id) => {
                let mut buffer = itoa::Buffer::new();
                let out = &mut statement.sql;
                out.push_str(" WHERE ");
                write_qualified(out, descriptor, descriptor.primary_key_column);
                out.push_str(" = ");
                out.push_str(buffer.format(*id));
                return Ok(());
            }
            Filter::Condition(condition) => {
                statement.sql.push_str(" WHERE ");
                self.write_condition(statement, descriptor, condition);
                return Ok(());
            }
            Filter::Column { column, value } => (*column, value),
            Filter::Parent { column, value } => {
                if value.is_null() {
                    return Err(Error::MissingKey(format!(
                        "cannot select `{}` rows by parent, the parent key `{column}` is not assigned",
                        descriptor.table_name
                    )));
                }
                (*column, value)
            }
        };
        let Some(field) = descriptor.field_by_column(column) else {
            return Err(Error::Configuration(format!(
                "table `{}` has no column `{column}`",
                descriptor.table_name
            )));
        };
        let value = convert_value(&field.value, value.clone())?;
        let out = &mut statement.sql;
        out.push_str(" WHERE ");
        write_qualified(out, descriptor, field.column);
        out.push_str(" = @");
        out.push_str(field.column);
        statement.bind(field.column, value);
        Ok(())
    }

    fn write_condition(
        &self,
        statement: &mut Statement,
        descriptor: &EntityDescriptor,
        condition: &PredicateCondition,
    ) {
        let out = &mut statement.sql;
        if condition.negate {
            out.push_str("NOT ");
        }
        write_qualified(out, descriptor, condition.column);
        if condition.operator != Operator::Boolean {
            out.push(' ');
            out.push_str(condition.operator.as_sql());
            out.push_str(" @");
            out.push_str(condition.column);
            statement.bind(condition.column, condition.value.clone());
        }
    }

    /// Appends ` ORDER BY <table>.<column> ASC|DESC` when an order applies.
    fn write_order_by(
        &self,
        out: &mut String,
        descriptor: &EntityDescriptor,
        order: OrderBy,
    ) -> Result<()> {
        let field = descriptor.ordering_field();
        let (field, direction) = match (order, field) {
            (OrderBy::Unordered, _) | (OrderBy::Declared, None) => return Ok(()),
            (OrderBy::Declared, Some(field)) => (field, field.ordering.unwrap_or(Order::Asc)),
            (OrderBy::Forced(direction), Some(field)) => (field, direction),
            (OrderBy::Forced(..), None) => {
                return Err(Error::Configuration(format!(
                    "entity `{}` has no ordering hint field",
                    descriptor.type_name
                )));
            }
        };
        out.push_str(" ORDER BY ");
        write_qualified(out, descriptor, field.column);
        out.push(' ');
        out.push_str(direction.as_sql());
        Ok(())
    }

    fn write_insert(&self, descriptor: &EntityDescriptor, values: &[Value]) -> Result<Statement> {
        let mut statement = self.write_insert_head(descriptor);
        statement.sql.push('(');
        self.write_insert_group(&mut statement, descriptor, values, None)?;
        statement.sql.push_str(");");
        Ok(traced(statement))
    }

    /// One statement inserting every row, placeholders are suffixed by the row
    /// index.
    fn write_bulk_insert(
        &self,
        descriptor: &EntityDescriptor,
        rows: &[Vec<Value>],
    ) -> Result<Statement> {
        if rows.is_empty() {
            return Err(Error::UnsupportedOperation(format!(
                "bulk insert into `{}` needs at least one row",
                descriptor.table_name
            )));
        }
        let mut statement = self.write_insert_head(descriptor);
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                statement.sql.push_str(", ");
            }
            statement.sql.push('(');
            self.write_insert_group(&mut statement, descriptor, row, Some(i))?;
            statement.sql.push(')');
        }
        statement.sql.push(';');
        Ok(traced(statement))
    }

    /// `INSERT INTO <table> (<columns>) VALUES`
    fn write_insert_head(&self, descriptor: &EntityDescriptor) -> Statement {
        let mut out = String::with_capacity(32 + descriptor.fields.len() * 24);
        out.push_str("INSERT INTO ");
        out.push_str(descriptor.table_name);
        out.push_str(" (");
        separated_by(
            &mut out,
            descriptor.non_key_fields(),
            |out, field| out.push_str(field.column),
            ", ",
        );
        out.push_str(") VALUES");
        Statement::new(out)
    }

    /// Placeholders of one row, without the parentheses.
    fn write_insert_group(
        &self,
        statement: &mut Statement,
        descriptor: &EntityDescriptor,
        values: &[Value],
        row: Option<usize>,
    ) -> Result<()> {
        let mut buffer = itoa::Buffer::new();
        let suffix = match row {
            Some(i) => buffer.format(i),
            None => "",
        };
        for (i, field) in descriptor.non_key_fields().enumerate() {
            if i > 0 {
                statement.sql.push_str(", ");
            }
            let name = format!("{}{suffix}", field.column);
            statement.sql.push('@');
            statement.sql.push_str(&name);
            statement.bind(name, value_at(descriptor, values, field)?);
        }
        Ok(())
    }

    fn write_update(&self, descriptor: &EntityDescriptor, values: &[Value]) -> Result<Statement> {
        let primary_key = descriptor.primary_key_field();
        let key = value_at(descriptor, values, primary_key)?;
        if key.is_null() {
            return Err(Error::MissingKey(format!(
                "cannot update `{}`, the primary key `{}` is not assigned",
                descriptor.table_name, primary_key.column
            )));
        }
        let mut statement = Statement::default();
        statement.sql.push_str("UPDATE ");
        statement.sql.push_str(descriptor.table_name);
        statement.sql.push_str(" SET ");
        for (i, field) in descriptor.non_key_fields().enumerate() {
            if i > 0 {
                statement.sql.push_str(", ");
            }
            statement.sql.push_str(field.column);
            statement.sql.push_str(" = @");
            statement.sql.push_str(field.column);
            statement.bind(field.column, value_at(descriptor, values, field)?);
        }
        statement.sql.push_str(" WHERE ");
        write_qualified(&mut statement.sql, descriptor, primary_key.column);
        statement.sql.push_str(" = @");
        statement.sql.push_str(primary_key.column);
        statement.sql.push(';');
        statement.bind(primary_key.column, key);
        Ok(traced(statement))
    }
}

/// The MySQL flavoured printer, uses every default of [`SqlWriter`].
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlWriter;

impl MySqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for MySqlWriter {}

fn write_qualified(out: &mut String, descriptor: &EntityDescriptor, column: &str) {
    out.push_str(descriptor.table_name);
    out.push('.');
    out.push_str(column);
}

fn value_at(
    descriptor: &EntityDescriptor,
    values: &[Value],
    field: &FieldDescriptor,
) -> Result<Value> {
    if values.len() != descriptor.fields.len() {
        return Err(Error::Configuration(format!(
            "entity `{}` declares {} fields but {} values were given",
            descriptor.type_name,
            descriptor.fields.len(),
            values.len()
        )));
    }
    Ok(values[field.index].clone())
}

fn traced(statement: Statement) -> Statement {
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("Generated statement: {statement}");
        for (name, value) in &statement.params {
            log::trace!("  @{name} = {value}");
        }
    }
    statement
}
