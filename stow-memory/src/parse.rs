use anyhow::{Result, bail};
use sqlparser::{ast as sql_ast, dialect::MySqlDialect, parser::Parser};
use stow_core::{Order, Value, truncate_long};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnType {
    Int,
    SmallInt,
    Varchar(usize),
    Blob,
    Timestamp,
}

impl ColumnType {
    pub(crate) fn prototype(&self) -> Value {
        match self {
            ColumnType::Int => Value::Int32(None),
            ColumnType::SmallInt => Value::Int16(None),
            ColumnType::Varchar(..) => Value::Varchar(None),
            ColumnType::Blob => Value::Blob(None),
            ColumnType::Timestamp => Value::Timestamp(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnDef {
    pub(crate) name: String,
    pub(crate) column_type: ColumnType,
    pub(crate) not_null: bool,
    pub(crate) unique: bool,
    pub(crate) auto_increment: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Param(String),
    Literal(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Condition {
    pub(crate) negate: bool,
    pub(crate) column: String,
    /// `None` when the column itself is the condition.
    pub(crate) comparison: Option<(Comparison, Operand)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
        primary_key: String,
    },
    DropTable {
        table: String,
        if_exists: bool,
    },
    Insert {
        table: String,
        columns: Vec<String>,
        rows: Vec<Vec<Operand>>,
    },
    Select {
        table: String,
        condition: Option<Condition>,
        order: Option<(String, Order)>,
        limit: Option<usize>,
    },
    Update {
        table: String,
        assignments: Vec<(String, Operand)>,
        condition: Option<Condition>,
    },
}

/// Parses one statement of the shapes written by `stow_core::SqlWriter`.
pub(crate) fn parse(sql: &str) -> Result<Command> {
    let mut statements = Parser::parse_sql(&MySqlDialect {}, sql)?;
    if statements.len() != 1 {
        bail!(
            "Expected a single statement, found {} in `{}`",
            statements.len(),
            truncate_long!(sql)
        );
    }
    convert_statement(statements.remove(0))
}

fn convert_statement(statement: sql_ast::Statement) -> Result<Command> {
    match statement {
        sql_ast::Statement::CreateTable(create) => convert_create_table(create),
        sql_ast::Statement::Drop {
            object_type: sql_ast::ObjectType::Table,
            if_exists,
            names,
            ..
        } => {
            let [name] = names.as_slice() else {
                bail!("Only single table DROP is supported");
            };
            Ok(Command::DropTable {
                table: table_name(name)?,
                if_exists,
            })
        }
        sql_ast::Statement::Insert(insert) => convert_insert(insert),
        sql_ast::Statement::Query(query) => convert_query(*query),
        sql_ast::Statement::Update {
            table,
            assignments,
            selection,
            ..
        } => convert_update(table, assignments, selection),
        other => {
            let sql = other.to_string();
            bail!("Unsupported statement `{}`", truncate_long!(sql))
        }
    }
}

fn table_name(name: &sql_ast::ObjectName) -> Result<String> {
    match name.0.as_slice() {
        [part] => Ok(part.to_string()),
        _ => bail!("Qualified table name `{name}` is not supported"),
    }
}

fn table_factor_name(factor: &sql_ast::TableFactor) -> Result<String> {
    match factor {
        sql_ast::TableFactor::Table { name, .. } => table_name(name),
        other => bail!("Unsupported table reference `{other}`"),
    }
}

/// `column` or `table.column`, the qualifier must name `table`.
fn qualified_column(table: &str, parts: &[String]) -> Result<String> {
    match parts {
        [column] => Ok(column.clone()),
        [qualifier, column] if qualifier == table => Ok(column.clone()),
        [qualifier, ..] => {
            bail!("Column qualified by `{qualifier}` while the statement targets `{table}`")
        }
        [] => bail!("Empty column name"),
    }
}

fn convert_column(table: &str, expr: &sql_ast::Expr) -> Result<String> {
    match expr {
        sql_ast::Expr::Identifier(ident) => qualified_column(table, &[ident.value.clone()]),
        sql_ast::Expr::CompoundIdentifier(idents) => {
            let parts: Vec<_> = idents.iter().map(|i| i.value.clone()).collect();
            qualified_column(table, &parts)
        }
        other => bail!("Expected a column, found `{other}`"),
    }
}

fn convert_operand(expr: sql_ast::Expr) -> Result<Operand> {
    match expr {
        // `@name` comes through as an identifier or a placeholder depending on the tokenizer
        sql_ast::Expr::Identifier(ident) if ident.value.starts_with('@') => {
            Ok(Operand::Param(ident.value[1..].to_string()))
        }
        sql_ast::Expr::Value(literal) => match literal.value {
            sql_ast::Value::Placeholder(name) if name.len() > 1 && name.starts_with('@') => {
                Ok(Operand::Param(name[1..].to_string()))
            }
            sql_ast::Value::Number(number, _) => match number.parse() {
                Ok(value) => Ok(Operand::Literal(Value::Int64(Some(value)))),
                Err(..) => bail!("Invalid number `{number}`"),
            },
            sql_ast::Value::Null => Ok(Operand::Literal(Value::Null)),
            other => bail!("Unsupported value `{other}`"),
        },
        sql_ast::Expr::UnaryOp {
            op: sql_ast::UnaryOperator::Minus,
            expr,
        } => match convert_operand(*expr)? {
            Operand::Literal(Value::Int64(Some(value))) => {
                Ok(Operand::Literal(Value::Int64(Some(-value))))
            }
            other => bail!("Cannot negate {other:?}"),
        },
        other => bail!("Expected a value, found `{other}`"),
    }
}

fn convert_condition(table: &str, expr: sql_ast::Expr) -> Result<Condition> {
    match expr {
        sql_ast::Expr::UnaryOp {
            op: sql_ast::UnaryOperator::Not,
            expr,
        } => {
            let mut condition = convert_condition(table, *expr)?;
            if condition.negate {
                bail!("Nested negation is not supported");
            }
            condition.negate = true;
            Ok(condition)
        }
        sql_ast::Expr::BinaryOp { left, op, right } => {
            let comparison = match op {
                sql_ast::BinaryOperator::Eq => Comparison::Equal,
                sql_ast::BinaryOperator::NotEq => Comparison::NotEqual,
                sql_ast::BinaryOperator::Lt => Comparison::Less,
                sql_ast::BinaryOperator::LtEq => Comparison::LessEqual,
                sql_ast::BinaryOperator::Gt => Comparison::Greater,
                sql_ast::BinaryOperator::GtEq => Comparison::GreaterEqual,
                sql_ast::BinaryOperator::And => Comparison::And,
                sql_ast::BinaryOperator::Or => Comparison::Or,
                other => bail!("Unsupported operator `{other}`"),
            };
            let mut condition = convert_condition(table, *left)?;
            if condition.comparison.is_some() {
                bail!("Only one comparison per condition is supported");
            }
            condition.comparison = Some((comparison, convert_operand(*right)?));
            Ok(condition)
        }
        expr => Ok(Condition {
            negate: false,
            column: convert_column(table, &expr)?,
            comparison: None,
        }),
    }
}

fn convert_create_table(create: sql_ast::CreateTable) -> Result<Command> {
    let table = table_name(&create.name)?;
    let columns = create
        .columns
        .into_iter()
        .map(convert_column_def)
        .collect::<Result<Vec<_>>>()?;
    let mut primary_key = None;
    for constraint in create.constraints {
        match constraint {
            sql_ast::TableConstraint::PrimaryKey { columns, .. } if columns.len() == 1 => {
                primary_key = Some(columns[0].to_string());
            }
            other => bail!("Unsupported constraint `{other}` on `{table}`"),
        }
    }
    let Some(primary_key) = primary_key else {
        bail!("Table `{table}` declares no primary key");
    };
    if !columns.iter().any(|c| c.name == primary_key) {
        bail!("Primary key `{primary_key}` is not a column of `{table}`");
    }
    Ok(Command::CreateTable {
        table,
        columns,
        primary_key,
    })
}

fn convert_column_def(column: sql_ast::ColumnDef) -> Result<ColumnDef> {
    let name = column.name.value;
    let column_type = match &column.data_type {
        sql_ast::DataType::Int(_) | sql_ast::DataType::Integer(_) => ColumnType::Int,
        sql_ast::DataType::SmallInt(_) => ColumnType::SmallInt,
        sql_ast::DataType::Varchar(Some(sql_ast::CharacterLength::IntegerLength {
            length,
            ..
        })) if *length > 0 => ColumnType::Varchar(*length as usize),
        sql_ast::DataType::Timestamp(..) => ColumnType::Timestamp,
        other if other.to_string().eq_ignore_ascii_case("MEDIUMBLOB") => ColumnType::Blob,
        other => bail!("Unsupported column type `{other}` for `{name}`"),
    };
    let mut result = ColumnDef {
        name,
        column_type,
        not_null: false,
        unique: false,
        auto_increment: false,
    };
    for option in column.options {
        match option.option {
            sql_ast::ColumnOption::NotNull => result.not_null = true,
            sql_ast::ColumnOption::Unique { .. } => result.unique = true,
            // MySQL specific, kept as raw tokens
            other if other.to_string().eq_ignore_ascii_case("AUTO_INCREMENT") => {
                result.auto_increment = true;
            }
            other => bail!("Unsupported option `{other}` for `{}`", result.name),
        }
    }
    Ok(result)
}

fn convert_insert(insert: sql_ast::Insert) -> Result<Command> {
    let table = insert.table.to_string();
    let columns: Vec<String> = insert.columns.into_iter().map(|c| c.value).collect();
    let Some(source) = insert.source else {
        bail!("Insert into `{table}` without values");
    };
    let sql_ast::SetExpr::Values(values) = *source.body else {
        bail!("Only VALUES is supported when inserting into `{table}`");
    };
    let rows = values
        .rows
        .into_iter()
        .map(|row| {
            if row.len() != columns.len() {
                bail!(
                    "Insert into `{table}` lists {} columns but a row has {} values",
                    columns.len(),
                    row.len()
                );
            }
            row.into_iter().map(convert_operand).collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Command::Insert {
        table,
        columns,
        rows,
    })
}

fn convert_query(query: sql_ast::Query) -> Result<Command> {
    let sql_ast::SetExpr::Select(select) = *query.body else {
        bail!("Only SELECT queries are supported");
    };
    let select = *select;
    if !matches!(
        select.projection.as_slice(),
        [sql_ast::SelectItem::Wildcard(..)]
    ) {
        bail!("Only `SELECT *` is supported");
    }
    let table = match select.from.as_slice() {
        [from] if from.joins.is_empty() => table_factor_name(&from.relation)?,
        _ => bail!("Only selects from a single table are supported"),
    };
    let condition = select
        .selection
        .map(|expr| convert_condition(&table, expr))
        .transpose()?;
    let order = match query.order_by {
        None => None,
        Some(order_by) => {
            let mut expressions = match order_by.kind {
                sql_ast::OrderByKind::Expressions(expressions) => expressions,
                other => bail!("Unsupported ordering {other:?}"),
            };
            if expressions.len() != 1 {
                bail!("Only ordering by a single column is supported");
            }
            let expression = expressions.remove(0);
            let column = convert_column(&table, &expression.expr)?;
            let order = match expression.options.asc {
                Some(false) => Order::Desc,
                _ => Order::Asc,
            };
            Some((column, order))
        }
    };
    let limit = match query.limit_clause {
        None
        | Some(sql_ast::LimitClause::LimitOffset {
            limit: None,
            offset: None,
            ..
        }) => None,
        Some(sql_ast::LimitClause::LimitOffset {
            limit: Some(limit),
            offset: None,
            ..
        }) => match convert_operand(limit)? {
            Operand::Literal(Value::Int64(Some(limit))) if limit >= 0 => Some(limit as usize),
            other => bail!("Invalid limit {other:?}"),
        },
        Some(other) => bail!("Unsupported limit {other:?}"),
    };
    Ok(Command::Select {
        table,
        condition,
        order,
        limit,
    })
}

fn convert_update(
    table: sql_ast::TableWithJoins,
    assignments: Vec<sql_ast::Assignment>,
    selection: Option<sql_ast::Expr>,
) -> Result<Command> {
    if !table.joins.is_empty() {
        bail!("Updates with joins are not supported");
    }
    let table = table_factor_name(&table.relation)?;
    let assignments = assignments
        .into_iter()
        .map(|assignment| {
            let sql_ast::AssignmentTarget::ColumnName(name) = &assignment.target else {
                bail!("Only column names can be assigned in `{table}`");
            };
            let parts: Vec<_> = name.0.iter().map(ToString::to_string).collect();
            Ok((
                qualified_column(&table, &parts)?,
                convert_operand(assignment.value)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    let condition = selection
        .map(|expr| convert_condition(&table, expr))
        .transpose()?;
    Ok(Command::Update {
        table,
        assignments,
        condition,
    })
}
