use crate::parse::{ColumnDef, ColumnType, Command, Comparison, Condition, Operand};
use anyhow::{Context, Result, bail};
use std::{cmp::Ordering, collections::HashMap, sync::Arc};
use stow_core::{Order, RowsAffected, Value, convert_value};

pub(crate) enum Outcome {
    Affected(RowsAffected),
    Rows {
        columns: Arc<[String]>,
        rows: Vec<Vec<Value>>,
    },
}

#[derive(Debug)]
struct Table {
    columns: Vec<ColumnDef>,
    primary_key: usize,
    rows: Vec<Vec<Value>>,
    next_id: i64,
}

impl Table {
    fn column_index(&self, table: &str, name: &str) -> Result<usize> {
        match self.columns.iter().position(|c| c.name == name) {
            Some(i) => Ok(i),
            None => bail!("Unknown column `{name}` in table `{table}`"),
        }
    }

    /// NOT NULL, VARCHAR length and UNIQUE checks of `row` against `others`.
    fn check<'a>(
        &self,
        table: &str,
        row: &[Value],
        others: impl Iterator<Item = &'a Vec<Value>> + Clone,
    ) -> Result<()> {
        for (i, column) in self.columns.iter().enumerate() {
            let value = &row[i];
            if value.is_null() {
                if column.not_null {
                    bail!("Column `{table}.{}` cannot be null", column.name);
                }
                continue;
            }
            if let (ColumnType::Varchar(max), Value::Varchar(Some(v))) = (column.column_type, value)
            {
                if v.chars().count() > max {
                    bail!("Data too long for column `{table}.{}`", column.name);
                }
            }
            if column.unique || i == self.primary_key {
                let duplicated = others.clone().any(|other| other[i] == *value);
                if duplicated {
                    bail!(
                        "Duplicate entry {value} for key `{table}.{}`",
                        column.name
                    );
                }
            }
        }
        Ok(())
    }
}

/// Tables of one database.
#[derive(Debug, Default)]
pub(crate) struct Database {
    tables: HashMap<String, Table>,
}

impl Database {
    fn table(&mut self, name: &str) -> Result<&mut Table> {
        match self.tables.get_mut(name) {
            Some(table) => Ok(table),
            None => bail!("Table `{name}` doesn't exist"),
        }
    }

    pub(crate) fn run(&mut self, command: Command, params: &[(String, Value)]) -> Result<Outcome> {
        let bound = |operand: &Operand| -> Result<Value> {
            match operand {
                Operand::Literal(value) => Ok(value.clone()),
                Operand::Param(name) => params
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
                    .with_context(|| format!("No value bound to `@{name}`")),
            }
        };
        let affected = |rows_affected: usize, last_insert_id: Option<i64>| {
            Outcome::Affected(RowsAffected {
                rows_affected: rows_affected as u64,
                last_insert_id,
            })
        };
        Ok(match command {
            Command::CreateTable {
                table,
                columns,
                primary_key,
            } => {
                if self.tables.contains_key(&table) {
                    bail!("Table `{table}` already exists");
                }
                let primary_key = columns
                    .iter()
                    .position(|c| c.name == primary_key)
                    .with_context(|| format!("Unknown primary key column `{primary_key}`"))?;
                log::debug!("Creating memory table `{table}`");
                self.tables.insert(
                    table,
                    Table {
                        columns,
                        primary_key,
                        rows: Vec::new(),
                        next_id: 1,
                    },
                );
                affected(0, None)
            }
            Command::DropTable { table, if_exists } => {
                if self.tables.remove(&table).is_none() && !if_exists {
                    bail!("Unknown table `{table}`");
                }
                affected(0, None)
            }
            Command::Insert {
                table: name,
                columns,
                rows,
            } => {
                let table = self.table(&name)?;
                let indexes = columns
                    .iter()
                    .map(|c| table.column_index(&name, c))
                    .collect::<Result<Vec<_>>>()?;
                let mut pending: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
                let mut next_id = table.next_id;
                let mut first_id = None;
                for operands in &rows {
                    let mut row: Vec<Value> =
                        table.columns.iter().map(|c| c.column_type.prototype()).collect();
                    for (index, operand) in indexes.iter().zip(operands) {
                        let column = &table.columns[*index];
                        row[*index] = convert_value(&column.column_type.prototype(), bound(operand)?)
                            .with_context(|| format!("While writing `{name}.{}`", column.name))?;
                    }
                    let key = &table.columns[table.primary_key];
                    if key.auto_increment && row[table.primary_key].is_null() {
                        row[table.primary_key] =
                            convert_value(&key.column_type.prototype(), Value::Int64(Some(next_id)))?;
                        first_id.get_or_insert(next_id);
                        next_id += 1;
                    }
                    table.check(&name, &row, table.rows.iter().chain(&pending))?;
                    pending.push(row);
                }
                table.next_id = next_id;
                let count = pending.len();
                table.rows.extend(pending);
                affected(count, first_id)
            }
            Command::Select {
                table: name,
                condition,
                order,
                limit,
            } => {
                let table = self.table(&name)?;
                let condition = condition
                    .map(|c| Filter::new(table, &name, &c, &bound))
                    .transpose()?;
                let mut rows: Vec<Vec<Value>> = table
                    .rows
                    .iter()
                    .filter(|row| condition.as_ref().is_none_or(|c| c.matches(row)))
                    .cloned()
                    .collect();
                if let Some((column, order)) = order {
                    let i = table.column_index(&name, &column)?;
                    rows.sort_by(|a, b| {
                        let ordering = compare_nulls_first(&a[i], &b[i]);
                        match order {
                            Order::Asc => ordering,
                            Order::Desc => ordering.reverse(),
                        }
                    });
                }
                if let Some(limit) = limit {
                    rows.truncate(limit);
                }
                Outcome::Rows {
                    columns: table.columns.iter().map(|c| c.name.clone()).collect(),
                    rows,
                }
            }
            Command::Update {
                table: name,
                assignments,
                condition,
            } => {
                let table = self.table(&name)?;
                let condition = condition
                    .map(|c| Filter::new(table, &name, &c, &bound))
                    .transpose()?;
                let assignments = assignments
                    .iter()
                    .map(|(column, operand)| {
                        let i = table.column_index(&name, column)?;
                        let value =
                            convert_value(&table.columns[i].column_type.prototype(), bound(operand)?)
                                .with_context(|| format!("While writing `{name}.{column}`"))?;
                        Ok((i, value))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let matching: Vec<usize> = table
                    .rows
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| condition.as_ref().is_none_or(|c| c.matches(row)))
                    .map(|(i, _)| i)
                    .collect();
                let mut rows = table.rows.clone();
                for &r in &matching {
                    for (i, value) in &assignments {
                        rows[r][*i] = value.clone();
                    }
                }
                for &r in &matching {
                    let others = rows.iter().enumerate().filter(move |(j, _)| *j != r);
                    table.check(&name, &rows[r], others.map(|(_, row)| row))?;
                }
                table.rows = rows;
                affected(matching.len(), None)
            }
        })
    }
}

/// A parsed condition with its column resolved and its value bound.
struct Filter {
    negate: bool,
    column: usize,
    comparison: Option<(Comparison, Value)>,
}

impl Filter {
    fn new(
        table: &Table,
        name: &str,
        condition: &Condition,
        bound: &impl Fn(&Operand) -> Result<Value>,
    ) -> Result<Self> {
        Ok(Self {
            negate: condition.negate,
            column: table.column_index(name, &condition.column)?,
            comparison: condition
                .comparison
                .as_ref()
                .map(|(c, operand)| bound(operand).map(|v| (*c, v)))
                .transpose()?,
        })
    }

    /// SQL three valued logic: unknown results never match, negated or not.
    fn matches(&self, row: &[Value]) -> bool {
        let value = &row[self.column];
        let result = match &self.comparison {
            None => truth(value),
            Some((comparison, other)) => match comparison {
                Comparison::And => match (truth(value), truth(other)) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                },
                Comparison::Or => match (truth(value), truth(other)) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                },
                comparison => value.partial_cmp(other).map(|ordering| match comparison {
                    Comparison::Equal => ordering == Ordering::Equal,
                    Comparison::NotEqual => ordering != Ordering::Equal,
                    Comparison::Less => ordering == Ordering::Less,
                    Comparison::LessEqual => ordering != Ordering::Greater,
                    Comparison::Greater => ordering == Ordering::Greater,
                    Comparison::GreaterEqual => ordering != Ordering::Less,
                    Comparison::And | Comparison::Or => false,
                }),
            },
        };
        result.map(|v| v != self.negate).unwrap_or(false)
    }
}

fn truth(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(v) => *v,
        v => v.as_i64().map(|v| v != 0),
    }
}

fn compare_nulls_first(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn run(database: &mut Database, sql: &str, params: &[(&str, Value)]) -> Result<Outcome> {
        let params: Vec<_> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        database.run(parse(sql)?, &params)
    }

    fn rows(outcome: Outcome) -> Vec<Vec<Value>> {
        match outcome {
            Outcome::Rows { rows, .. } => rows,
            Outcome::Affected(..) => panic!("Expected rows"),
        }
    }

    fn setup() -> Database {
        let mut database = Database::default();
        run(
            &mut database,
            "CREATE TABLE item( item_id INT NOT NULL AUTO_INCREMENT, code VARCHAR(4) NOT NULL UNIQUE, score INT , PRIMARY KEY (item_id));",
            &[],
        )
        .unwrap();
        database
    }

    #[test]
    fn auto_increment_and_first_id() {
        let mut database = setup();
        let outcome = run(
            &mut database,
            "INSERT INTO item (code, score) VALUES(@code0, @score0), (@code1, @score1);",
            &[
                ("code0", Value::from("a")),
                ("score0", Value::Int64(Some(2))),
                ("code1", Value::from("b")),
                ("score1", Value::Null),
            ],
        )
        .unwrap();
        let Outcome::Affected(affected) = outcome else {
            panic!("Expected an insert outcome");
        };
        assert_eq!(affected.rows_affected, 2);
        assert_eq!(affected.last_insert_id, Some(1));
        let rows = rows(run(&mut database, "SELECT * FROM item;", &[]).unwrap());
        assert_eq!(rows[1][0], Value::Int32(Some(2)));
        assert_eq!(rows[0][2], Value::Int32(Some(2)));
    }

    #[test]
    fn constraints_are_atomic() {
        let mut database = setup();
        let result = run(
            &mut database,
            "INSERT INTO item (code, score) VALUES(@code0, @score0), (@code1, @score1);",
            &[
                ("code0", Value::from("a")),
                ("score0", Value::Null),
                ("code1", Value::from("a")),
                ("score1", Value::Null),
            ],
        );
        assert!(result.is_err());
        assert!(rows(run(&mut database, "SELECT * FROM item;", &[]).unwrap()).is_empty());
        let too_long = run(
            &mut database,
            "INSERT INTO item (code, score) VALUES(@code, @score);",
            &[("code", Value::from("abcde")), ("score", Value::Null)],
        );
        assert!(too_long.is_err());
        let null = run(
            &mut database,
            "INSERT INTO item (code, score) VALUES(@code, @score);",
            &[("code", Value::Varchar(None)), ("score", Value::Null)],
        );
        assert!(null.is_err());
    }

    #[test]
    fn select_filters_orders_and_limits() {
        let mut database = setup();
        for (code, score) in [("a", Some(3)), ("b", None), ("c", Some(1)), ("d", Some(2))] {
            run(
                &mut database,
                "INSERT INTO item (code, score) VALUES(@code, @score);",
                &[("code", Value::from(code)), ("score", Value::Int32(score))],
            )
            .unwrap();
        }
        let codes = |rows: Vec<Vec<Value>>| -> Vec<Value> {
            rows.into_iter().map(|mut r| r.swap_remove(1)).collect()
        };
        let ascending = rows(run(&mut database, "SELECT * FROM item ORDER BY item.score ASC;", &[]).unwrap());
        assert_eq!(
            codes(ascending),
            ["b", "c", "d", "a"].map(Value::from).to_vec()
        );
        let filtered = rows(
            run(
                &mut database,
                "SELECT * FROM item WHERE item.score >= @score ORDER BY item.score DESC LIMIT 1;",
                &[("score", Value::Int64(Some(2)))],
            )
            .unwrap(),
        );
        assert_eq!(codes(filtered), vec![Value::from("a")]);
        // Neither side of a negated comparison on NULL matches.
        let negated = rows(
            run(
                &mut database,
                "SELECT * FROM item WHERE NOT item.score = @score;",
                &[("score", Value::Int64(Some(1)))],
            )
            .unwrap(),
        );
        assert_eq!(negated.len(), 2);
    }

    #[test]
    fn update_and_drop() {
        let mut database = setup();
        run(
            &mut database,
            "INSERT INTO item (code, score) VALUES(@code0, @score0), (@code1, @score1);",
            &[
                ("code0", Value::from("a")),
                ("score0", Value::Null),
                ("code1", Value::from("b")),
                ("score1", Value::Null),
            ],
        )
        .unwrap();
        let clash = run(
            &mut database,
            "UPDATE item SET code = @code WHERE item.item_id = @item_id;",
            &[("code", Value::from("a")), ("item_id", Value::Int64(Some(2)))],
        );
        assert!(clash.is_err());
        let Outcome::Affected(affected) = run(
            &mut database,
            "UPDATE item SET score = @score WHERE item.item_id = @item_id;",
            &[("score", Value::Int64(Some(9))), ("item_id", Value::Int64(Some(2)))],
        )
        .unwrap() else {
            panic!("Expected an update outcome");
        };
        assert_eq!(affected.rows_affected, 1);
        run(&mut database, "DROP TABLE IF EXISTS item;", &[]).unwrap();
        run(&mut database, "DROP TABLE IF EXISTS item;", &[]).unwrap();
        assert!(run(&mut database, "SELECT * FROM item;", &[]).is_err());
    }
}
