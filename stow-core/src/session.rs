use crate::{
    Connection, Cursor, DbConfig, Driver, Entity, EntityDescriptor, Error, Filter,
    Order, OrderBy, Predicate, Result, RowsAffected, SelectOptions, SqlWriter, Statement, Value,
    translate,
};

/// Rows written by one bulk insert statement.
pub const BATCH_SIZE: usize = 100;

/// Persistence session owning one driver connection.
///
/// Every operation resolves the entity metadata first, so annotation problems
/// surface before anything is sent to the database.
pub struct Session<C: Connection> {
    connection: C,
    config: DbConfig,
}

impl<C: Connection> Session<C> {
    /// Connects through `driver` and wraps the new connection.
    pub fn connect<D>(driver: &D, config: DbConfig) -> Result<Self>
    where
        D: Driver<Connection = C>,
    {
        log::info!("Connecting to {} ({})", D::NAME, config);
        let connection = driver.connect(&config).map_err(|e| {
            log::error!("{:#}\nWhile connecting to {}", e, D::NAME);
            Error::Driver(e)
        })?;
        Ok(Self::new(connection, config))
    }

    pub fn new(connection: C, config: DbConfig) -> Self {
        Self { connection, config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    fn writer(&self) -> <C::Driver as Driver>::SqlWriter {
        self.connection.driver().sql_writer()
    }

    /// Entity with the given primary key.
    pub fn get<E: Entity>(&mut self, id: i64) -> Result<Option<E>> {
        let descriptor = E::descriptor()?;
        let statement =
            self.writer()
                .write_select(descriptor, &Filter::PrimaryKey(id), Default::default())?;
        Ok(self.fetch(descriptor, &statement)?.into_iter().next())
    }

    /// First entity matching `predicate`.
    pub fn get_by<E: Entity>(&mut self, predicate: impl Into<Predicate<E>>) -> Result<Option<E>> {
        let descriptor = E::descriptor()?;
        let condition = translate(descriptor, &predicate.into().expression)?;
        let statement = self.writer().write_select(
            descriptor,
            &Filter::Condition(&condition),
            SelectOptions {
                order: OrderBy::Unordered,
                limit: Some(1),
            },
        )?;
        Ok(self.fetch(descriptor, &statement)?.into_iter().next())
    }

    /// Every entity matching `predicate`.
    pub fn get_all_by<E: Entity>(&mut self, predicate: impl Into<Predicate<E>>) -> Result<Vec<E>> {
        let descriptor = E::descriptor()?;
        let condition = translate(descriptor, &predicate.into().expression)?;
        let statement = self.writer().write_select(
            descriptor,
            &Filter::Condition(&condition),
            Default::default(),
        )?;
        self.fetch(descriptor, &statement)
    }

    /// Every `E` row referencing `parent`: the column of `E` named after the
    /// primary key column of `P` equals the key of `parent`.
    ///
    /// Only a `NULL` key is reported as [`Error::MissingKey`]. A parent that
    /// was never inserted usually carries the key `0`, which is treated as
    /// assigned and selects nothing.
    pub fn get_all_by_parent<E: Entity, P: Entity>(
        &mut self,
        parent: &P,
        order: bool,
        limit: Option<u32>,
    ) -> Result<Vec<E>> {
        let descriptor = E::descriptor()?;
        let parent_descriptor = P::descriptor()?;
        let key = parent_descriptor.primary_key_field();
        let value = parent
            .values()
            .into_iter()
            .nth(key.index)
            .unwrap_or_default();
        let statement = self.writer().write_select(
            descriptor,
            &Filter::Parent {
                column: parent_descriptor.primary_key_column,
                value,
            },
            SelectOptions {
                order: if order {
                    OrderBy::Declared
                } else {
                    OrderBy::Unordered
                },
                limit,
            },
        )?;
        self.fetch(descriptor, &statement)
    }

    /// Every entity of the table, optionally sorted by the ordering hint.
    pub fn get_all<E: Entity>(&mut self, order: bool, limit: Option<u32>) -> Result<Vec<E>> {
        let descriptor = E::descriptor()?;
        let statement = self.writer().write_select(
            descriptor,
            &Filter::All,
            SelectOptions {
                order: if order {
                    OrderBy::Declared
                } else {
                    OrderBy::Unordered
                },
                limit,
            },
        )?;
        self.fetch(descriptor, &statement)
    }

    /// Inserts `entity`, applying the duplicate avoidance policy of types
    /// declaring a dedup key.
    ///
    /// When the two most recent rows sharing the dedup key all equal `entity`
    /// on every dedup field, no row is inserted: the most recent row takes the
    /// ordering hint value of `entity`, is updated, and replaces `entity`.
    /// Otherwise `entity` is inserted and receives the generated key.
    pub fn insert<E: Entity>(&mut self, entity: &mut E) -> Result<RowsAffected> {
        let descriptor = E::descriptor()?;
        let values = entity.values();
        if let Some(key) = descriptor.dedup_key_field() {
            let Some(ordering) = descriptor.ordering_field() else {
                return Err(Error::Configuration(format!(
                    "entity `{}` declares the dedup key `{}` but no ordering hint field to find the most recent row",
                    descriptor.type_name, key.name
                )));
            };
            let statement = self.writer().write_select(
                descriptor,
                &Filter::Column {
                    column: key.column,
                    value: values[key.index].clone(),
                },
                SelectOptions {
                    order: OrderBy::Forced(Order::Desc),
                    limit: Some(2),
                },
            )?;
            let rows = self.fetch::<E>(descriptor, &statement)?;
            let duplicate = !rows.is_empty()
                && rows.iter().all(|row| {
                    let stored = row.values();
                    descriptor
                        .dedup_fields()
                        .all(|f| stored[f.index] == values[f.index])
                });
            if let Some(mut latest) = rows.into_iter().next().filter(|_| duplicate) {
                log::debug!(
                    "`{}` duplicates the most recent row with the same `{}`, updating `{}` instead of inserting",
                    descriptor.type_name,
                    key.column,
                    ordering.column
                );
                latest.set_value(ordering.index, values[ordering.index].clone())?;
                let result = self.update(&latest)?;
                *entity = latest;
                return Ok(result);
            }
        }
        let statement = self.writer().write_insert(descriptor, &values)?;
        let result = self.execute(&statement)?;
        if let Some(id) = result.last_insert_id {
            entity.set_value(descriptor.primary_key_field().index, Value::Int64(Some(id)))?;
        }
        log::trace!(
            "Inserted `{}` with id {:?}",
            descriptor.type_name,
            result.last_insert_id
        );
        Ok(result)
    }

    /// Inserts every entity with one statement per batch of [`BATCH_SIZE`]
    /// rows. Types with dedup fields are rejected, the bulk path does not
    /// check for duplicates. Generated keys are not read back.
    pub fn insert_all<'a, E, It>(&mut self, entities: It) -> Result<RowsAffected>
    where
        E: Entity,
        It: IntoIterator<Item = &'a E>,
    {
        let descriptor = E::descriptor()?;
        if descriptor.dedup_fields().next().is_some() {
            return Err(Error::UnsupportedOperation(format!(
                "bulk insert of `{}` is not supported, the type declares dedup fields",
                descriptor.type_name
            )));
        }
        let writer = self.writer();
        let mut result = RowsAffected::default();
        let mut batch = Vec::with_capacity(BATCH_SIZE);
        let mut entities = entities.into_iter().peekable();
        while entities.peek().is_some() {
            batch.clear();
            batch.extend(entities.by_ref().take(BATCH_SIZE).map(E::values));
            let statement = writer.write_bulk_insert(descriptor, &batch)?;
            result.extend([self.execute(&statement)?]);
            log::trace!(
                "{} `{}` rows inserted",
                batch.len(),
                descriptor.type_name
            );
        }
        Ok(result)
    }

    /// Writes every non key field of `entity` to its row.
    ///
    /// The key `0` of an entity never inserted counts as assigned, the update
    /// then matches no row and reports zero affected rows. Only a `NULL` key
    /// is rejected with [`Error::MissingKey`].
    pub fn update<E: Entity>(&mut self, entity: &E) -> Result<RowsAffected> {
        let descriptor = E::descriptor()?;
        let statement = self.writer().write_update(descriptor, &entity.values())?;
        self.execute(&statement)
    }

    /// Drops the table of `E`, refused in safe mode.
    pub fn drop_table<E: Entity>(&mut self) -> Result<RowsAffected> {
        let descriptor = E::descriptor()?;
        if self.config.safe_mode {
            log::warn!(
                "Unable to drop table `{}`, DROP TABLE is not allowed in safe mode",
                descriptor.table_name
            );
            return Err(Error::SafeMode(format!(
                "drop table `{}`",
                descriptor.table_name
            )));
        }
        log::warn!("Dropping table `{}`", descriptor.table_name);
        let statement = self.writer().write_drop_table(descriptor);
        self.execute(&statement)
    }

    /// Creates the table of `E`, dropping it first when `drop_first` is set.
    pub fn create_table<E: Entity>(&mut self, drop_first: bool) -> Result<RowsAffected> {
        let descriptor = E::descriptor()?;
        let statement = self.writer().write_create_table(descriptor)?;
        if drop_first {
            self.drop_table::<E>()?;
        }
        let result = self.execute(&statement)?;
        log::info!("Created table `{}`", descriptor.table_name);
        Ok(result)
    }

    fn execute(&mut self, statement: &Statement) -> Result<RowsAffected> {
        self.connection
            .execute(statement)
            .map_err(|e| driver_error(e, statement))
    }

    fn fetch<E: Entity>(
        &mut self,
        descriptor: &EntityDescriptor,
        statement: &Statement,
    ) -> Result<Vec<E>> {
        let mut cursor = self
            .connection
            .query(statement)
            .map_err(|e| driver_error(e, statement))?;
        let mut result = Vec::new();
        while cursor.next().map_err(|e| driver_error(e, statement))? {
            result.push(hydrate(descriptor, &cursor).map_err(|e| match e {
                Error::Driver(e) => driver_error(e, statement),
                e => e,
            })?);
        }
        cursor.close().map_err(|e| driver_error(e, statement))?;
        Ok(result)
    }
}

/// Builds an entity from the current row. `NULL` columns leave the field at
/// its default value.
fn hydrate<E: Entity>(descriptor: &EntityDescriptor, cursor: &impl Cursor) -> Result<E> {
    let mut entity = E::default();
    for field in descriptor.fields.iter() {
        if cursor.is_null(field.column)? {
            continue;
        }
        entity.set_value(field.index, cursor.column_value(field.column)?)?;
    }
    Ok(entity)
}

fn driver_error(error: anyhow::Error, statement: &Statement) -> Error {
    log::error!("{:#}\nWhile running the statement:\n{}", error, statement);
    Error::Driver(error)
}
