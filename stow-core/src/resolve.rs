use crate::{
    DedupRole, Entity, EntityDescriptor, Error, FieldDeclaration, FieldDescriptor, Result,
    TableDeclaration, is_identifier,
};
use std::{
    any::{TypeId, type_name},
    collections::{HashMap, HashSet},
    sync::{LazyLock, PoisonError, RwLock},
};

static DESCRIPTORS: LazyLock<RwLock<HashMap<TypeId, &'static EntityDescriptor>>> =
    LazyLock::new(Default::default);

/// Resolves the metadata of `E`, validating its annotations the first time
/// and returning the cached descriptor afterwards.
///
/// Failed resolutions are not cached, every call reports the error again.
pub fn resolve<E: Entity>() -> Result<&'static EntityDescriptor> {
    let id = TypeId::of::<E>();
    if let Some(descriptor) = DESCRIPTORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied()
    {
        return Ok(descriptor);
    }
    let descriptor = describe(type_name::<E>(), E::table(), E::fields())?;
    let mut descriptors = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    Ok(*descriptors.entry(id).or_insert_with(|| {
        log::debug!(
            "Resolved `{}` to table `{}` with {} columns",
            descriptor.type_name,
            descriptor.table_name,
            descriptor.fields.len()
        );
        Box::leak(Box::new(descriptor))
    }))
}

/// Builds a descriptor out of raw declarations without caching it.
pub fn describe(
    type_name: &'static str,
    table: TableDeclaration,
    fields: &[FieldDeclaration],
) -> Result<EntityDescriptor> {
    let error = |message: String| Error::Configuration(format!("Entity `{type_name}`: {message}"));
    let Some(table_name) = table.name else {
        return Err(error("missing table annotation".into()));
    };
    if !is_identifier(table_name) {
        return Err(error(format!("table name `{table_name}` is not a valid identifier")));
    }
    let primary_keys: Vec<_> = fields.iter().filter(|f| f.primary_key).collect();
    let primary_key = match primary_keys.as_slice() {
        [pk] => *pk,
        [] => return Err(error("no field is marked as primary key".into())),
        _ => {
            return Err(error(format!(
                "exactly one primary key field is allowed, found {}",
                primary_keys.len()
            )));
        }
    };
    let primary_key_column: &'static str = match (primary_key.column, table.primary_key) {
        (Some(field), Some(table)) if field != table => {
            return Err(error(format!(
                "table primary key `{table}` differs from the column `{field}` of the primary key field `{}`",
                primary_key.name
            )));
        }
        (Some(column), _) | (None, Some(column)) => column,
        (None, None) => Box::leak(format!("{table_name}_id").into_boxed_str()),
    };
    if fields.len() < 2 {
        return Err(error("at least one column besides the primary key is required".into()));
    }

    let mut columns = HashSet::new();
    let mut ordering = None;
    let mut dedup_key = None;
    let mut has_dedup_fields = false;
    let mut result = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let column = if field.primary_key {
            primary_key_column
        } else {
            field.column.unwrap_or(field.name)
        };
        if !is_identifier(column) {
            return Err(error(format!(
                "column `{column}` of field `{}` is not a valid identifier",
                field.name
            )));
        }
        if !columns.insert(column) {
            return Err(error(format!("column `{column}` is declared more than once")));
        }
        match field.dedup {
            DedupRole::None => {}
            _ if field.primary_key => {
                return Err(error(format!(
                    "the primary key field `{}` cannot take part in deduplication",
                    field.name
                )));
            }
            DedupRole::Key if dedup_key.is_some() => {
                return Err(error("more than one dedup key field".into()));
            }
            DedupRole::Key => dedup_key = Some(index),
            DedupRole::Field => has_dedup_fields = true,
        }
        let hint = match field.order_by {
            Some(order) if ordering.is_none() => {
                ordering = Some(index);
                Some(order)
            }
            Some(..) => {
                log::debug!(
                    "Entity `{type_name}`: ignoring ordering hint on `{}`, only the first one is honoured",
                    field.name
                );
                None
            }
            None => None,
        };
        result.push(FieldDescriptor {
            index,
            name: field.name,
            column,
            value: field.value.as_null(),
            primary_key: field.primary_key,
            constraints: field.constraints,
            dedup: field.dedup,
            ordering: hint,
        });
    }
    if has_dedup_fields && dedup_key.is_none() {
        return Err(error("dedup fields are declared without a dedup key".into()));
    }
    Ok(EntityDescriptor {
        type_name,
        table_name,
        primary_key_column,
        fields: result.into_boxed_slice(),
        primary_key: fields.iter().position(|f| f.primary_key).unwrap_or_default(),
        ordering,
        dedup_key,
    })
}
