//! Field projection.
//!
//! Each projectable entity publishes a static table mapping public field
//! names to getter functions. A caller asking for a subset of fields gets one
//! sparse JSON object per entity; a caller asking for nothing gets the
//! entities themselves.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Reads one field of `T` as a JSON value.
pub type Getter<T> = fn(&T) -> Value;

/// A requested field name that the entity does not have.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{field}' on {entity}")]
pub struct FieldAccessError {
    pub entity: &'static str,
    pub field: String,
}

/// Name-to-getter table for one entity shape.
pub struct FieldTable<T> {
    entity: &'static str,
    names: Vec<&'static str>,
    getters: HashMap<&'static str, Getter<T>>,
}

impl<T> FieldTable<T> {
    /// Build a table from `(name, getter)` pairs. Declaration order is kept
    /// for [`FieldTable::names`].
    pub fn new(entity: &'static str, fields: &[(&'static str, Getter<T>)]) -> Self {
        Self {
            entity,
            names: fields.iter().map(|(name, _)| *name).collect(),
            getters: fields.iter().copied().collect(),
        }
    }

    /// Every projectable field name, in declaration order.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn getter(&self, name: &str) -> Result<Getter<T>, FieldAccessError> {
        self.getters
            .get(name)
            .copied()
            .ok_or_else(|| FieldAccessError {
                entity: self.entity,
                field: name.to_string(),
            })
    }

    /// Check every name in `fields`, failing on the first unknown one.
    pub fn validate<S: AsRef<str>>(&self, fields: &[S]) -> Result<(), FieldAccessError> {
        for field in fields {
            self.getter(field.as_ref())?;
        }
        Ok(())
    }

    /// Build a sparse object holding exactly the requested fields of `entity`.
    pub fn project<S: AsRef<str>>(
        &self,
        entity: &T,
        fields: &[S],
    ) -> Result<Map<String, Value>, FieldAccessError> {
        let mut record = Map::with_capacity(fields.len());
        for field in fields {
            let name = field.as_ref();
            let get = self.getter(name)?;
            record.insert(name.to_string(), get(entity));
        }
        Ok(record)
    }
}

/// An entity shape with a static field table.
pub trait Projectable: Sized + 'static {
    fn field_table() -> &'static FieldTable<Self>;
}

/// One row of a query result: either the whole entity or a sparse object.
///
/// Serializes untagged, so the JSON surface is the bare entity or the bare
/// sparse object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record<T> {
    Full(T),
    Sparse(Map<String, Value>),
}

impl<T> Record<T> {
    pub fn as_full(&self) -> Option<&T> {
        match self {
            Record::Full(entity) => Some(entity),
            Record::Sparse(_) => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&Map<String, Value>> {
        match self {
            Record::Full(_) => None,
            Record::Sparse(map) => Some(map),
        }
    }
}

/// Reduce query results to the requested fields.
///
/// An empty `fields` list returns every entity untouched. Otherwise all names
/// are checked before any row is built; an unknown name fails the whole call.
pub fn reduce<T: Projectable, S: AsRef<str>>(
    entities: Vec<T>,
    fields: &[S],
) -> Result<Vec<Record<T>>, FieldAccessError> {
    if fields.is_empty() {
        return Ok(entities.into_iter().map(Record::Full).collect());
    }

    let table = T::field_table();
    table.validate(fields)?;
    entities
        .iter()
        .map(|entity| table.project(entity, fields).map(Record::Sparse))
        .collect()
}
