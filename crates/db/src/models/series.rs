//! Series entity model and DTOs.

use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use shelf_core::projection::{FieldTable, Projectable};
use shelf_core::types::DbId;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::status::Status;

/// A row from the `series_tags` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SeriesTag {
    pub id: DbId,
    pub series_id: DbId,
    pub name: String,
}

/// A row from the `series_aliases` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SeriesAlias {
    pub id: DbId,
    pub series_id: DbId,
    pub alias: String,
}

/// A series with its status, tags and aliases attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub type_name: String,
    pub type_demonym: String,
    /// `None` when `status_id` is NULL.
    pub status: Option<Status>,
    pub tags: Vec<SeriesTag>,
    pub aliases: Vec<SeriesAlias>,
}

/// Flat row produced by [`crate::store::SERIES_SELECT`].
///
/// The status comes from a LEFT JOIN; tags and aliases are aggregated into
/// JSONB arrays by correlated subqueries.
#[derive(Debug, FromRow)]
pub(crate) struct SeriesRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub type_name: String,
    pub type_demonym: String,
    pub status_id: Option<DbId>,
    pub status_name: Option<String>,
    pub tags: Json<Vec<SeriesTag>>,
    pub aliases: Json<Vec<SeriesAlias>>,
}

impl From<SeriesRow> for Series {
    fn from(row: SeriesRow) -> Self {
        let status = match (row.status_id, row.status_name) {
            (Some(id), Some(name)) => Some(Status { id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            cover_image: row.cover_image,
            type_name: row.type_name,
            type_demonym: row.type_demonym,
            status,
            tags: row.tags.0,
            aliases: row.aliases.0,
        }
    }
}

static SERIES_FIELDS: LazyLock<FieldTable<Series>> = LazyLock::new(|| {
    FieldTable::<Series>::new(
        "Series",
        &[
            ("id", |s: &Series| json!(s.id)),
            ("name", |s: &Series| json!(s.name)),
            ("description", |s: &Series| json!(s.description)),
            ("cover_image", |s: &Series| json!(s.cover_image)),
            ("type_name", |s: &Series| json!(s.type_name)),
            ("type_demonym", |s: &Series| json!(s.type_demonym)),
            ("status", |s: &Series| json!(s.status)),
            ("tags", |s: &Series| json!(s.tags)),
            ("aliases", |s: &Series| json!(s.aliases)),
        ],
    )
});

impl Projectable for Series {
    fn field_table() -> &'static FieldTable<Self> {
        &SERIES_FIELDS
    }
}

/// DTO for creating a new series.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeries {
    pub name: String,
    /// Empty string if omitted; likewise for the other text columns.
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub type_name: Option<String>,
    pub type_demonym: Option<String>,
    pub status_id: Option<DbId>,
}

/// DTO for updating an existing series. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSeries {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub type_name: Option<String>,
    pub type_demonym: Option<String>,
    /// Absent keeps the current status; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub status_id: Option<Option<DbId>>,
}

/// Marks a present key as `Some`, so an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
