//! The storage seam for series list queries.
//!
//! [`SeriesQuery`] is the validated, store-agnostic shape of one list
//! request: normalized filter predicates, a sort plan, and a page window.
//! [`SeriesStore`] executes it. The PostgreSQL implementation resolves every
//! storage path against a fixed column map before any SQL is generated, so
//! caller-supplied names never reach the statement text.

use async_trait::async_trait;
use shelf_core::filter::{
    normalize_path, parse_null_flag, FilterPredicate, FilterValue, ISNULL_LOOKUP,
    RELATION_SEPARATOR,
};
use shelf_core::sort::SortKey;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::series::{Series, SeriesRow};

/// Select list shared by every series read. Joins the status and aggregates
/// tags and aliases so a single statement returns complete entities.
pub(crate) const SERIES_SELECT: &str = "\
    SELECT s.id, s.name, s.description, s.cover_image, s.type_name, s.type_demonym, \
           s.status_id, st.name AS status_name, \
           COALESCE((SELECT jsonb_agg(jsonb_build_object( \
                        'id', t.id, 'series_id', t.series_id, 'name', t.name) ORDER BY t.id) \
                     FROM series_tags t WHERE t.series_id = s.id), '[]'::jsonb) AS tags, \
           COALESCE((SELECT jsonb_agg(jsonb_build_object( \
                        'id', a.id, 'series_id', a.series_id, 'alias', a.alias) ORDER BY a.id) \
                     FROM series_aliases a WHERE a.series_id = s.id), '[]'::jsonb) AS aliases \
    FROM series s \
    LEFT JOIN statuses st ON st.id = s.status_id";

/// One validated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    /// AND-ed together.
    pub filters: Vec<FilterPredicate>,
    /// Empty means no ORDER BY.
    pub sort: Vec<SortKey>,
    pub offset: i64,
    pub limit: i64,
}

/// Failures raised by a store while executing a [`SeriesQuery`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filter or sort path that does not name a known column.
    #[error("unknown field path '{0}'")]
    UnknownField(String),

    /// A filter value that cannot be compared against its column.
    #[error("invalid value '{value}' for field '{path}'")]
    InvalidValue { path: String, value: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Executes series list queries.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Run `query`, returning full entities with relations attached.
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<Vec<Series>, StoreError>;
}

#[async_trait]
impl SeriesStore for PgPool {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<Vec<Series>, StoreError> {
        let mut builder = build_select(query)?;
        let rows = builder
            .build_query_as::<SeriesRow>()
            .fetch_all(self)
            .await?;
        Ok(rows.into_iter().map(Series::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Column {
    expr: &'static str,
    kind: ColumnKind,
}

/// Map a storage path (without lookup suffix) to its SQL column.
fn resolve_column(path: &str) -> Option<Column> {
    let (expr, kind) = match path {
        "id" => ("s.id", ColumnKind::Int),
        "name" => ("s.name", ColumnKind::Text),
        "description" => ("s.description", ColumnKind::Text),
        "cover_image" => ("s.cover_image", ColumnKind::Text),
        "type_name" => ("s.type_name", ColumnKind::Text),
        "type_demonym" => ("s.type_demonym", ColumnKind::Text),
        "status" | "status__id" => ("s.status_id", ColumnKind::Int),
        "status__name" => ("st.name", ColumnKind::Text),
        _ => return None,
    };
    Some(Column { expr, kind })
}

/// Comparison requested by the trailing segment of a filter path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    IsNull,
}

impl Lookup {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "exact" => Some(Self::Exact),
            "iexact" => Some(Self::IExact),
            "contains" => Some(Self::Contains),
            "icontains" => Some(Self::IContains),
            ISNULL_LOOKUP => Some(Self::IsNull),
            _ => None,
        }
    }
}

/// Split `status__name__icontains` into (`status__name`, `IContains`).
///
/// A path whose last segment is not a known lookup is an exact match on the
/// whole path.
fn split_lookup(path: &str) -> (&str, Lookup) {
    if let Some((field, suffix)) = path.rsplit_once(RELATION_SEPARATOR) {
        if let Some(lookup) = Lookup::from_suffix(suffix) {
            return (field, lookup);
        }
    }
    (path, Lookup::Exact)
}

// ---------------------------------------------------------------------------
// SQL generation
// ---------------------------------------------------------------------------

/// Build the full SELECT for `query`: filters, ordering, then the page window.
pub(crate) fn build_select(
    query: &SeriesQuery,
) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let mut builder = QueryBuilder::new(SERIES_SELECT);

    for (i, predicate) in query.filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(&mut builder, predicate)?;
    }

    for (i, key) in query.sort.iter().enumerate() {
        let path = normalize_path(&key.field);
        let column = resolve_column(&path).ok_or(StoreError::UnknownField(path))?;
        builder.push(if i == 0 { " ORDER BY " } else { ", " });
        builder.push(column.expr);
        builder.push(" ");
        builder.push(key.direction.as_sql());
    }

    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset);

    Ok(builder)
}

fn push_predicate(
    builder: &mut QueryBuilder<'static, Postgres>,
    predicate: &FilterPredicate,
) -> Result<(), StoreError> {
    let (field, lookup) = split_lookup(&predicate.path);
    let column =
        resolve_column(field).ok_or_else(|| StoreError::UnknownField(predicate.path.clone()))?;

    match (lookup, &predicate.value) {
        (Lookup::IsNull, value) => {
            let is_null = match value {
                FilterValue::Bool(flag) => *flag,
                FilterValue::Text(raw) => parse_null_flag(raw),
            };
            builder.push(column.expr);
            builder.push(if is_null { " IS NULL" } else { " IS NOT NULL" });
        }
        (_, FilterValue::Bool(flag)) => {
            builder.push(column.expr);
            builder.push(" = ");
            builder.push_bind(*flag);
        }
        (Lookup::Exact, FilterValue::Text(text)) => match column.kind {
            ColumnKind::Int => {
                let value: i64 = text.parse().map_err(|_| StoreError::InvalidValue {
                    path: predicate.path.clone(),
                    value: text.clone(),
                })?;
                builder.push(column.expr);
                builder.push(" = ");
                builder.push_bind(value);
            }
            ColumnKind::Text => {
                builder.push(column.expr);
                builder.push(" = ");
                builder.push_bind(text.clone());
            }
        },
        (Lookup::IExact, FilterValue::Text(text)) => {
            builder.push(format!("LOWER({}::text) = LOWER(", column.expr));
            builder.push_bind(text.clone());
            builder.push(")");
        }
        (Lookup::Contains, FilterValue::Text(text)) => {
            builder.push(format!("strpos({}::text, ", column.expr));
            builder.push_bind(text.clone());
            builder.push(") > 0");
        }
        (Lookup::IContains, FilterValue::Text(text)) => {
            builder.push(format!("strpos(LOWER({}::text), LOWER(", column.expr));
            builder.push_bind(text.clone());
            builder.push(")) > 0");
        }
    }
    Ok(())
}
