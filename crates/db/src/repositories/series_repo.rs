//! Repository for the `series` table.

use std::collections::HashMap;

use shelf_core::filter::normalize_filters;
use shelf_core::pagination::{validate_page, PageError};
use shelf_core::projection::{reduce, FieldAccessError, Projectable, Record};
use shelf_core::sort::{build_sort_plan, signed_fields, SortPlanError};
use shelf_core::types::DbId;
use sqlx::PgPool;

use crate::models::series::{CreateSeries, Series, SeriesRow, UpdateSeries};
use crate::store::{SeriesQuery, SeriesStore, StoreError, SERIES_SELECT};

/// Caller input for [`SeriesRepo::query`].
#[derive(Debug, Clone, Default)]
pub struct SeriesQueryParams {
    /// Field path (dotted) to value. All entries must match.
    pub filters: HashMap<String, String>,
    /// Fields to keep in each result. Empty returns full entities.
    pub fields: Vec<String>,
    pub sortby: Vec<String>,
    /// `asc` / `desc`, reconciled against `sortby`.
    pub order: Vec<String>,
    pub offset: i64,
    pub limit: i64,
}

/// Failures of a series list query. Nothing is returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Sort(#[from] SortPlanError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    FieldAccess(#[from] FieldAccessError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Provides CRUD operations for series plus the dynamic list query.
pub struct SeriesRepo;

impl SeriesRepo {
    /// Run a filtered, sorted, paginated list query and project the results.
    ///
    /// Input is validated in full (sort plan, page window, field names)
    /// before the store is called, so a bad request never reaches the
    /// database.
    pub async fn query<S>(
        store: &S,
        params: &SeriesQueryParams,
    ) -> Result<Vec<Record<Series>>, QueryError>
    where
        S: SeriesStore + ?Sized,
    {
        let filters = normalize_filters(&params.filters);
        let sort = build_sort_plan(&params.sortby, &params.order)?;
        validate_page(params.offset, params.limit)?;
        Series::field_table().validate(&params.fields)?;

        let query = SeriesQuery {
            filters,
            sort,
            offset: params.offset,
            limit: params.limit,
        };
        tracing::debug!(
            filters = query.filters.len(),
            sort = ?signed_fields(&query.sort),
            offset = query.offset,
            limit = query.limit,
            fields = ?params.fields,
            "Querying series",
        );

        let series = store.fetch_series(&query).await?;
        Ok(reduce(series, &params.fields)?)
    }

    /// Insert a new series, returning the created row with relations.
    pub async fn create(pool: &PgPool, input: &CreateSeries) -> Result<Series, sqlx::Error> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO series (name, description, cover_image, type_name, type_demonym, status_id)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, ''), $6)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.cover_image)
        .bind(&input.type_name)
        .bind(&input.type_demonym)
        .bind(input.status_id)
        .fetch_one(pool)
        .await?;

        tracing::info!(series_id = id, name = %input.name, "Series created");

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// List every series, ordered by id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Series>, sqlx::Error> {
        let query = format!("{SERIES_SELECT} ORDER BY s.id");
        let rows = sqlx::query_as::<_, SeriesRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Series::from).collect())
    }

    /// Check whether a series with exactly this name exists.
    pub async fn name_exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM series WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find the first series (by id) whose name contains `name`, ignoring case.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Series>, sqlx::Error> {
        let query = format!(
            "{SERIES_SELECT}
             WHERE strpos(LOWER(s.name), LOWER($1)) > 0
             ORDER BY s.id
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, SeriesRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Series::from))
    }

    /// Find a series by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Series>, sqlx::Error> {
        let query = format!("{SERIES_SELECT} WHERE s.id = $1");
        let row = sqlx::query_as::<_, SeriesRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Series::from))
    }

    /// Update a series. Only non-`None` fields in `input` are applied.
    ///
    /// `status_id` uses `Option<Option<DbId>>` so the status can be cleared.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSeries,
    ) -> Result<Option<Series>, sqlx::Error> {
        if !Self::exists(pool, id).await? {
            return Ok(None);
        }

        // Outer `Some` means the caller sent the key; the inner value may be
        // `None` to clear the status.
        let status_provided = input.status_id.is_some();
        let status_value = input.status_id.flatten();

        let result = sqlx::query(
            "UPDATE series SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                cover_image = COALESCE($4, cover_image),
                type_name = COALESCE($5, type_name),
                type_demonym = COALESCE($6, type_demonym),
                status_id = CASE WHEN $7 THEN $8 ELSE status_id END
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.cover_image)
        .bind(&input.type_name)
        .bind(&input.type_demonym)
        .bind(status_provided)
        .bind(status_value)
        .execute(pool)
        .await?;

        tracing::info!(
            series_id = id,
            rows_affected = result.rows_affected(),
            "Series updated"
        );

        Self::find_by_id(pool, id).await
    }

    /// Delete a series by ID. Returns `true` if a row was removed.
    ///
    /// Tags and aliases are removed with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        if !Self::exists(pool, id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM series WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        tracing::info!(
            series_id = id,
            rows_affected = result.rows_affected(),
            "Series deleted"
        );

        Ok(result.rows_affected() > 0)
    }

    async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM series WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
