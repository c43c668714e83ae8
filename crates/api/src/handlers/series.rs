//! Handlers for the `/series` resource.
//!
//! The list endpoint supports filtering, multi-key sorting, pagination and
//! field projection; see [`crate::query::SeriesListParams`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shelf_core::error::CoreError;
use shelf_core::projection::Record;
use shelf_core::types::DbId;
use shelf_db::models::series::{CreateSeries, Series, UpdateSeries};
use shelf_db::repositories::SeriesRepo;

use crate::error::{AppError, AppResult};
use crate::query::SeriesListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/series
///
/// Returns full entities when `fields` is absent, otherwise one object per
/// series holding only the requested keys.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SeriesListParams>,
) -> AppResult<Json<DataResponse<Vec<Record<Series>>>>> {
    let params = params.into_query_params(&state.config)?;
    let records = SeriesRepo::query(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/series/all
///
/// Every series as a full entity, ordered by id, without paging.
pub async fn list_all(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Series>>>> {
    let series = SeriesRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: series }))
}

/// POST /api/v1/series
///
/// Names are unique in practice but not by constraint, so the check is
/// made here and reported as a conflict.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSeries>,
) -> AppResult<(StatusCode, Json<DataResponse<Series>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    if SeriesRepo::name_exists(&state.pool, &input.name).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "series '{}' already exists",
            input.name
        ))));
    }
    let series = SeriesRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: series })))
}

/// GET /api/v1/series/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Series>>> {
    let series = SeriesRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Series",
            id,
        }))?;
    Ok(Json(DataResponse { data: series }))
}

/// GET /api/v1/series/by-name/{name}
///
/// Case-insensitive substring match; the lowest id wins.
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<Series>>> {
    let series = SeriesRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(DataResponse { data: series }))
}

/// PUT /api/v1/series/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSeries>,
) -> AppResult<Json<DataResponse<Series>>> {
    let series = SeriesRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Series",
            id,
        }))?;
    Ok(Json(DataResponse { data: series }))
}

/// DELETE /api/v1/series/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SeriesRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Series",
            id,
        }))
    }
}
