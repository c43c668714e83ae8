pub mod health;
pub mod series;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /series                    list (filter/sort/page/project), create
/// /series/all                every series, unpaged
/// /series/by-name/{name}     first case-insensitive name match
/// /series/{id}               get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/series", series::router())
}
