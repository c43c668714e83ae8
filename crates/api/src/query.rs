//! Query string types for the series list endpoint.
//!
//! The list endpoint takes comma-separated lists in single parameters
//! (`?fields=id,name&sortby=name,id&order=asc,desc`) and a compact filter
//! syntax (`?query=status.name:ongoing,type_name:Manga`). This module turns
//! those strings into [`SeriesQueryParams`] for the repository.

use std::collections::HashMap;

use serde::Deserialize;
use shelf_core::pagination::clamp_limit;
use shelf_db::repositories::SeriesQueryParams;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Raw query parameters for `GET /api/v1/series`.
#[derive(Debug, Default, Deserialize)]
pub struct SeriesListParams {
    /// Filters as `key:value` pairs separated by commas.
    pub query: Option<String>,
    pub fields: Option<String>,
    pub sortby: Option<String>,
    pub order: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl SeriesListParams {
    /// Convert to repository input.
    ///
    /// `limit` falls back to the configured default and is capped at the
    /// configured maximum. `offset` is passed through as given so that a
    /// negative value is rejected by the repository instead of hidden.
    pub fn into_query_params(self, config: &ServerConfig) -> Result<SeriesQueryParams, AppError> {
        let filters = match self.query.as_deref() {
            Some(raw) => parse_filter_query(raw)?,
            None => HashMap::new(),
        };

        let limit = match self.limit {
            Some(limit) if limit < 0 => limit,
            other => clamp_limit(other, config.default_page_limit, config.max_page_limit),
        };

        Ok(SeriesQueryParams {
            filters,
            fields: split_list(self.fields.as_deref()),
            sortby: split_list(self.sortby.as_deref()),
            order: split_list(self.order.as_deref()),
            offset: self.offset.unwrap_or(0),
            limit,
        })
    }
}

/// Parse `k:v,k:v` into a filter map.
///
/// Only the first `:` separates key from value, so values may contain
/// colons. Empty entries (from a trailing comma) are skipped. A later entry
/// for the same key replaces an earlier one.
pub fn parse_filter_query(raw: &str) -> Result<HashMap<String, String>, AppError> {
    let mut filters = HashMap::new();
    for entry in raw.split(',') {
        if entry.is_empty() {
            continue;
        }
        let Some((key, value)) = entry.split_once(':') else {
            return Err(AppError::BadRequest(format!(
                "invalid query key/value pair: '{entry}'"
            )));
        };
        if key.is_empty() {
            return Err(AppError::BadRequest(format!(
                "invalid query key/value pair: '{entry}'"
            )));
        }
        filters.insert(key.to_string(), value.to_string());
    }
    Ok(filters)
}

/// Split a comma-separated parameter, dropping blank items.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
