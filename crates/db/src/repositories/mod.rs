//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. List queries go through a
//! [`crate::store::SeriesStore`] instead so they can run against any store.

pub mod series_repo;

pub use series_repo::{QueryError, SeriesQueryParams, SeriesRepo};
