//! Domain logic for the series catalog.
//!
//! Everything in this crate is pure: no I/O, no database access. The
//! `shelf-db` crate feeds user input through these helpers before it
//! builds and executes a query.

pub mod error;
pub mod filter;
pub mod pagination;
pub mod projection;
pub mod sort;
pub mod types;
