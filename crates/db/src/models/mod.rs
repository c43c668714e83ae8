//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct (plus a crate-private `FromRow` row struct
//!   where the entity nests related rows)
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod series;
pub mod status;
