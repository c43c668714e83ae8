//! Series publication status.

use serde::{Deserialize, Serialize};
use shelf_core::types::DbId;
use sqlx::FromRow;

/// A row from the `statuses` lookup table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Status {
    pub id: DbId,
    pub name: String,
}
