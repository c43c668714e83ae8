//! Sort plan construction.
//!
//! Callers send two parallel lists: `sortby` (field names) and `order`
//! (`asc` / `desc`). They are reconciled in this precedence:
//!
//! 1. no `sortby` fields: any `order` entry is an error, otherwise no ordering;
//! 2. equal lengths: `order[i]` applies to `sortby[i]`;
//! 3. a single `order` entry with several fields: it applies to all of them;
//! 4. anything else is a size mismatch.

use std::fmt;

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction token. Matching is exact: `ASC` is not accepted.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A field name paired with its direction.
///
/// Displays in signed form: `name` ascending, `-name` descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Desc
    }

    /// Signed field name (`-` prefix for descending).
    pub fn signed(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Rejection reasons for a `sortby` / `order` pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortPlanError {
    #[error("unused 'order' fields: {order} given without any 'sortby' field")]
    UnusedOrder { order: usize },

    #[error("invalid order '{token}' at index {index}: must be either asc or desc")]
    InvalidOrder { index: usize, token: String },

    #[error(
        "'sortby', 'order' sizes mismatch or 'order' size is not 1 \
         (sortby: {sortby}, order: {order})"
    )]
    SizeMismatch { sortby: usize, order: usize },
}

/// Reconcile `sortby` against `order` into an ordered list of sort keys.
///
/// The output preserves the order of `sortby`.
pub fn build_sort_plan<F, O>(sortby: &[F], order: &[O]) -> Result<Vec<SortKey>, SortPlanError>
where
    F: AsRef<str>,
    O: AsRef<str>,
{
    if sortby.is_empty() {
        if !order.is_empty() {
            return Err(SortPlanError::UnusedOrder { order: order.len() });
        }
        return Ok(Vec::new());
    }

    if sortby.len() == order.len() {
        return sortby
            .iter()
            .zip(order)
            .enumerate()
            .map(|(index, (field, token))| {
                let direction = parse_direction(index, token.as_ref())?;
                Ok(SortKey::new(field.as_ref(), direction))
            })
            .collect();
    }

    if let [token] = order {
        let direction = parse_direction(0, token.as_ref())?;
        return Ok(sortby
            .iter()
            .map(|field| SortKey::new(field.as_ref(), direction))
            .collect());
    }

    Err(SortPlanError::SizeMismatch {
        sortby: sortby.len(),
        order: order.len(),
    })
}

/// Render a plan in signed form, e.g. `["name", "-type_name"]`.
pub fn signed_fields(plan: &[SortKey]) -> Vec<String> {
    plan.iter().map(SortKey::signed).collect()
}

fn parse_direction(index: usize, token: &str) -> Result<SortDirection, SortPlanError> {
    SortDirection::parse(token).ok_or_else(|| SortPlanError::InvalidOrder {
        index,
        token: token.to_string(),
    })
}
