//! Filter normalization.
//!
//! Callers address nested relations with dotted paths (`status.name`). The
//! store expects its own join-path notation (`status__name`), and a path
//! carrying the `isnull` lookup needs a boolean operand rather than the raw
//! string the caller sent.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Separator between relation segments (and the trailing lookup) in a
/// storage path.
pub const RELATION_SEPARATOR: &str = "__";

/// Lookup name marking a null-check predicate.
pub const ISNULL_LOOKUP: &str = "isnull";

/// Typed operand of a single filter predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Passed through to the store untouched.
    Text(String),
    /// Coerced operand of an `isnull` predicate.
    Bool(bool),
}

/// One equality (or null-check) condition on a storage path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    pub path: String,
    pub value: FilterValue,
}

/// Rewrite a dotted field path into storage notation.
///
/// Paths that are already normalized come back unchanged.
pub fn normalize_path(path: &str) -> String {
    path.replace('.', RELATION_SEPARATOR)
}

/// Interpret the operand of an `isnull` predicate.
///
/// Only `"true"` and `"1"` count as true; every other string is false.
pub fn parse_null_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Normalize a caller-supplied filter map into storage predicates.
///
/// No field-existence check happens here: an unknown path is the store's to
/// reject. The result is ordered by path because the input map is unordered
/// and the generated query should not depend on hash iteration order.
pub fn normalize_filters<S: BuildHasher>(
    filters: &HashMap<String, String, S>,
) -> Vec<FilterPredicate> {
    let mut predicates: Vec<FilterPredicate> = filters
        .iter()
        .map(|(path, value)| {
            let path = normalize_path(path);
            let value = if path.contains(ISNULL_LOOKUP) {
                FilterValue::Bool(parse_null_flag(value))
            } else {
                FilterValue::Text(value.clone())
            };
            FilterPredicate { path, value }
        })
        .collect();

    predicates.sort_by(|a, b| a.path.cmp(&b.path));
    predicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dots_become_relation_separator() {
        assert_eq!(normalize_path("status.name"), "status__name");
        assert_eq!(normalize_path("a.b.c"), "a__b__c");
    }

    #[test]
    fn normalized_path_is_unchanged() {
        assert_eq!(normalize_path("status__name"), "status__name");
        assert_eq!(normalize_path("name"), "name");
        assert_eq!(
            normalize_path(&normalize_path("status.name")),
            "status__name"
        );
    }

    #[test]
    fn null_flag_accepts_true_and_one() {
        assert!(parse_null_flag("true"));
        assert!(parse_null_flag("1"));
    }

    #[test]
    fn null_flag_rejects_everything_else() {
        for value in ["false", "0", "", "TRUE", "True", "yes", " true"] {
            assert!(!parse_null_flag(value), "{value:?} should be false");
        }
    }

    #[test]
    fn plain_filter_passes_value_through() {
        let out = normalize_filters(&filters(&[("status.name", "ongoing")]));
        assert_eq!(
            out,
            vec![FilterPredicate {
                path: "status__name".to_string(),
                value: FilterValue::Text("ongoing".to_string()),
            }]
        );
    }

    #[test]
    fn isnull_filter_is_coerced_to_bool() {
        let out = normalize_filters(&filters(&[
            ("status.isnull", "1"),
            ("description__isnull", "no"),
        ]));
        assert_eq!(
            out,
            vec![
                FilterPredicate {
                    path: "description__isnull".to_string(),
                    value: FilterValue::Bool(false),
                },
                FilterPredicate {
                    path: "status__isnull".to_string(),
                    value: FilterValue::Bool(true),
                },
            ]
        );
    }

    #[test]
    fn output_is_sorted_by_path() {
        let out = normalize_filters(&filters(&[
            ("type_name", "manga"),
            ("name", "Berserk"),
            ("status.name", "ongoing"),
        ]));
        let paths: Vec<&str> = out.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "status__name", "type_name"]);
    }

    #[test]
    fn empty_map_gives_no_predicates() {
        assert!(normalize_filters(&HashMap::new()).is_empty());
    }
}
