use std::collections::HashSet;

use uuid::Uuid;

use super::issue::{Issue, IssueKind};
use super::result::ValidationResult;

pub const DEFAULT_MAX_ITEMS: usize = 64;

/// Cardinality rules for a list of foreign-key-like identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierSetPolicy {
    allow_empty: bool,
    max_items: usize,
}

impl IdentifierSetPolicy {
    pub fn new(allow_empty: bool, max_items: usize) -> Self {
        Self {
            allow_empty,
            max_items,
        }
    }

    pub fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }
}

impl Default for IdentifierSetPolicy {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_ITEMS)
    }
}

/// Shape checks for an identifier list as submitted, without touching storage.
///
/// Nulls and oversize lists are errors; repeats are only warned about since the
/// write path deduplicates them anyway.
pub fn check_identifier_shape(
    result: &mut ValidationResult,
    field: &str,
    ids: Option<&[Option<Uuid>]>,
    policy: &IdentifierSetPolicy,
) {
    let Some(ids) = ids else {
        if !policy.allow_empty {
            result.push(Issue::error(
                IssueKind::Shape,
                field,
                format!("{field} is required (can be empty list)"),
            ));
        }
        return;
    };

    if ids.is_empty() {
        if !policy.allow_empty {
            result.push(Issue::error(
                IssueKind::Shape,
                field,
                format!("{field} cannot be empty"),
            ));
        }
        return;
    }

    if ids.len() > policy.max_items {
        result.push(
            Issue::error(
                IssueKind::Shape,
                field,
                format!("{field} exceeds maxItems"),
            )
            .with_meta("maxItems", policy.max_items),
        );
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        match id {
            None => {
                result.push(Issue::error(
                    IssueKind::Shape,
                    field,
                    format!("{field} contains null"),
                ));
            }
            Some(id) if !seen.insert(*id) => {
                result.push(
                    Issue::warn(
                        IssueKind::Shape,
                        field,
                        format!("{field} contains duplicates"),
                    )
                    .with_meta("id", id.to_string()),
                );
            }
            Some(_) => {}
        }
    }
}

/// Distinct, non-null identifiers in first-seen order.
pub fn distinct_identifiers(ids: &[Option<Uuid>]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .flatten()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Prepare an identifier list for storage: drop nulls, deduplicate, cap at `max_items`.
///
/// An absent list stays absent and an empty list stays empty.
pub fn normalize_identifiers(ids: Option<&[Option<Uuid>]>, max_items: usize) -> Option<Vec<Uuid>> {
    let ids = ids?;
    let mut normalized = distinct_identifiers(ids);
    normalized.truncate(max_items);
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::issue::Severity;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn run(ids: Option<&[Option<Uuid>]>, policy: IdentifierSetPolicy) -> ValidationResult {
        let mut result = ValidationResult::new();
        check_identifier_shape(&mut result, "taxIds", ids, &policy);
        result
    }

    #[test]
    fn absent_list_is_required_unless_empty_allowed() {
        let strict = run(None, IdentifierSetPolicy::new(false, 64));
        assert_eq!(strict.len(), 1);
        assert_eq!(
            strict.issues()[0].message(),
            "taxIds is required (can be empty list)"
        );

        assert!(run(None, IdentifierSetPolicy::new(true, 64)).is_empty());
    }

    #[test]
    fn empty_list_yields_exactly_one_error_when_required() {
        let result = run(Some(&[][..]), IdentifierSetPolicy::new(false, 64));
        assert_eq!(result.len(), 1);
        assert!(result.has_errors());
        assert_eq!(result.issues()[0].message(), "taxIds cannot be empty");

        assert!(run(Some(&[][..]), IdentifierSetPolicy::new(true, 64)).is_empty());
    }

    #[test]
    fn oversize_list_names_the_limit_once() {
        let ids: Vec<_> = (0..4).map(|n| Some(id(n))).collect();
        let result = run(Some(&ids[..]), IdentifierSetPolicy::new(true, 3));

        assert_eq!(result.len(), 1);
        let issue = &result.issues()[0];
        assert!(issue.is_error());
        assert_eq!(issue.meta("maxItems").and_then(|v| v.as_u64()), Some(3));
    }

    #[test]
    fn triple_occurrence_yields_two_warnings() {
        let ids = [Some(id(7)), Some(id(7)), Some(id(7))];
        let result = run(Some(&ids[..]), IdentifierSetPolicy::default());

        assert_eq!(result.len(), 2);
        assert!(!result.has_errors());
        for issue in result.issues() {
            assert_eq!(issue.severity(), Severity::Warn);
            assert_eq!(
                issue.meta("id").and_then(|v| v.as_str()),
                Some(id(7).to_string().as_str())
            );
        }
    }

    #[test]
    fn each_null_is_reported() {
        let ids = [None, Some(id(1)), None];
        let result = run(Some(&ids[..]), IdentifierSetPolicy::default());
        assert_eq!(result.errors().count(), 2);
        assert_eq!(result.warnings().count(), 0);
    }

    #[test]
    fn duplicate_and_null_mix() {
        let a = id(10);
        let ids = [Some(a), Some(a), None];
        let result = run(Some(&ids[..]), IdentifierSetPolicy::new(false, 64));

        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.warnings().count(), 1);
        assert!(result.has_errors());
    }

    #[test]
    fn normalize_drops_nulls_dedupes_and_caps() {
        let ids = [Some(id(3)), None, Some(id(1)), Some(id(3)), Some(id(2))];
        assert_eq!(
            normalize_identifiers(Some(&ids[..]), 2),
            Some(vec![id(3), id(1)])
        );
        assert_eq!(
            normalize_identifiers(Some(&ids[..]), 64),
            Some(vec![id(3), id(1), id(2)])
        );
        assert_eq!(normalize_identifiers(Some(&[][..]), 64), Some(Vec::new()));
        assert_eq!(normalize_identifiers(None, 64), None);
    }
}
