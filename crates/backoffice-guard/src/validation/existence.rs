use std::collections::HashSet;

use tracing::{debug, error};
use uuid::Uuid;

use super::identifiers::distinct_identifiers;
use super::issue::{Issue, IssueKind};
use super::result::ValidationResult;

/// Answer from a storage-backed existence lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistenceReport {
    /// How many of the requested identifiers exist; which ones are missing is unknown.
    Count(usize),
    /// The requested identifiers that do not exist.
    Missing(Vec<Uuid>),
}

/// Failure of the lookup itself, as opposed to identifiers being absent.
#[derive(Debug, thiserror::Error)]
pub enum ExistenceError {
    #[error("existence store unavailable: {0}")]
    Unavailable(String),
    #[error("existence lookup timed out")]
    TimedOut,
    #[error("existence lookup failed: {0}")]
    Backend(String),
}

impl ExistenceError {
    /// Stable code surfaced in issue metadata.
    pub const fn reason_code(&self) -> &'static str {
        match self {
            ExistenceError::Unavailable(_) => "unavailable",
            ExistenceError::TimedOut => "timed_out",
            ExistenceError::Backend(_) => "backend_error",
        }
    }
}

/// Storage seam reporting which of a set of identifiers are known.
///
/// Implementations may block; callers must not hold locks across `lookup`.
pub trait ExistenceChecker: Send + Sync {
    fn lookup(&self, ids: &[Uuid]) -> Result<ExistenceReport, ExistenceError>;
}

impl<F> ExistenceChecker for F
where
    F: Fn(&[Uuid]) -> Result<ExistenceReport, ExistenceError> + Send + Sync,
{
    fn lookup(&self, ids: &[Uuid]) -> Result<ExistenceReport, ExistenceError> {
        self(ids)
    }
}

/// Confirm that every referenced identifier exists.
///
/// Nulls and repeats are dropped first; they are shape problems reported elsewhere.
pub fn check_existence(
    result: &mut ValidationResult,
    field: &str,
    ids: &[Option<Uuid>],
    checker: &dyn ExistenceChecker,
) {
    let requested = distinct_identifiers(ids);
    if requested.is_empty() {
        return;
    }

    match checker.lookup(&requested) {
        Ok(ExistenceReport::Count(found)) => {
            if found >= requested.len() {
                return;
            }
            let unresolved = requested.len() - found;
            debug!(field, unresolved, requested = requested.len(), "unresolved references");
            result.push(
                Issue::error(
                    IssueKind::Reference,
                    field,
                    format!("{field} references {unresolved} unknown id(s)"),
                )
                .with_meta("unresolved", unresolved)
                .with_meta("requested", requested.len()),
            );
        }
        Ok(ExistenceReport::Missing(missing)) => {
            let missing: HashSet<Uuid> = missing.into_iter().collect();
            for id in requested.iter().filter(|id| missing.contains(*id)) {
                result.push(
                    Issue::error(IssueKind::Reference, field, "Unknown id")
                        .with_meta("id", id.to_string()),
                );
            }
        }
        Err(err) => push_unavailable(result, field, &err),
    }
}

/// Existence check for a single required reference such as an expense category.
pub fn check_reference(
    result: &mut ValidationResult,
    field: &str,
    id: Option<Uuid>,
    checker: Option<&dyn ExistenceChecker>,
) {
    let Some(id) = id else {
        result.push(Issue::error(
            IssueKind::Shape,
            field,
            format!("{field} is required"),
        ));
        return;
    };

    let Some(checker) = checker else {
        return;
    };

    let found = match checker.lookup(&[id]) {
        Ok(ExistenceReport::Count(count)) => count > 0,
        Ok(ExistenceReport::Missing(missing)) => !missing.contains(&id),
        Err(err) => {
            push_unavailable(result, field, &err);
            return;
        }
    };

    if !found {
        result.push(
            Issue::error(IssueKind::Reference, field, format!("{field} not found"))
                .with_meta("id", id.to_string()),
        );
    }
}

fn push_unavailable(result: &mut ValidationResult, field: &str, err: &ExistenceError) {
    error!(field, error = %err, "existence check failed");
    result.push(
        Issue::error(
            IssueKind::CheckUnavailable,
            field,
            format!("could not validate {field} existence"),
        )
        .with_meta("reason", err.reason_code()),
    );
}
