use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::issue::{Issue, IssueKind};
use super::result::ValidationResult;

/// User-facing refusal of a write, carrying every issue found in the pass.
///
/// Serializes as `{ "issues": [...] }` and maps to `422 Unprocessable Entity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRejection {
    issues: Vec<Issue>,
}

impl RequestRejection {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// `None` unless the result holds at least one blocking issue.
    pub fn from_result(result: ValidationResult) -> Option<Self> {
        result.into_outcome().err()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_error()).count()
    }

    /// True when some error came from an existence check that could not run,
    /// so resubmitting unchanged may succeed later.
    pub fn is_retryable(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.is_error() && issue.kind() == IssueKind::CheckUnavailable)
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl fmt::Display for RequestRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed with {} blocking issue(s)",
            self.error_count()
        )
    }
}

impl std::error::Error for RequestRejection {}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
    }
}
