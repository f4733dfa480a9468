use serde::Serialize;

use super::issue::{Issue, Severity};
use super::rejection::RequestRejection;

/// Ordered accumulator for the issues found during one validation pass.
///
/// Issues are kept in insertion order and never deduplicated; two duplicate
/// identifiers produce two warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) -> &mut Self {
        self.issues.push(issue);
        self
    }

    /// Append every issue of another pass, preserving its order.
    pub fn merge(&mut self, other: ValidationResult) -> &mut Self {
        self.issues.extend(other.issues);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Warn)
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |issue| issue.field() == field)
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Split the pass into the warnings to return on success or a rejection carrying every issue.
    pub fn into_outcome(self) -> Result<Vec<Issue>, RequestRejection> {
        if self.has_errors() {
            return Err(RequestRejection::new(self.issues));
        }
        Ok(self.issues)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity() == severity)
    }
}

impl Extend<Issue> for ValidationResult {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}

impl IntoIterator for ValidationResult {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::issue::IssueKind;

    #[test]
    fn empty_pass_has_no_errors() {
        let result = ValidationResult::new();
        assert!(!result.has_errors());
        assert!(result.is_empty());
        assert_eq!(result.into_outcome().expect("nothing to reject"), Vec::new());
    }

    #[test]
    fn warnings_alone_do_not_count_as_errors() {
        let mut result = ValidationResult::new();
        result
            .push(Issue::warn(IssueKind::Shape, "taxIds", "dup"))
            .push(Issue::warn(IssueKind::Shape, "taxIds", "dup"));

        assert!(!result.has_errors());
        assert_eq!(result.warnings().count(), 2);
        let warnings = result.into_outcome().expect("warnings never block");
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn merge_keeps_insertion_order() {
        let mut first = ValidationResult::new();
        first.push(Issue::error(IssueKind::Shape, "code", "code is required"));
        let mut second = ValidationResult::new();
        second.push(Issue::warn(IssueKind::Temporal, "occurredAt", "weekend"));
        second.push(Issue::error(IssueKind::Shape, "total", "total must be >= 0"));

        first.merge(second);

        let fields: Vec<_> = first.issues().iter().map(Issue::field).collect();
        assert_eq!(fields, vec!["code", "occurredAt", "total"]);
        assert_eq!(first.errors().count(), 2);
        assert_eq!(first.for_field("occurredAt").count(), 1);
    }

    #[test]
    fn outcome_rejects_with_all_issues_when_any_error() {
        let mut result = ValidationResult::new();
        result.push(Issue::warn(IssueKind::Shape, "taxIds", "dup"));
        result.push(Issue::error(IssueKind::Shape, "currency", "bad"));

        let rejection = result.into_outcome().expect_err("error blocks");
        assert_eq!(rejection.issues().len(), 2);
    }
}
