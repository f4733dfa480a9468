use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Machine-readable context attached to an issue for client-side rendering.
pub type Metadata = BTreeMap<String, Value>;

/// Whether an issue blocks the write or is advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warn,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
        }
    }

    pub const fn is_blocking(self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// Broad category of a finding, so callers can tell "fix your input" from "try again later".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Locally detectable problem with the request's own fields.
    Shape,
    /// Occurrence time rejected by the configured temporal policy.
    Temporal,
    /// A referenced identifier is not known to storage.
    Reference,
    /// The existence check itself could not run.
    CheckUnavailable,
}

impl IssueKind {
    pub const fn label(self) -> &'static str {
        match self {
            IssueKind::Shape => "shape",
            IssueKind::Temporal => "temporal",
            IssueKind::Reference => "reference",
            IssueKind::CheckUnavailable => "check_unavailable",
        }
    }
}

/// A single validation finding against one request field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    field: String,
    message: String,
    severity: Severity,
    kind: IssueKind,
    #[serde(default)]
    metadata: Metadata,
}

impl Issue {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        kind: IssueKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
            kind,
            metadata: Metadata::new(),
        }
    }

    pub fn error(kind: IssueKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Error, kind)
    }

    pub fn warn(kind: IssueKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Warn, kind)
    }

    /// Attach a metadata entry while the issue is being built.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_blocking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn issue_serializes_with_uppercase_severity_and_metadata() {
        let issue = Issue::error(IssueKind::Shape, "taxIds", "taxIds exceeds maxItems")
            .with_meta("maxItems", 64);

        let value = serde_json::to_value(&issue).expect("issue serializes");
        assert_eq!(
            value,
            json!({
                "field": "taxIds",
                "message": "taxIds exceeds maxItems",
                "severity": "ERROR",
                "kind": "shape",
                "metadata": { "maxItems": 64 },
            })
        );
    }

    #[test]
    fn warn_is_not_blocking() {
        let issue = Issue::warn(IssueKind::Temporal, "occurredAt", "weekend");
        assert!(!issue.is_error());
        assert_eq!(issue.severity().label(), "WARN");
        assert!(issue.metadata().is_empty());
    }
}
