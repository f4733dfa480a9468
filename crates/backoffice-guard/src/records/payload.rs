use serde_json::{Map, Value};
use serde_path_to_error::Segment;

use super::domain::{Candidate, RecordKind};
use crate::validation::{Issue, IssueKind, RequestRejection, ValidationResult};

type DecodeError = serde_path_to_error::Error<serde_json::Error>;

/// Draft decoded from a request body.
///
/// Fields whose JSON value does not fit the draft type are dropped and reported
/// against their own path, so the remaining fields can still be validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCandidate {
    candidate: Candidate,
    issues: Vec<Issue>,
    dropped: Vec<String>,
}

impl DecodedCandidate {
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Type issues found while decoding.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_candidate(self) -> Candidate {
        self.candidate
    }

    /// Merge the decode issues with a validation pass over the decoded draft.
    ///
    /// A dropped field is reported once, by its type issue, not again as missing.
    pub fn reconcile(self, validation: ValidationResult) -> ValidationResult {
        let DecodedCandidate {
            issues, dropped, ..
        } = self;

        let mut result = ValidationResult::new();
        result.extend(issues);
        result.extend(
            validation
                .into_iter()
                .filter(|issue| !dropped.iter().any(|field| field == issue.field())),
        );
        result
    }
}

/// Decode a bare draft body for a kind already known from the request path.
///
/// Only a body that is not a JSON object is refused outright.
pub fn decode_candidate(
    kind: RecordKind,
    body: Value,
) -> Result<DecodedCandidate, RequestRejection> {
    let Value::Object(mut fields) = body else {
        return Err(RequestRejection::new(vec![Issue::error(
            IssueKind::Shape,
            "body",
            format!("{} payload must be a JSON object", kind.label()),
        )]));
    };

    let mut issues = Vec::new();
    let mut dropped = Vec::new();

    // Each pass removes one top-level key, so the loop ends.
    loop {
        let error = match decode_fields(kind, fields.clone()) {
            Ok(candidate) => {
                return Ok(DecodedCandidate {
                    candidate,
                    issues,
                    dropped,
                })
            }
            Err(error) => error,
        };

        let path = error.path().to_string();
        let key = match error.path().iter().next() {
            Some(Segment::Map { key }) if fields.remove(key).is_some() => key.clone(),
            _ => {
                issues.push(Issue::error(
                    IssueKind::Shape,
                    "body",
                    format!("malformed {} payload: {}", kind.label(), error.inner()),
                ));
                return Err(RequestRejection::new(issues));
            }
        };

        issues.push(Issue::error(
            IssueKind::Shape,
            path.as_str(),
            format!("{path} has an invalid value: {}", error.inner()),
        ));
        dropped.push(key);
    }
}

fn decode_fields(kind: RecordKind, fields: Map<String, Value>) -> Result<Candidate, DecodeError> {
    let body = Value::Object(fields);
    Ok(match kind {
        RecordKind::Order => Candidate::Order(serde_path_to_error::deserialize(body)?),
        RecordKind::Purchase => Candidate::Purchase(serde_path_to_error::deserialize(body)?),
        RecordKind::Bill => Candidate::Bill(serde_path_to_error::deserialize(body)?),
        RecordKind::Hiring => Candidate::Hiring(serde_path_to_error::deserialize(body)?),
        RecordKind::Expense => Candidate::Expense(serde_path_to_error::deserialize(body)?),
    })
}
