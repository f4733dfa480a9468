use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{Candidate, RecordKind};
use crate::validation::{Issue, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted record: the normalized candidate plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: RecordId,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub candidate: Candidate,
}

impl StoredRecord {
    pub fn kind(&self) -> RecordKind {
        self.candidate.kind()
    }
}

/// Successful write: the stored record and any advisory issues raised on the way in.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedRecord {
    pub record: StoredRecord,
    pub warnings: Vec<Issue>,
}

/// Storage abstraction so the service can be exercised without a database.
pub trait RecordRepository: Send + Sync {
    /// Insert a new record; a second record of the same kind and code is a conflict.
    fn insert(&self, record: StoredRecord) -> Result<StoredRecord, RepositoryError>;
    fn fetch(&self, kind: RecordKind, id: RecordId) -> Result<Option<StoredRecord>, RepositoryError>;
    fn list(&self, kind: RecordKind, page: Page) -> Result<Vec<StoredRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
