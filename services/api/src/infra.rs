use backoffice_guard::records::{
    RecordId, RecordKind, RecordRepository, RepositoryError, StoredRecord,
};
use backoffice_guard::validation::{ExistenceChecker, ExistenceError, ExistenceReport, Page};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store; records of one kind are unique by code.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordRepository {
    records: Arc<Mutex<Vec<StoredRecord>>>,
}

impl RecordRepository for InMemoryRecordRepository {
    fn insert(&self, record: StoredRecord) -> Result<StoredRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        let taken = record.candidate.code().is_some()
            && guard.iter().any(|existing| {
                existing.kind() == record.kind()
                    && existing.candidate.code() == record.candidate.code()
            });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, kind: RecordKind, id: RecordId) -> Result<Option<StoredRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        Ok(guard
            .iter()
            .find(|record| record.id == id && record.kind() == kind)
            .cloned())
    }

    fn list(&self, kind: RecordKind, page: Page) -> Result<Vec<StoredRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|record| record.kind() == kind)
            .skip(page.offset())
            .take(page.size)
            .cloned()
            .collect())
    }
}

/// How a catalog answers existence lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogMode {
    /// Reports which ids are missing.
    Enumerating,
    /// Reports only how many ids exist.
    Counting,
}

/// Fixed set of known reference ids, e.g. tax rules or expense categories.
#[derive(Debug, Clone)]
pub(crate) struct InMemoryCatalog {
    known: Arc<HashSet<Uuid>>,
    mode: CatalogMode,
}

impl InMemoryCatalog {
    pub(crate) fn new(known: impl IntoIterator<Item = Uuid>, mode: CatalogMode) -> Self {
        Self {
            known: Arc::new(known.into_iter().collect()),
            mode,
        }
    }

    /// `None` when no ids were supplied, which leaves the lookup disabled.
    pub(crate) fn checker(ids: &[Uuid], mode: CatalogMode) -> Option<Arc<dyn ExistenceChecker>> {
        if ids.is_empty() {
            return None;
        }
        Some(Arc::new(Self::new(ids.iter().copied(), mode)))
    }
}

impl ExistenceChecker for InMemoryCatalog {
    fn lookup(&self, ids: &[Uuid]) -> Result<ExistenceReport, ExistenceError> {
        Ok(match self.mode {
            CatalogMode::Enumerating => ExistenceReport::Missing(
                ids.iter()
                    .filter(|id| !self.known.contains(*id))
                    .copied()
                    .collect(),
            ),
            CatalogMode::Counting => {
                ExistenceReport::Count(ids.iter().filter(|id| self.known.contains(*id)).count())
            }
        })
    }
}

pub(crate) fn parse_kind(raw: &str) -> Result<RecordKind, String> {
    RecordKind::parse(raw).ok_or_else(|| {
        let known: Vec<_> = RecordKind::ALL.iter().map(|kind| kind.label()).collect();
        format!("unknown record kind '{raw}' (expected one of {})", known.join(", "))
    })
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 instant ({err})"))
}
