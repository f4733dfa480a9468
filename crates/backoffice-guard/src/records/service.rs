use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{Candidate, RecordKind};
use super::payload::DecodedCandidate;
use super::policies::KindPolicies;
use super::repository::{
    AcceptedRecord, RecordId, RecordRepository, RepositoryError, StoredRecord,
};
use super::validator::{EntityValidator, ReferenceCheckers};
use crate::validation::{
    normalize_identifiers, Clock, ExistenceChecker, Page, PageQuery, RequestRejection,
    SystemClock, ValidationResult,
};

/// Write path for back-office records: validate, normalize, persist.
///
/// Every method is synchronous. Existence checkers and the repository are called
/// inline on the calling thread, so a slow catalog lookup blocks it; async callers
/// serving heavy traffic should move calls onto a blocking pool.
pub struct RecordService<R> {
    validator: EntityValidator,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    tax_checker: Option<Arc<dyn ExistenceChecker>>,
    category_checker: Option<Arc<dyn ExistenceChecker>>,
}

impl<R> RecordService<R>
where
    R: RecordRepository + 'static,
{
    pub fn new(repository: Arc<R>, policies: KindPolicies) -> Self {
        Self {
            validator: EntityValidator::new(policies),
            repository,
            clock: Arc::new(SystemClock),
            tax_checker: None,
            category_checker: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tax_checker(mut self, checker: Arc<dyn ExistenceChecker>) -> Self {
        self.tax_checker = Some(checker);
        self
    }

    pub fn with_expense_category_checker(mut self, checker: Arc<dyn ExistenceChecker>) -> Self {
        self.category_checker = Some(checker);
        self
    }

    pub fn validator(&self) -> &EntityValidator {
        &self.validator
    }

    /// Run every configured check without persisting anything.
    ///
    /// Blocks for as long as the configured existence checkers take.
    pub fn validate(&self, candidate: &Candidate) -> ValidationResult {
        let mut checkers = ReferenceCheckers::none();
        if let Some(checker) = self.tax_checker.as_deref() {
            checkers = checkers.with_taxes(checker);
        }
        if let Some(checker) = self.category_checker.as_deref() {
            checkers = checkers.with_expense_categories(checker);
        }
        self.validator.validate(candidate, self.clock.as_ref(), checkers)
    }

    /// Validate and store a new record.
    ///
    /// Any blocking issue rejects the write with the full issue list; warnings
    /// travel back with the stored record.
    pub fn create(&self, candidate: Candidate) -> Result<AcceptedRecord, RecordServiceError> {
        let kind = candidate.kind();
        let warnings = match self.validate(&candidate).into_outcome() {
            Ok(warnings) => warnings,
            Err(rejection) => return Err(rejected(kind, rejection)),
        };

        let candidate = self.normalize(candidate);
        let record = StoredRecord {
            id: RecordId::generate(),
            recorded_at: self.now(),
            candidate,
        };

        let stored = self.repository.insert(record)?;
        info!(
            kind = kind.label(),
            record_id = %stored.id,
            warnings = warnings.len(),
            "record accepted"
        );

        Ok(AcceptedRecord {
            record: stored,
            warnings,
        })
    }

    /// Validation pass over a decoded request body, decode issues first.
    pub fn screen(&self, decoded: DecodedCandidate) -> ValidationResult {
        let validation = self.validate(decoded.candidate());
        decoded.reconcile(validation)
    }

    /// Store a decoded request body.
    ///
    /// A body with mistyped fields is never stored, but the rest of it is still
    /// validated so the rejection lists every problem at once.
    pub fn create_decoded(
        &self,
        decoded: DecodedCandidate,
    ) -> Result<AcceptedRecord, RecordServiceError> {
        if decoded.is_clean() {
            return self.create(decoded.into_candidate());
        }

        let kind = decoded.candidate().kind();
        let rejection = RequestRejection::new(self.screen(decoded).into_issues());
        Err(rejected(kind, rejection))
    }

    pub fn get(&self, kind: RecordKind, id: RecordId) -> Result<StoredRecord, RecordServiceError> {
        let record = self
            .repository
            .fetch(kind, id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(
        &self,
        kind: RecordKind,
        query: PageQuery,
    ) -> Result<Vec<StoredRecord>, RecordServiceError> {
        let page = Page::normalize(query)?;
        Ok(self.repository.list(kind, page)?)
    }

    fn normalize(&self, mut candidate: Candidate) -> Candidate {
        let max_items = self
            .validator
            .policies()
            .for_kind(candidate.kind())
            .tax_ids
            .map(|policy| policy.max_items());

        if let (Some(slot), Some(max_items)) = (candidate.tax_ids_mut(), max_items) {
            *slot = normalize_identifiers(slot.as_deref(), max_items)
                .map(|ids| ids.into_iter().map(Some).collect());
        }
        candidate
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

fn rejected(kind: RecordKind, rejection: RequestRejection) -> RecordServiceError {
    debug!(
        kind = kind.label(),
        errors = rejection.error_count(),
        issues = rejection.issues().len(),
        retryable = rejection.is_retryable(),
        "record rejected"
    );
    rejection.into()
}

#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error(transparent)]
    Rejected(#[from] RequestRejection),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
