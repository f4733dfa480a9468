use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::records::domain::{
    BillDraft, Candidate, ExpenseDraft, HiringDraft, OrderDraft, PurchaseDraft, RecordKind,
};
use crate::records::repository::{RecordId, RecordRepository, RepositoryError, StoredRecord};
use crate::records::{KindPolicies, RecordService};
use crate::validation::{
    ExistenceChecker, ExistenceError, ExistenceReport, FixedClock, Page,
};

/// Wednesday, so business-day checks pass for `now()`.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0)
        .single()
        .expect("valid instant")
}

/// Saturday of the same week.
pub(super) fn saturday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 11, 10, 30, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn clock() -> FixedClock {
    FixedClock(now())
}

pub(super) fn vat() -> Uuid {
    Uuid::from_u128(0xA1)
}

pub(super) fn withholding() -> Uuid {
    Uuid::from_u128(0xB2)
}

pub(super) fn unknown_tax() -> Uuid {
    Uuid::from_u128(0xDEAD)
}

pub(super) fn travel_category() -> Uuid {
    Uuid::from_u128(0xC3)
}

pub(super) fn order() -> OrderDraft {
    OrderDraft {
        code: Some("ORD-1001".to_string()),
        occurred_at: Some(now()),
        currency: Some("EUR".to_string()),
        total: Some(125_000),
        tax_ids: Some(vec![Some(vat()), Some(withholding())]),
    }
}

pub(super) fn purchase() -> PurchaseDraft {
    PurchaseDraft {
        code: Some("PO-77".to_string()),
        occurred_at: Some(now() - Duration::days(2)),
        currency: Some("USD".to_string()),
        total: Some(9_990),
        vendor: Some("Northwind Supplies".to_string()),
        tax_ids: Some(vec![Some(vat())]),
    }
}

pub(super) fn bill() -> BillDraft {
    BillDraft {
        code: Some("BILL-2025-10".to_string()),
        occurred_at: Some(now() - Duration::hours(3)),
        due_at: Some(now() + Duration::days(30)),
        currency: Some("EUR".to_string()),
        total: Some(48_000),
        vendor: Some("City Utilities".to_string()),
        payee: Some("Accounts Payable".to_string()),
        tax_ids: Some(Vec::new()),
    }
}

pub(super) fn hiring() -> HiringDraft {
    HiringDraft {
        code: Some("HR-310".to_string()),
        occurred_at: Some(now() - Duration::days(1)),
        employee_name: Some("Ada Moreno".to_string()),
        role: Some("Staff Accountant".to_string()),
        start_at: Some(now() + Duration::days(14)),
        end_at: None,
        gross_salary: Some(5_400_000),
        currency: Some("EUR".to_string()),
        total: None,
        candidate_name: Some("Ada Moreno".to_string()),
        tax_ids: None,
    }
}

pub(super) fn expense() -> ExpenseDraft {
    ExpenseDraft {
        occurred_at: Some(now()),
        amount: Some(4_250),
        currency: Some("EUR".to_string()),
        category_id: Some(travel_category()),
        vendor: Some("Rail Europe".to_string()),
    }
}

/// Tax catalog that names exactly which ids it could not find.
pub(super) struct TaxCatalog {
    known: HashSet<Uuid>,
}

impl TaxCatalog {
    pub(super) fn standard() -> Self {
        Self {
            known: [vat(), withholding()].into_iter().collect(),
        }
    }
}

impl ExistenceChecker for TaxCatalog {
    fn lookup(&self, ids: &[Uuid]) -> Result<ExistenceReport, ExistenceError> {
        let missing = ids
            .iter()
            .filter(|id| !self.known.contains(*id))
            .copied()
            .collect();
        Ok(ExistenceReport::Missing(missing))
    }
}

/// Storage that can only answer how many of the requested ids exist.
pub(super) struct CountingCatalog {
    known: HashSet<Uuid>,
}

impl CountingCatalog {
    pub(super) fn new(known: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            known: known.into_iter().collect(),
        }
    }
}

impl ExistenceChecker for CountingCatalog {
    fn lookup(&self, ids: &[Uuid]) -> Result<ExistenceReport, ExistenceError> {
        Ok(ExistenceReport::Count(
            ids.iter().filter(|id| self.known.contains(*id)).count(),
        ))
    }
}

pub(super) struct OfflineCatalog;

impl ExistenceChecker for OfflineCatalog {
    fn lookup(&self, _ids: &[Uuid]) -> Result<ExistenceReport, ExistenceError> {
        Err(ExistenceError::Unavailable("tax store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<Vec<StoredRecord>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<StoredRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl RecordRepository for MemoryRepository {
    fn insert(&self, record: StoredRecord) -> Result<StoredRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate = record.candidate.code().is_some()
            && guard.iter().any(|existing| {
                existing.kind() == record.kind()
                    && existing.candidate.code() == record.candidate.code()
            });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, kind: RecordKind, id: RecordId) -> Result<Option<StoredRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| record.kind() == kind && record.id == id)
            .cloned())
    }

    fn list(&self, kind: RecordKind, page: Page) -> Result<Vec<StoredRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.kind() == kind)
            .skip(page.offset())
            .take(page.size)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl RecordRepository for UnavailableRepository {
    fn insert(&self, _record: StoredRecord) -> Result<StoredRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _kind: RecordKind,
        _id: RecordId,
    ) -> Result<Option<StoredRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _kind: RecordKind, _page: Page) -> Result<Vec<StoredRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (RecordService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = service_over(repository.clone());
    (service, repository)
}

pub(super) fn service_over<R>(repository: Arc<R>) -> RecordService<R>
where
    R: RecordRepository + 'static,
{
    RecordService::new(repository, KindPolicies::standard())
        .with_clock(Arc::new(clock()))
        .with_tax_checker(Arc::new(TaxCatalog::standard()))
        .with_expense_category_checker(Arc::new(CountingCatalog::new([travel_category()])))
}

pub(super) fn all_valid_candidates() -> Vec<Candidate> {
    vec![
        Candidate::Order(order()),
        Candidate::Purchase(purchase()),
        Candidate::Bill(bill()),
        Candidate::Hiring(hiring()),
        Candidate::Expense(expense()),
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
