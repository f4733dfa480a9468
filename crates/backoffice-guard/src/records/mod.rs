//! Writable back-office records and the write path guarding them.
//!
//! Each record kind is plain tagged data; [`EntityValidator`] composes the shared
//! checks from [`crate::validation`] under a per-kind policy table, and
//! [`RecordService`] turns the outcome into a stored record or a rejection.

pub mod domain;
pub mod payload;
pub mod policies;
pub mod repository;
pub mod router;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use domain::{
    BillDraft, Candidate, ExpenseDraft, HiringDraft, IdentifierList, OrderDraft, PurchaseDraft,
    RecordKind,
};
pub use payload::{decode_candidate, DecodedCandidate};
pub use policies::{KindPolicies, KindPolicy};
pub use repository::{AcceptedRecord, RecordId, RecordRepository, RepositoryError, StoredRecord};
pub use router::record_router;
pub use service::{RecordService, RecordServiceError};
pub use validator::{EntityValidator, ReferenceCheckers};
