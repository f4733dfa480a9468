//! Rule-evaluation building blocks shared by every writable record kind.
//!
//! Each check appends to a [`ValidationResult`] instead of returning early, so a
//! single pass reports every problem with a request at once.

pub mod existence;
pub mod fields;
pub mod identifiers;
pub mod issue;
pub mod paging;
pub mod rejection;
pub mod result;
pub mod temporal;

pub use existence::{
    check_existence, check_reference, ExistenceChecker, ExistenceError, ExistenceReport,
};
pub use identifiers::{
    check_identifier_shape, distinct_identifiers, normalize_identifiers, IdentifierSetPolicy,
};
pub use issue::{Issue, IssueKind, Metadata, Severity};
pub use paging::{Page, PageQuery};
pub use rejection::RequestRejection;
pub use result::ValidationResult;
pub use temporal::{check_occurred_at, Clock, FixedClock, SystemClock, TemporalPolicy};
