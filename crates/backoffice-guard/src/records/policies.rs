use chrono::Duration;

use super::domain::RecordKind;
use crate::validation::identifiers::DEFAULT_MAX_ITEMS;
use crate::validation::temporal::{DEFAULT_FUTURE_SKEW_MINUTES, DEFAULT_MAX_AGE_DAYS};
use crate::validation::{IdentifierSetPolicy, TemporalPolicy};

/// Policies applied to one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPolicy {
    pub occurred_at: TemporalPolicy,
    /// Present only for kinds that reference taxes.
    pub tax_ids: Option<IdentifierSetPolicy>,
}

/// Per-kind policy table, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindPolicies {
    order: KindPolicy,
    purchase: KindPolicy,
    bill: KindPolicy,
    hiring: KindPolicy,
    expense: KindPolicy,
}

impl KindPolicies {
    /// Tax-linked kinds require business days; expenses may be booked on any day.
    pub fn build(max_age: Duration, future_skew: Duration, tax_ids_max_items: usize) -> Self {
        let tax_linked = KindPolicy {
            occurred_at: TemporalPolicy::new(true, max_age, future_skew),
            tax_ids: Some(IdentifierSetPolicy::new(true, tax_ids_max_items)),
        };
        let expense = KindPolicy {
            occurred_at: TemporalPolicy::new(false, max_age, future_skew),
            tax_ids: None,
        };

        Self {
            order: tax_linked,
            purchase: tax_linked,
            bill: tax_linked,
            hiring: tax_linked,
            expense,
        }
    }

    pub fn standard() -> Self {
        Self::build(
            Duration::days(DEFAULT_MAX_AGE_DAYS),
            Duration::minutes(DEFAULT_FUTURE_SKEW_MINUTES),
            DEFAULT_MAX_ITEMS,
        )
    }

    pub fn for_kind(&self, kind: RecordKind) -> &KindPolicy {
        match kind {
            RecordKind::Order => &self.order,
            RecordKind::Purchase => &self.purchase,
            RecordKind::Bill => &self.bill,
            RecordKind::Hiring => &self.hiring,
            RecordKind::Expense => &self.expense,
        }
    }

    /// Replace the policy of one kind, e.g. a stricter window for bills.
    pub fn with_policy(mut self, kind: RecordKind, policy: KindPolicy) -> Self {
        let slot = match kind {
            RecordKind::Order => &mut self.order,
            RecordKind::Purchase => &mut self.purchase,
            RecordKind::Bill => &mut self.bill,
            RecordKind::Hiring => &mut self.hiring,
            RecordKind::Expense => &mut self.expense,
        };
        *slot = policy;
        self
    }
}

impl Default for KindPolicies {
    fn default() -> Self {
        Self::standard()
    }
}
