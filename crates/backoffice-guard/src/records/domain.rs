use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier list as submitted: the list may be absent and entries may be null.
pub type IdentifierList = Option<Vec<Option<Uuid>>>;

/// Writable record kinds exposed by the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Order,
    Purchase,
    Bill,
    Hiring,
    Expense,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Order,
        RecordKind::Purchase,
        RecordKind::Bill,
        RecordKind::Hiring,
        RecordKind::Expense,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RecordKind::Order => "order",
            RecordKind::Purchase => "purchase",
            RecordKind::Bill => "bill",
            RecordKind::Hiring => "hiring",
            RecordKind::Expense => "expense",
        }
    }

    /// Plural path segment used by the HTTP surface.
    pub const fn collection(self) -> &'static str {
        match self {
            RecordKind::Order => "orders",
            RecordKind::Purchase => "purchases",
            RecordKind::Bill => "bills",
            RecordKind::Hiring => "hirings",
            RecordKind::Expense => "expenses",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == raw || kind.collection() == raw)
    }
}

/// Sales order awaiting creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub code: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub currency: Option<String>,
    /// Minor currency units.
    pub total: Option<i64>,
    #[serde(default)]
    pub tax_ids: IdentifierList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraft {
    pub code: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub currency: Option<String>,
    pub total: Option<i64>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub tax_ids: IdentifierList,
}

/// Payable bill; `due_at` may not precede `occurred_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    pub code: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub currency: Option<String>,
    pub total: Option<i64>,
    pub vendor: Option<String>,
    pub payee: Option<String>,
    #[serde(default)]
    pub tax_ids: IdentifierList,
}

/// HR hiring event with its employment window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiringDraft {
    pub code: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub employee_name: Option<String>,
    pub role: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub gross_salary: Option<i64>,
    pub currency: Option<String>,
    pub total: Option<i64>,
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub tax_ids: IdentifierList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub occurred_at: Option<DateTime<Utc>>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub category_id: Option<Uuid>,
    pub vendor: Option<String>,
}

/// Not-yet-persisted record, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "draft", rename_all = "snake_case")]
pub enum Candidate {
    Order(OrderDraft),
    Purchase(PurchaseDraft),
    Bill(BillDraft),
    Hiring(HiringDraft),
    Expense(ExpenseDraft),
}

impl Candidate {
    pub fn kind(&self) -> RecordKind {
        match self {
            Candidate::Order(_) => RecordKind::Order,
            Candidate::Purchase(_) => RecordKind::Purchase,
            Candidate::Bill(_) => RecordKind::Bill,
            Candidate::Hiring(_) => RecordKind::Hiring,
            Candidate::Expense(_) => RecordKind::Expense,
        }
    }

    /// Business code, for kinds that carry one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Candidate::Order(draft) => draft.code.as_deref(),
            Candidate::Purchase(draft) => draft.code.as_deref(),
            Candidate::Bill(draft) => draft.code.as_deref(),
            Candidate::Hiring(draft) => draft.code.as_deref(),
            Candidate::Expense(_) => None,
        }
    }

    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Candidate::Order(draft) => draft.occurred_at,
            Candidate::Purchase(draft) => draft.occurred_at,
            Candidate::Bill(draft) => draft.occurred_at,
            Candidate::Hiring(draft) => draft.occurred_at,
            Candidate::Expense(draft) => draft.occurred_at,
        }
    }

    /// Slot holding the tax references; `None` for kinds without them.
    pub fn tax_ids(&self) -> Option<&IdentifierList> {
        match self {
            Candidate::Order(draft) => Some(&draft.tax_ids),
            Candidate::Purchase(draft) => Some(&draft.tax_ids),
            Candidate::Bill(draft) => Some(&draft.tax_ids),
            Candidate::Hiring(draft) => Some(&draft.tax_ids),
            Candidate::Expense(_) => None,
        }
    }

    pub(crate) fn tax_ids_mut(&mut self) -> Option<&mut IdentifierList> {
        match self {
            Candidate::Order(draft) => Some(&mut draft.tax_ids),
            Candidate::Purchase(draft) => Some(&mut draft.tax_ids),
            Candidate::Bill(draft) => Some(&mut draft.tax_ids),
            Candidate::Hiring(draft) => Some(&mut draft.tax_ids),
            Candidate::Expense(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_label_or_collection() {
        assert_eq!(RecordKind::parse("bills"), Some(RecordKind::Bill));
        assert_eq!(RecordKind::parse(" Hiring "), Some(RecordKind::Hiring));
        assert_eq!(RecordKind::parse("invoices"), None);
    }

    #[test]
    fn expenses_carry_no_tax_slot() {
        assert!(Candidate::Expense(ExpenseDraft::default()).tax_ids().is_none());
        assert_eq!(
            Candidate::Order(OrderDraft::default()).tax_ids(),
            Some(&None)
        );
    }
}
