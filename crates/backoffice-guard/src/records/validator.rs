use std::sync::Arc;

use super::domain::{BillDraft, Candidate, ExpenseDraft, HiringDraft, OrderDraft, PurchaseDraft};
use super::policies::{KindPolicies, KindPolicy};
use crate::validation::fields::{
    check_currency, check_non_negative, check_order, limit_text, require_instant,
    require_non_negative, require_text,
};
use crate::validation::{
    check_existence, check_identifier_shape, check_occurred_at, check_reference, Clock,
    ExistenceChecker, ValidationResult,
};

pub const CODE_MAX_LEN: usize = 64;
pub const NAME_MAX_LEN: usize = 180;
pub const ROLE_MAX_LEN: usize = 120;

/// Storage seams consulted while validating; absent checkers skip the lookup.
#[derive(Clone, Copy, Default)]
pub struct ReferenceCheckers<'a> {
    pub taxes: Option<&'a dyn ExistenceChecker>,
    pub expense_categories: Option<&'a dyn ExistenceChecker>,
}

impl<'a> ReferenceCheckers<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_taxes(mut self, checker: &'a dyn ExistenceChecker) -> Self {
        self.taxes = Some(checker);
        self
    }

    pub fn with_expense_categories(mut self, checker: &'a dyn ExistenceChecker) -> Self {
        self.expense_categories = Some(checker);
        self
    }
}

/// Composes the shared checks for each record kind under a policy table.
///
/// Holds only read-only configuration, so one instance serves every request.
#[derive(Debug, Clone, Default)]
pub struct EntityValidator {
    policies: Arc<KindPolicies>,
}

impl EntityValidator {
    pub fn new(policies: KindPolicies) -> Self {
        Self {
            policies: Arc::new(policies),
        }
    }

    pub fn policies(&self) -> &KindPolicies {
        &self.policies
    }

    pub fn validate(
        &self,
        candidate: &Candidate,
        clock: &dyn Clock,
        checkers: ReferenceCheckers<'_>,
    ) -> ValidationResult {
        let policy = self.policies.for_kind(candidate.kind());
        let mut result = ValidationResult::new();

        match candidate {
            Candidate::Order(draft) => order_shape(&mut result, draft),
            Candidate::Purchase(draft) => purchase_shape(&mut result, draft),
            Candidate::Bill(draft) => bill_shape(&mut result, draft),
            Candidate::Hiring(draft) => hiring_shape(&mut result, draft),
            Candidate::Expense(draft) => expense_shape(&mut result, draft),
        }

        check_occurred_at(
            &mut result,
            "occurredAt",
            candidate.occurred_at(),
            clock,
            &policy.occurred_at,
        );

        check_references(&mut result, candidate, policy, checkers);

        match candidate {
            Candidate::Bill(draft) => check_order(
                &mut result,
                ("occurredAt", draft.occurred_at),
                ("dueAt", draft.due_at),
            ),
            Candidate::Hiring(draft) => {
                check_order(
                    &mut result,
                    ("occurredAt", draft.occurred_at),
                    ("startAt", draft.start_at),
                );
                check_order(
                    &mut result,
                    ("startAt", draft.start_at),
                    ("endAt", draft.end_at),
                );
            }
            _ => {}
        }

        result
    }
}

fn check_references(
    result: &mut ValidationResult,
    candidate: &Candidate,
    policy: &KindPolicy,
    checkers: ReferenceCheckers<'_>,
) {
    if let Candidate::Expense(draft) = candidate {
        check_reference(
            result,
            "categoryId",
            draft.category_id,
            checkers.expense_categories,
        );
        return;
    }

    let (Some(ids), Some(set_policy)) = (candidate.tax_ids(), policy.tax_ids.as_ref()) else {
        return;
    };

    check_identifier_shape(result, "taxIds", ids.as_deref(), set_policy);

    if let (Some(ids), Some(checker)) = (ids.as_deref(), checkers.taxes) {
        check_existence(result, "taxIds", ids, checker);
    }
}

fn priced_shape(
    result: &mut ValidationResult,
    code: Option<&str>,
    currency: Option<&str>,
    total: Option<i64>,
) {
    require_text(result, "code", code, Some(CODE_MAX_LEN));
    check_currency(result, "currency", currency);
    require_non_negative(result, "total", total);
}

fn order_shape(result: &mut ValidationResult, draft: &OrderDraft) {
    priced_shape(
        result,
        draft.code.as_deref(),
        draft.currency.as_deref(),
        draft.total,
    );
}

fn purchase_shape(result: &mut ValidationResult, draft: &PurchaseDraft) {
    priced_shape(
        result,
        draft.code.as_deref(),
        draft.currency.as_deref(),
        draft.total,
    );
    limit_text(result, "vendor", draft.vendor.as_deref(), NAME_MAX_LEN);
}

fn bill_shape(result: &mut ValidationResult, draft: &BillDraft) {
    priced_shape(
        result,
        draft.code.as_deref(),
        draft.currency.as_deref(),
        draft.total,
    );
    limit_text(result, "vendor", draft.vendor.as_deref(), NAME_MAX_LEN);
    limit_text(result, "payee", draft.payee.as_deref(), NAME_MAX_LEN);
}

fn hiring_shape(result: &mut ValidationResult, draft: &HiringDraft) {
    require_text(result, "code", draft.code.as_deref(), Some(CODE_MAX_LEN));
    require_text(
        result,
        "employeeName",
        draft.employee_name.as_deref(),
        Some(NAME_MAX_LEN),
    );
    require_text(result, "role", draft.role.as_deref(), Some(ROLE_MAX_LEN));
    require_instant(result, "startAt", draft.start_at);
    check_currency(result, "currency", draft.currency.as_deref());
    require_non_negative(result, "grossSalary", draft.gross_salary);
    check_non_negative(result, "total", draft.total);
    limit_text(
        result,
        "candidateName",
        draft.candidate_name.as_deref(),
        NAME_MAX_LEN,
    );
}

fn expense_shape(result: &mut ValidationResult, draft: &ExpenseDraft) {
    check_currency(result, "currency", draft.currency.as_deref());
    require_non_negative(result, "amount", draft.amount);
    limit_text(result, "vendor", draft.vendor.as_deref(), NAME_MAX_LEN);
}
