use crate::infra::{parse_instant, parse_kind, CatalogMode, InMemoryCatalog};
use backoffice_guard::config::AppConfig;
use backoffice_guard::error::AppError;
use backoffice_guard::records::{decode_candidate, EntityValidator, RecordKind, ReferenceCheckers};
use backoffice_guard::validation::{FixedClock, Issue, ValidationResult};
use chrono::{DateTime, Utc};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Record kind of the candidate (order, purchase, bill, hiring, expense)
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: RecordKind,
    /// JSON file holding the candidate draft
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Reference instant for temporal checks (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Tax id treated as existing; enables the tax existence check
    #[arg(long = "known-tax-id")]
    pub(crate) known_tax_ids: Vec<Uuid>,
    /// Expense category id treated as existing; enables the category check
    #[arg(long = "known-category-id")]
    pub(crate) known_category_ids: Vec<Uuid>,
    /// Print the issue payload as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

/// Validate a candidate file offline. Returns whether the write would be accepted.
pub(crate) fn run_check(args: CheckArgs) -> Result<bool, AppError> {
    let CheckArgs {
        kind,
        file,
        now,
        known_tax_ids,
        known_category_ids,
        json,
    } = args;

    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&file)?;
    let body = serde_json::from_str(&raw)?;

    let validator = EntityValidator::new(config.validation.policies());
    let clock = FixedClock(now.unwrap_or_else(Utc::now));
    let taxes = InMemoryCatalog::checker(&known_tax_ids, CatalogMode::Enumerating);
    let categories = InMemoryCatalog::checker(&known_category_ids, CatalogMode::Counting);

    let mut checkers = ReferenceCheckers::none();
    if let Some(checker) = taxes.as_deref() {
        checkers = checkers.with_taxes(checker);
    }
    if let Some(checker) = categories.as_deref() {
        checkers = checkers.with_expense_categories(checker);
    }

    let result = match decode_candidate(kind, body) {
        Ok(decoded) => {
            let validation = validator.validate(decoded.candidate(), &clock, checkers);
            decoded.reconcile(validation)
        }
        Err(rejection) => {
            let mut result = ValidationResult::new();
            result.extend(rejection.into_issues());
            result
        }
    };
    let accepted = !result.has_errors();

    if json {
        let payload = json!({ "accepted": accepted, "issues": result.issues() });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", render_report(kind, &file, &result));
    }

    Ok(accepted)
}

fn render_report(kind: RecordKind, file: &std::path::Path, result: &ValidationResult) -> String {
    let verdict = if result.has_errors() {
        "REJECTED"
    } else {
        "ACCEPTED"
    };
    let mut lines = vec![format!(
        "{} {} ({}): {} error(s), {} warning(s)",
        verdict,
        kind.label(),
        file.display(),
        result.errors().count(),
        result.warnings().count()
    )];
    lines.extend(result.issues().iter().map(render_issue));
    lines.join("\n")
}

fn render_issue(issue: &Issue) -> String {
    let mut line = format!(
        "  {:<5} {:<14} {}",
        issue.severity().label(),
        issue.field(),
        issue.message()
    );
    if !issue.metadata().is_empty() {
        let context: Vec<_> = issue
            .metadata()
            .iter()
            .map(|(key, value)| match value.as_str() {
                Some(text) => format!("{key}={text}"),
                None => format!("{key}={value}"),
            })
            .collect();
        line.push_str(&format!(" [{}]", context.join(", ")));
    }
    line
}
