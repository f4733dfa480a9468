use chrono::{DateTime, Utc};

use super::issue::{Issue, IssueKind};
use super::result::ValidationResult;

pub const CURRENCY_CODE_LEN: usize = 3;

/// Required text: present, not blank, and within `max_len` characters when bounded.
pub fn require_text(
    result: &mut ValidationResult,
    field: &str,
    value: Option<&str>,
    max_len: Option<usize>,
) {
    match value {
        Some(text) if !text.trim().is_empty() => {
            if let Some(max_len) = max_len {
                limit_text(result, field, Some(text), max_len);
            }
        }
        _ => {
            result.push(Issue::error(
                IssueKind::Shape,
                field,
                format!("{field} is required"),
            ));
        }
    }
}

/// Optional text bounded by `max_len` characters.
pub fn limit_text(result: &mut ValidationResult, field: &str, value: Option<&str>, max_len: usize) {
    let Some(text) = value else {
        return;
    };
    if text.chars().count() > max_len {
        result.push(
            Issue::error(
                IssueKind::Shape,
                field,
                format!("{field} must be <= {max_len} chars"),
            )
            .with_meta("maxLen", max_len),
        );
    }
}

/// ISO-4217 style code: exactly three ASCII letters.
pub fn check_currency(result: &mut ValidationResult, field: &str, value: Option<&str>) {
    let valid = value
        .map(|code| {
            code.chars().count() == CURRENCY_CODE_LEN
                && code.chars().all(|c| c.is_ascii_alphabetic())
        })
        .unwrap_or(false);

    if !valid {
        result.push(Issue::error(
            IssueKind::Shape,
            field,
            format!("{field} must be ISO-4217 (3 letters)"),
        ));
    }
}

/// Required monetary amount in minor units that must not be negative.
pub fn require_non_negative(result: &mut ValidationResult, field: &str, amount: Option<i64>) {
    if amount.map(|value| value < 0).unwrap_or(true) {
        push_negative(result, field);
    }
}

/// Optional monetary amount that must not be negative when present.
pub fn check_non_negative(result: &mut ValidationResult, field: &str, amount: Option<i64>) {
    if amount.map(|value| value < 0).unwrap_or(false) {
        push_negative(result, field);
    }
}

pub fn require_instant(result: &mut ValidationResult, field: &str, value: Option<DateTime<Utc>>) {
    if value.is_none() {
        result.push(Issue::error(
            IssueKind::Shape,
            field,
            format!("{field} is required"),
        ));
    }
}

/// `later` must not precede `earlier`; skipped when either side is missing.
pub fn check_order(
    result: &mut ValidationResult,
    (earlier_field, earlier): (&str, Option<DateTime<Utc>>),
    (later_field, later): (&str, Option<DateTime<Utc>>),
) {
    let (Some(earlier), Some(later)) = (earlier, later) else {
        return;
    };

    if later < earlier {
        result.push(
            Issue::error(
                IssueKind::Shape,
                later_field,
                format!("{later_field} cannot be before {earlier_field}"),
            )
            .with_meta(later_field, later.to_rfc3339())
            .with_meta(earlier_field, earlier.to_rfc3339()),
        );
    }
}

fn push_negative(result: &mut ValidationResult, field: &str) {
    result.push(Issue::error(
        IssueKind::Shape,
        field,
        format!("{field} must be >= 0"),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn blank_required_text_is_rejected() {
        let mut result = ValidationResult::new();
        require_text(&mut result, "code", Some("   "), Some(64));
        require_text(&mut result, "role", None, None);

        let messages: Vec<_> = result.issues().iter().map(|i| i.message()).collect();
        assert_eq!(messages, vec!["code is required", "role is required"]);
    }

    #[test]
    fn overlong_text_reports_the_bound() {
        let mut result = ValidationResult::new();
        require_text(&mut result, "role", Some("x".repeat(121).as_str()), Some(120));
        limit_text(&mut result, "vendor", Some("y".repeat(180).as_str()), 180);

        assert_eq!(result.len(), 1);
        let issue = &result.issues()[0];
        assert_eq!(issue.message(), "role must be <= 120 chars");
        assert_eq!(issue.meta("maxLen").and_then(|v| v.as_u64()), Some(120));
    }

    #[test]
    fn currency_needs_three_letters() {
        for (code, ok) in [
            (Some("EUR"), true),
            (Some("usd"), true),
            (Some("EU"), false),
            (Some("EURO"), false),
            (Some("E1R"), false),
            (None, false),
        ] {
            let mut result = ValidationResult::new();
            check_currency(&mut result, "currency", code);
            assert_eq!(result.is_empty(), ok, "currency {code:?}");
        }
    }

    #[test]
    fn amounts_must_not_be_negative() {
        let mut result = ValidationResult::new();
        require_non_negative(&mut result, "total", Some(0));
        check_non_negative(&mut result, "total", None);
        assert!(result.is_empty());

        require_non_negative(&mut result, "total", None);
        require_non_negative(&mut result, "amount", Some(-1));
        check_non_negative(&mut result, "grossSalary", Some(-5));
        assert_eq!(result.errors().count(), 3);
    }

    #[test]
    fn ordering_violation_names_both_fields() {
        let start = Utc
            .with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
            .single()
            .expect("valid instant");
        let mut result = ValidationResult::new();

        check_order(
            &mut result,
            ("startAt", Some(start)),
            ("endAt", Some(start - Duration::days(1))),
        );
        check_order(&mut result, ("startAt", Some(start)), ("endAt", Some(start)));
        check_order(&mut result, ("startAt", None), ("endAt", Some(start)));

        assert_eq!(result.len(), 1);
        let issue = &result.issues()[0];
        assert_eq!(issue.field(), "endAt");
        assert_eq!(issue.message(), "endAt cannot be before startAt");
        assert!(issue.meta("startAt").is_some());
        assert!(issue.meta("endAt").is_some());
    }
}
