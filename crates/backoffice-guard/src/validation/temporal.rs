use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use super::issue::{Issue, IssueKind};
use super::result::ValidationResult;

pub const DEFAULT_MAX_AGE_DAYS: i64 = 3650;
pub const DEFAULT_FUTURE_SKEW_MINUTES: i64 = 5;

/// Source of the current instant; injected so validation stays deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Acceptability window for an occurrence instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalPolicy {
    business_days_only: bool,
    max_age: Duration,
    future_skew: Duration,
}

impl TemporalPolicy {
    /// Negative windows are clamped to zero.
    pub fn new(business_days_only: bool, max_age: Duration, future_skew: Duration) -> Self {
        Self {
            business_days_only,
            max_age: max_age.max(Duration::zero()),
            future_skew: future_skew.max(Duration::zero()),
        }
    }

    pub fn business_days_only(&self) -> bool {
        self.business_days_only
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn future_skew(&self) -> Duration {
        self.future_skew
    }

    /// ISO-8601 rendering of `max_age` used in issue metadata.
    pub fn max_age_label(&self) -> String {
        iso_duration(self.max_age)
    }
}

impl Default for TemporalPolicy {
    fn default() -> Self {
        Self::new(
            true,
            Duration::days(DEFAULT_MAX_AGE_DAYS),
            Duration::minutes(DEFAULT_FUTURE_SKEW_MINUTES),
        )
    }
}

pub fn is_future(at: DateTime<Utc>, now: DateTime<Utc>, skew: Duration) -> bool {
    now.checked_add_signed(skew)
        .map(|limit| at > limit)
        .unwrap_or(false)
}

pub fn is_too_old(at: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    now.checked_sub_signed(max_age)
        .map(|floor| at < floor)
        .unwrap_or(false)
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Run the required, future, age and business-day checks for one instant field.
///
/// The clock is read once so every check sees the same reference instant.
pub fn check_occurred_at(
    result: &mut ValidationResult,
    field: &str,
    occurred_at: Option<DateTime<Utc>>,
    clock: &dyn Clock,
    policy: &TemporalPolicy,
) {
    let Some(at) = occurred_at else {
        result.push(Issue::error(
            IssueKind::Shape,
            field,
            format!("{field} is required"),
        ));
        return;
    };

    let now = clock.now();

    if is_future(at, now, policy.future_skew) {
        result.push(Issue::error(
            IssueKind::Temporal,
            field,
            format!("{field} cannot be in the future"),
        ));
    }

    if is_too_old(at, now, policy.max_age) {
        result.push(
            Issue::error(
                IssueKind::Temporal,
                field,
                format!("{field} exceeds maxAge"),
            )
            .with_meta("maxAge", policy.max_age_label()),
        );
    }

    if policy.business_days_only {
        let date = at.date_naive();
        if !is_business_day(date) {
            result.push(
                Issue::warn(
                    IssueKind::Temporal,
                    field,
                    format!("{field} must be a business day (Mon-Fri)"),
                )
                .with_meta("date", date.format("%Y-%m-%d").to_string()),
            );
        }
    }
}

pub(crate) fn iso_duration(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds == 0 {
        return "PT0S".to_string();
    }
    if seconds % 86_400 == 0 {
        return format!("P{}D", seconds / 86_400);
    }
    if seconds % 60 == 0 {
        return format!("PT{}M", seconds / 60);
    }
    format!("PT{seconds}S")
}
