//! Expiration evaluation for time-bound manual answers.
//!
//! A narrower instance of the condition-evaluator idea: a single
//! three-way decision against an expiration timestamp, sharing the
//! severity vocabulary and output contract of the other evaluators.
//!
//! "Now" is read once per run by the caller and held constant; the
//! engine itself never touches the clock.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Time};

use crate::types::Severity;

/// Classify an expiration timestamp against a constant `now`.
///
/// `RED` when the answer has expired, `YELLOW` when it expires within
/// the reminder window, `GREEN` otherwise.
pub fn classify(expiry: OffsetDateTime, now: OffsetDateTime, reminder: Duration) -> Severity {
    if now >= expiry {
        Severity::Red
    } else if expiry - now <= reminder {
        Severity::Yellow
    } else {
        Severity::Green
    }
}

/// Parse an expiration timestamp: RFC 3339, or a bare `YYYY-MM-DD`
/// date taken as midnight UTC.
pub fn parse_expiry(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(raw, &format).ok()?;
    Some(date.with_time(Time::MIDNIGHT).assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const WINDOW: Duration = Duration::days(14);

    #[test]
    fn expired_yesterday_is_red() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let expiry = datetime!(2026-08-25 12:00 UTC);
        assert_eq!(classify(expiry, now, WINDOW), Severity::Red);
    }

    #[test]
    fn expiring_in_ten_days_is_yellow() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let expiry = datetime!(2026-09-05 12:00 UTC);
        assert_eq!(classify(expiry, now, WINDOW), Severity::Yellow);
    }

    #[test]
    fn expiring_in_twenty_days_is_green() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let expiry = datetime!(2026-09-15 12:00 UTC);
        assert_eq!(classify(expiry, now, WINDOW), Severity::Green);
    }

    #[test]
    fn expiring_exactly_now_is_red() {
        let now = datetime!(2026-08-26 12:00 UTC);
        assert_eq!(classify(now, now, WINDOW), Severity::Red);
    }

    #[test]
    fn window_boundary_is_yellow() {
        let now = datetime!(2026-08-26 12:00 UTC);
        let expiry = now + WINDOW;
        assert_eq!(classify(expiry, now, WINDOW), Severity::Yellow);
    }

    #[test]
    fn parse_rfc3339_and_bare_date() {
        assert_eq!(
            parse_expiry("2026-09-05T10:30:00Z"),
            Some(datetime!(2026-09-05 10:30 UTC))
        );
        assert_eq!(
            parse_expiry("2026-09-05"),
            Some(datetime!(2026-09-05 0:00 UTC))
        );
        assert_eq!(parse_expiry("05.09.2026"), None);
    }
}
