use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn default_expiry(now: DateTime<Utc>, active_days: i64) -> DateTime<Utc> {
    let date = now + Duration::days(active_days);
    let date = date
        .with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(date);
    if date.minute() > 30 {
        let on_the_hour = date.with_minute(0).unwrap_or(date);
        on_the_hour + Duration::hours(1)
    } else {
        date.with_minute(30).unwrap_or(date)
    }
}

// Breakdown of the distance between two instants. Every unit is taken
// modulo the next larger one, with months as 30 days and years as 365.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRemaining {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

pub fn time_remaining(deadline_ms: i64, now_ms: i64) -> TimeRemaining {
    let diff = (deadline_ms - now_ms).abs();
    TimeRemaining {
        minutes: (diff % HOUR_MS) / MINUTE_MS,
        hours: (diff % DAY_MS) / HOUR_MS,
        days: (diff % WEEK_MS) / DAY_MS,
        weeks: (diff % MONTH_MS) / WEEK_MS,
        months: (diff % YEAR_MS) / MONTH_MS,
        years: diff / YEAR_MS,
    }
}

pub fn format_date(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(date) => date.format("%B %-d, %Y %-I:%M %p").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn default_expiry_rounds_to_half_hour() {
        assert_eq!(default_expiry(at(2026, 1, 1, 9, 10, 42), 7), at(2026, 1, 8, 9, 30, 0));
        assert_eq!(default_expiry(at(2026, 1, 1, 9, 30, 5), 7), at(2026, 1, 8, 9, 30, 0));
        assert_eq!(default_expiry(at(2026, 1, 1, 9, 45, 0), 7), at(2026, 1, 8, 10, 0, 0));
        assert_eq!(default_expiry(at(2026, 1, 1, 23, 50, 0), 0), at(2026, 1, 2, 0, 0, 0));
    }

    #[test]
    fn breakdown_uses_modular_units() {
        let now = 0;
        let remaining = time_remaining(HOUR_MS + MINUTE_MS, now);
        assert_eq!((remaining.hours, remaining.minutes), (1, 1));

        let remaining = time_remaining(9 * DAY_MS + 2 * HOUR_MS, now);
        assert_eq!(remaining.weeks, 1);
        assert_eq!(remaining.days, 2);
        assert_eq!(remaining.hours, 2);

        let remaining = time_remaining(now, 400 * DAY_MS);
        assert_eq!(remaining.years, 1);
        assert_eq!(remaining.months, 1);
    }

    #[test]
    fn formats_long_dates() {
        let ms = at(2026, 3, 4, 17, 5, 0).timestamp_millis();
        assert_eq!(format_date(ms), "March 4, 2026 5:05 PM");
    }
}
