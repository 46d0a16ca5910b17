use crate::creation::store::PollSettings;
use crate::datetime::{TimeRemaining, time_remaining};
use crate::localization::Localizer;
use crate::models::Visibility;
use std::fmt::Display;

pub fn due_in(remaining: &TimeRemaining) -> Option<(&'static str, Vec<i64>)> {
    let pick = |value: i64, singular: &'static str, plural: &'static str| {
        (if value == 1 { singular } else { plural }, vec![value])
    };

    let due = if remaining.years > 0 {
        pick(remaining.years, "DueInYear", "DueInYears")
    } else if remaining.months > 0 {
        pick(remaining.months, "DueInMonth", "DueInMonths")
    } else if remaining.weeks > 0 {
        pick(remaining.weeks, "DueInWeek", "DueInWeeks")
    } else if remaining.days > 0 {
        pick(remaining.days, "DueInDay", "DueInDays")
    } else if remaining.hours > 0 && remaining.minutes > 0 {
        let key = match (remaining.hours == 1, remaining.minutes == 1) {
            (true, true) => "DueInHourAndMinute",
            (true, false) => "DueInHourAndMinutes",
            (false, true) => "DueInHoursAndMinute",
            (false, false) => "DueInHoursAndMinutes",
        };
        (key, vec![remaining.hours, remaining.minutes])
    } else if remaining.hours > 0 {
        pick(remaining.hours, "DueInHour", "DueInHours")
    } else if remaining.minutes > 0 {
        pick(remaining.minutes, "DueInMinute", "DueInMinutes")
    } else {
        return None;
    };
    Some(due)
}

pub fn settings_summary(settings: &PollSettings, strings: &Localizer, now_ms: i64) -> String {
    let mut parts = Vec::new();

    let remaining = time_remaining(settings.due_date, now_ms);
    if let Some((key, values)) = due_in(&remaining) {
        let args: Vec<&dyn Display> = values.iter().map(|v| v as &dyn Display).collect();
        parts.push(strings.format(key, &args));
    }

    parts.push(match settings.result_visibility {
        Visibility::All => strings.get("ResultsVisibilitySettingsSummaryEveryone"),
        Visibility::Sender => strings.get("ResultsVisibilitySettingsSummarySenderOnly"),
    });

    parts.join(". ")
}
