use crate::locale::{DateOrder, FormatSettings, TimeFormat};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// A separator as a literal in a chrono format string.
fn literal(separator: char) -> String {
    match separator {
        '%' => "%%".to_string(),
        other => other.to_string(),
    }
}

/// The chrono pattern for the configured date order and separator.
fn date_pattern(settings: &FormatSettings) -> String {
    let sep = literal(settings.date_separator);
    match settings.date_order {
        DateOrder::MonthDayYear => format!("%m{sep}%d{sep}%Y"),
        DateOrder::DayMonthYear => format!("%d{sep}%m{sep}%Y"),
        DateOrder::YearMonthDay => format!("%Y{sep}%m{sep}%d"),
    }
}

fn time_pattern(settings: &FormatSettings) -> String {
    let sep = literal(settings.time_separator);
    match settings.time_format {
        TimeFormat::TwentyFourHour => format!("%H{sep}%M"),
        TimeFormat::TwelveHour => format!("%I{sep}%M"),
    }
}

pub fn format_date(date: NaiveDate, settings: &FormatSettings) -> String {
    date.format(&date_pattern(settings)).to_string()
}

/// The twelve hour clock appends the locale's own am/pm text.
pub fn format_time(time: NaiveTime, settings: &FormatSettings) -> String {
    let clock = time.format(&time_pattern(settings)).to_string();
    match settings.time_format {
        TimeFormat::TwentyFourHour => clock,
        TimeFormat::TwelveHour => {
            let suffix = if time.hour12().0 { &settings.pm_text } else { &settings.am_text };
            clock + suffix
        }
    }
}

pub fn format_datetime(value: NaiveDateTime, settings: &FormatSettings) -> String {
    format!(
        "{} {}",
        format_date(value.date(), settings),
        format_time(value.time(), settings)
    )
}

pub fn parse_date(text: &str, settings: &FormatSettings) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), &date_pattern(settings)).ok()
}

/// Strips a trailing am/pm marker, matched case-insensitively.
fn split_meridiem<'t>(text: &'t str, settings: &FormatSettings) -> (&'t str, Option<bool>) {
    let lower = text.to_lowercase();
    for (marker, pm) in [(&settings.pm_text, true), (&settings.am_text, false)] {
        if !marker.is_empty() && lower.ends_with(&marker.to_lowercase()) {
            if let Some(body) = text.get(..text.len().saturating_sub(marker.len())) {
                return (body, Some(pm));
            }
        }
    }
    (text, None)
}

/// Parses a time in either clock format; a trailing AM/PM marker wins over
/// the configured format.
pub fn parse_time(text: &str, settings: &FormatSettings) -> Option<NaiveTime> {
    let (body, meridiem) = split_meridiem(text.trim(), settings);
    let pattern = format!("%H{}%M", literal(settings.time_separator));
    let time = NaiveTime::parse_from_str(body.trim(), &pattern).ok()?;
    let hour = match meridiem {
        Some(true) if time.hour() < 12 => time.hour() + 12,
        Some(false) if time.hour() == 12 => 0,
        _ => time.hour(),
    };
    time.with_hour(hour)
}

/// Parses `<date> <time>`; a bare date resolves to midnight.
pub fn parse_datetime(text: &str, settings: &FormatSettings) -> Option<NaiveDateTime> {
    let text = text.trim();
    match text.split_once(' ') {
        Some((date, time)) => Some(parse_date(date, settings)?.and_time(parse_time(time, settings)?)),
        None => Some(parse_date(text, settings)?.and_time(NaiveTime::MIN)),
    }
}
