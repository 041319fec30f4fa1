// File: ./src/term.rs
// Term calendar: which Monday opens week 1, and the dates that follow from it.
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use strum::{EnumIter, IntoEnumIterator};

/// Values the term-start resolution reads from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSettings {
    pub term_start_date: String,
    /// Legacy fallback: calendar year and the week-of-year teaching starts in.
    pub year: i32,
    pub begin_week: u32,
}

/// How the term start date was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStartSource {
    Configured,
    LegacyWeekRule,
    CurrentWeek,
}

/// Resolves the Monday of week 1.
///
/// Tries the configured ISO date first, then the legacy "year + begin week"
/// rule, and finally the Monday of `today`'s week.
pub fn resolve_term_start(settings: &TermSettings, today: NaiveDate) -> (NaiveDate, TermStartSource) {
    if let Ok(d) = NaiveDate::parse_from_str(settings.term_start_date.trim(), "%Y-%m-%d") {
        return (d, TermStartSource::Configured);
    }

    if let Some(d) = legacy_week_monday(settings.year, settings.begin_week) {
        log::warn!(
            "Invalid term_start_date '{}', falling back to legacy rule: {}",
            settings.term_start_date,
            d
        );
        return (d, TermStartSource::LegacyWeekRule);
    }

    let monday = monday_of(today);
    log::warn!(
        "Neither term_start_date nor the legacy rule is usable, falling back to this week's Monday: {}",
        monday
    );
    (monday, TermStartSource::CurrentWeek)
}

/// Monday of week `begin_week - 1` of `year`, counting weeks the way
/// `%W` does (week 1 starts on the year's first Monday).
fn legacy_week_monday(year: i32, begin_week: u32) -> Option<NaiveDate> {
    let week = begin_week.checked_sub(1)?;
    if week > 53 {
        return None;
    }
    let first_monday = NaiveDate::from_weekday_of_month_opt(year, 1, Weekday::Mon, 1)?;
    Some(first_monday + Duration::days(7 * (i64::from(week) - 1)))
}

pub fn monday_of(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Date of `weekday` (1 = Monday) in term week `week` (1-based).
pub fn lesson_date(term_start: NaiveDate, week: u32, weekday: u32) -> NaiveDate {
    let offset = (i64::from(week) - 1) * 7 + (i64::from(weekday) - 1);
    term_start + Duration::days(offset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum DayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayName {
    pub fn label(self) -> &'static str {
        match self {
            DayName::Monday => "周一",
            DayName::Tuesday => "周二",
            DayName::Wednesday => "周三",
            DayName::Thursday => "周四",
            DayName::Friday => "周五",
            DayName::Saturday => "周六",
            DayName::Sunday => "周日",
        }
    }

    /// 1-based weekday number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }
}

/// Column headers for weekdays 1..=7.
pub fn weekday_labels() -> Vec<&'static str> {
    DayName::iter().map(DayName::label).collect()
}

/// The seven dates of week 1, one line each.
pub fn week_mapping_preview(term_start: NaiveDate) -> Vec<String> {
    DayName::iter()
        .map(|day| {
            let date = lesson_date(term_start, 1, day.number());
            format!("第1周{}: {}", day.label(), date.format("%Y%m%d"))
        })
        .collect()
}
