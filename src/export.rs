// File: ./src/export.rs
//! Renderers that consume the normalized events.
//!
//! The calendar writer emits one `VEVENT` per [`CourseEvent`], duplicates
//! included. The week charts read the [`Grid`], where each cell shows its
//! entries sorted and deduplicated.
use crate::model::{CourseEvent, Grid, MAX_WEEK};
use crate::sheet::{PeriodClock, PeriodSpan};
use crate::term::{DayName, lesson_date, weekday_labels};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use icalendar::{Alarm, Calendar, CalendarDateTime, Component, Event, EventLike};
use strum::IntoEnumIterator;

/// Which clock an event's start and end come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventTiming {
    /// The periods named by the event's slot label.
    #[default]
    SlotPeriods,
    /// The sheet rows the event was read from. Used when repeated rows are
    /// kept apart, so each row becomes its own period-long event.
    SheetRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    pub timezone: String,
    pub alarm_minutes: u32,
    pub name: String,
    pub timing: EventTiming,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            timezone: "Asia/Shanghai".to_string(),
            alarm_minutes: 5,
            name: "课表".to_string(),
            timing: EventTiming::default(),
        }
    }
}

/// Clock span of an event. The source picked by `timing` is tried first and
/// the other one fills in when it does not resolve.
pub fn event_span(event: &CourseEvent, clock: &PeriodClock, timing: EventTiming) -> Option<PeriodSpan> {
    let by_slot = || {
        event
            .slot
            .period_bounds()
            .and_then(|(lo, hi)| clock.between(lo, hi))
    };
    let by_rows = || clock.rows(event.rows.0, event.rows.1);
    match timing {
        EventTiming::SlotPeriods => by_slot().or_else(by_rows),
        EventTiming::SheetRows => by_rows().or_else(by_slot),
    }
}

fn build_event(
    event: &CourseEvent,
    settings: &CalendarSettings,
    date: NaiveDate,
    (start, end): PeriodSpan,
) -> Event {
    let mut ev = Event::new();
    ev.uid(&uuid::Uuid::new_v4().to_string())
        .summary(&event.summary())
        .location(&event.place)
        .starts(CalendarDateTime::WithTimezone {
            date_time: date.and_time(start),
            tzid: settings.timezone.clone(),
        })
        .ends(CalendarDateTime::WithTimezone {
            date_time: date.and_time(end),
            tzid: settings.timezone.clone(),
        });
    if let Some(teacher) = &event.teacher {
        ev.description(teacher);
    }
    if settings.alarm_minutes > 0 {
        ev.alarm(Alarm::audio(-Duration::minutes(i64::from(
            settings.alarm_minutes,
        ))));
    }
    ev.done()
}

/// Builds the calendar file. Events whose clock time cannot be resolved
/// are left out with a warning.
pub fn to_ics_string(
    events: &[CourseEvent],
    settings: &CalendarSettings,
    term_start: NaiveDate,
    clock: &PeriodClock,
) -> String {
    let mut calendar = Calendar::new();
    calendar.name(&settings.name).timezone(settings.timezone.as_str());

    let mut skipped = 0usize;
    for event in events {
        let Some(span) = event_span(event, clock, settings.timing) else {
            skipped += 1;
            log::warn!(
                "No clock time for '{}' slot {} (week {}, day {})",
                event.name,
                event.slot,
                event.week,
                event.weekday
            );
            continue;
        };
        let date = lesson_date(term_start, event.week, event.weekday);
        log::debug!("{} {} {} {}-{}", event.name, event.place, date, span.0, span.1);
        calendar.push(build_event(event, settings, date, span));
    }
    if skipped > 0 {
        log::warn!("Skipped {} events without clock times", skipped);
    }

    calendar.done().to_string()
}

/// Week chart as CSV: one row per (week, slot), one column per weekday.
/// Starts with a UTF-8 byte order mark so spreadsheet apps detect UTF-8.
pub fn week_chart_csv(grid: &Grid) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["周次", "节次"];
    header.extend(weekday_labels());
    writer.write_record(&header)?;

    for week in 1..=MAX_WEEK {
        for slot in grid.slots() {
            let mut record = vec![week.to_string(), slot.to_string()];
            record.extend(DayName::iter().map(|d| grid.cell_text(week, slot, d.number())));
            writer.write_record(&record)?;
        }
    }

    let body = writer.into_inner()?;
    let mut out = "\u{feff}".as_bytes().to_vec();
    out.extend(body);
    Ok(out)
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Week chart as Markdown, one table per week with dated column headers.
pub fn week_chart_markdown(grid: &Grid, term_start: NaiveDate) -> String {
    let mut out = String::from("# 16周课表图表\n");

    for week in 1..=MAX_WEEK {
        out.push_str(&format!("\n## 第{}周\n\n", week));
        if grid.slots().is_empty() {
            out.push_str("(无课程)\n");
            continue;
        }

        let headers: Vec<String> = DayName::iter()
            .map(|d| {
                let date = lesson_date(term_start, week, d.number());
                format!("{} {}", d.label(), date.format("%m/%d"))
            })
            .collect();
        out.push_str(&format!("| 节次 | {} |\n", headers.join(" | ")));
        out.push_str(&format!("| {} |\n", vec!["---"; headers.len() + 1].join(" | ")));

        for slot in grid.slots() {
            let cells: Vec<String> = DayName::iter()
                .map(|d| {
                    grid.cell_entries(week, slot, d.number())
                        .into_iter()
                        .map(escape_markdown_cell)
                        .collect::<Vec<_>>()
                        .join("<br>")
                })
                .collect();
            out.push_str(&format!("| {} | {} |\n", slot, cells.join(" | ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SlotLabel;
    use crate::sheet::{MemoryGrid, SheetLayout};

    fn clock() -> PeriodClock {
        let mut grid = MemoryGrid::default();
        let times = ["08:00-08:45", "08:50-09:35", "09:50-10:35", "10:40-11:25"];
        for (i, t) in times.iter().enumerate() {
            grid.set(3 + i, 0, format!("第{}节\n{}", i + 1, t));
        }
        PeriodClock::from_grid(&grid, &SheetLayout::default())
    }

    fn event(week: u32, weekday: u32, slot: &str, rows: (usize, usize)) -> CourseEvent {
        CourseEvent {
            week,
            weekday,
            slot: SlotLabel::new(slot),
            display_text: "Compilers[英] R101".to_string(),
            name: "Compilers".to_string(),
            place: "R101".to_string(),
            teacher: Some("Wang".to_string()),
            rows,
        }
    }

    fn term_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn test_event_span_prefers_slot_then_rows() {
        let c = clock();
        let t = |h, m| chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let slot = EventTiming::SlotPeriods;
        assert_eq!(event_span(&event(1, 1, "03-04", (3, 3)), &c, slot), Some((t(9, 50), t(11, 25))));
        assert_eq!(event_span(&event(1, 1, "午间", (3, 4)), &c, slot), Some((t(8, 0), t(9, 35))));
        assert_eq!(event_span(&event(1, 1, "午间", (10, 10)), &c, slot), None);
    }

    #[test]
    fn test_event_span_by_sheet_rows() {
        let c = clock();
        let t = |h, m| chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let rows = EventTiming::SheetRows;
        assert_eq!(event_span(&event(1, 1, "01-02", (3, 3)), &c, rows), Some((t(8, 0), t(8, 45))));
        assert_eq!(event_span(&event(1, 1, "01-02", (4, 4)), &c, rows), Some((t(8, 50), t(9, 35))));
        // Rows outside the clock fall back to the slot.
        assert_eq!(event_span(&event(1, 1, "03-04", (20, 20)), &c, rows), Some((t(9, 50), t(11, 25))));
    }

    #[test]
    fn test_ics_contains_dated_events() {
        let ics = to_ics_string(
            &[event(1, 1, "01-02", (3, 4)), event(3, 5, "03-04", (5, 6))],
            &CalendarSettings::default(),
            term_start(),
            &clock(),
        );
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("DTSTART;TZID=Asia/Shanghai:20260302T080000"));
        assert!(ics.contains("DTEND;TZID=Asia/Shanghai:20260302T093500"));
        assert!(ics.contains("DTSTART;TZID=Asia/Shanghai:20260320T095000"));
        assert!(ics.contains("SUMMARY:Compilers R101"));
        assert!(ics.contains("LOCATION:R101"));
        assert!(ics.contains("BEGIN:VALARM"));
        assert!(ics.contains("ACTION:AUDIO"));
    }

    #[test]
    fn test_ics_keeps_duplicates_and_skips_unknown_times() {
        let ics = to_ics_string(
            &[
                event(2, 2, "01-02", (3, 4)),
                event(2, 2, "01-02", (3, 4)),
                event(2, 2, "13-14", (15, 16)),
            ],
            &CalendarSettings::default(),
            term_start(),
            &clock(),
        );
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn test_alarm_can_be_disabled() {
        let settings = CalendarSettings {
            alarm_minutes: 0,
            ..CalendarSettings::default()
        };
        let ics = to_ics_string(&[event(1, 1, "01-02", (3, 4))], &settings, term_start(), &clock());
        assert!(!ics.contains("BEGIN:VALARM"));
    }

    #[test]
    fn test_csv_chart_layout() {
        let grid = Grid::build(&[event(1, 2, "01-02", (3, 4))]);
        let bytes = week_chart_csv(&grid).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let text = text.strip_prefix('\u{feff}').unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "周次,节次,周一,周二,周三,周四,周五,周六,周日");
        assert_eq!(lines[1], "1,01-02,,Compilers[英] R101,,,,,");
        assert_eq!(lines.len(), 1 + MAX_WEEK as usize);
    }

    #[test]
    fn test_markdown_chart() {
        let grid = Grid::build(&[event(1, 1, "01-02", (3, 4))]);
        let md = week_chart_markdown(&grid, term_start());
        assert!(md.starts_with("# 16周课表图表\n"));
        assert!(md.contains("## 第1周"));
        assert!(md.contains("| 节次 | 周一 03/02 |"));
        assert!(md.contains("| 01-02 | Compilers[英] R101 |  |"));
        assert!(md.contains("## 第16周"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        assert_eq!(escape_markdown_cell("a|b"), "a\\|b");
    }
}
