// File: ./src/model/item.rs
// Core value types flowing through the timetable pipeline.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest term week a course occurrence can land in.
pub const MAX_WEEK: u32 = 16;

/// Weekday columns used when indexing the grid (Monday = 1 .. Sunday = 7).
pub const DAYS_PER_WEEK: u32 = 7;

/// One course entry lifted out of a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub teacher: Option<String>,
    pub week_spec: String,
    pub place: String,
    pub section_label: String,
}

/// Sorted, deduplicated week numbers. Values are not clamped to the term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSet(Vec<u32>);

impl WeekSet {
    /// Builds a set from arbitrary values, sorting and removing duplicates.
    pub fn from_unsorted(mut weeks: Vec<u32>) -> Self {
        weeks.sort_unstable();
        weeks.dedup();
        Self(weeks)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, week: u32) -> bool {
        self.0.binary_search(&week).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Weeks that fall inside the teaching term.
    pub fn in_term(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().filter(|w| (1..=MAX_WEEK).contains(w))
    }

    pub(crate) fn retain(&mut self, keep: impl Fn(u32) -> bool) {
        self.0.retain(|w| keep(*w));
    }
}

impl IntoIterator for WeekSet {
    type Item = u32;
    type IntoIter = std::vec::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A normalized period block such as `"03"` or `"03-04"`.
///
/// Labels that carried no digits at all are kept verbatim as opaque slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotLabel(String);

impl SlotLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn single(n: u32) -> Self {
        Self(format!("{:02}", n))
    }

    pub fn span(lo: u32, hi: u32) -> Self {
        Self(format!("{:02}-{:02}", lo, hi))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every run of ASCII digits in the label, in order of appearance.
    pub fn numbers(&self) -> Vec<u32> {
        digit_runs(&self.0)
    }

    /// Row ordering key: the label's numbers, or `[999]` when it has none,
    /// which places opaque labels after every numeric one.
    pub fn sort_key(&self) -> Vec<u32> {
        let nums = self.numbers();
        if nums.is_empty() { vec![999] } else { nums }
    }

    /// First and last period covered, when the label is numeric.
    pub fn period_bounds(&self) -> Option<(u32, u32)> {
        let nums = self.numbers();
        Some((*nums.first()?, *nums.last()?))
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts every run of ASCII digits as an integer.
///
/// Runs too long to fit a `u32` saturate instead of failing.
pub fn digit_runs(s: &str) -> Vec<u32> {
    let mut nums = Vec::new();
    let mut current: Option<u32> = None;
    for c in s.chars() {
        if let Some(d) = c.to_digit(10) {
            let acc = current.unwrap_or(0);
            current = Some(acc.saturating_mul(10).saturating_add(d));
        } else if let Some(n) = current.take() {
            nums.push(n);
        }
    }
    if let Some(n) = current {
        nums.push(n);
    }
    nums
}

/// Which of the two display markers a course name gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageTag {
    Default,
    Flagged,
}

/// One scheduled occurrence of a course in a given week, weekday and slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEvent {
    pub week: u32,
    pub weekday: u32,
    pub slot: SlotLabel,
    pub display_text: String,
    pub name: String,
    pub place: String,
    pub teacher: Option<String>,
    /// Inclusive sheet rows of the merged cell the course came from.
    pub rows: (usize, usize),
}

impl CourseEvent {
    /// Calendar summary line: `"<name> <place>"`.
    pub fn summary(&self) -> String {
        format!("{} {}", self.name, self.place)
    }
}
