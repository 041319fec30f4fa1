// File: ./src/model/weeks.rs
// Expansion of compressed week-validity expressions such as "1-8,10(双)[周]".
use crate::model::item::WeekSet;

const WEEK_UNIT: char = '周';
const ODD_MARKER: char = '单';
const EVEN_MARKER: char = '双';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Any,
    Odd,
    Even,
}

impl Parity {
    /// Reads the parity markers from raw text. Odd wins when both appear.
    pub fn detect(raw: &str) -> Self {
        let odd = raw.contains(ODD_MARKER);
        let even = raw.contains(EVEN_MARKER);
        if odd && even {
            log::debug!("Week spec '{}' carries both parity markers, using odd", raw);
        }
        if odd {
            Parity::Odd
        } else if even {
            Parity::Even
        } else {
            Parity::Any
        }
    }

    pub fn admits(self, week: u32) -> bool {
        match self {
            Parity::Any => true,
            Parity::Odd => week % 2 == 1,
            Parity::Even => week % 2 == 0,
        }
    }
}

/// Expands a week spec into a concrete [`WeekSet`].
///
/// Malformed items contribute nothing. Values outside the term are kept;
/// callers filter with [`WeekSet::in_term`].
pub fn expand_weeks(week_text: &str) -> WeekSet {
    let normalized: String = week_text
        .replace('，', ",")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let parity = Parity::detect(&normalized);

    let without_unit = normalized.replace(WEEK_UNIT, "");
    let stripped = strip_enclosed(&strip_enclosed(&without_unit, '[', ']'), '(', ')');

    let mut weeks = Vec::new();
    for item in stripped.split(',').filter(|i| !i.is_empty()) {
        if let Some((left, right)) = item.split_once('-') {
            if let (Some(lo), Some(hi)) = (parse_plain_number(left), parse_plain_number(right)) {
                weeks.extend(lo..=hi);
            }
        } else if let Some(n) = parse_plain_number(item) {
            weeks.push(n);
        }
    }

    let mut set = WeekSet::from_unsorted(weeks);
    set.retain(|w| parity.admits(w));
    set
}

/// Parses a token made only of ASCII digits. Signs, spaces and other
/// characters disqualify it.
fn parse_plain_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Removes every non-greedy `open ... close` group. An unmatched opener is
/// left in place.
fn strip_enclosed(s: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(open) {
        let after = &rest[start + open.len_utf8()..];
        match after.find(close) {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &after[end + close.len_utf8()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
