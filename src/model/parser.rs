// File: ./src/model/parser.rs
// Cell block parser: lifts stacked course entries out of one timetable cell.
//
// A course entry in a cell reads, top to bottom:
//
//     name
//     (2)          optional repetition counter
//     teacher
//     1-16[周]     anchor: week marker plus at least one digit
//     place
//     [03-04]节    section: must carry the period marker
//
// Every anchor is resolved on its own, so several entries stacked in one cell
// never interfere with each other.
use crate::model::item::CourseRecord;

const WEEK_MARKER: char = '周';
const PERIOD_MARKER: char = '节';

/// Why an anchor line did not produce a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// No line follows the anchor.
    MissingPlace,
    /// No second line follows the anchor.
    MissingSection,
    /// The line two below the anchor lacks the period marker.
    SectionWithoutPeriod,
    /// Not enough lines above the anchor to hold a name.
    MissingName,
}

/// Result of resolving one anchor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorOutcome {
    pub line: usize,
    pub result: Result<CourseRecord, Discard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekAnchor,
    ExpectPlace { anchor: usize },
    ExpectSection { anchor: usize },
    ResolveName { anchor: usize },
}

/// Splits a cell into trimmed, non-empty lines.
pub fn cell_lines(cell_text: &str) -> Vec<&str> {
    cell_text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn is_anchor(line: &str) -> bool {
    line.contains(WEEK_MARKER) && line.chars().any(|c| c.is_ascii_digit())
}

/// Matches a bare "(digits)" repetition counter.
fn is_repeat_marker(line: &str) -> bool {
    line.strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Walks the line sequence and resolves every anchor it meets.
pub struct BlockScanner<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
}

impl<'a> BlockScanner<'a> {
    pub fn new(cell_text: &'a str) -> Self {
        Self {
            lines: cell_lines(cell_text),
            cursor: 0,
        }
    }

    fn resolve(&self, anchor: usize) -> Result<CourseRecord, Discard> {
        let mut state = ScanState::ExpectPlace { anchor };
        loop {
            state = match state {
                ScanState::SeekAnchor => unreachable!("resolve starts at an anchor"),
                ScanState::ExpectPlace { anchor } => {
                    if anchor + 1 >= self.lines.len() {
                        return Err(Discard::MissingPlace);
                    }
                    ScanState::ExpectSection { anchor }
                }
                ScanState::ExpectSection { anchor } => {
                    let section = self.lines.get(anchor + 2).ok_or(Discard::MissingSection)?;
                    if !section.contains(PERIOD_MARKER) {
                        return Err(Discard::SectionWithoutPeriod);
                    }
                    ScanState::ResolveName { anchor }
                }
                ScanState::ResolveName { anchor } => {
                    let mut name_idx = anchor.checked_sub(2).ok_or(Discard::MissingName)?;
                    if is_repeat_marker(self.lines[name_idx]) {
                        name_idx = name_idx.checked_sub(1).ok_or(Discard::MissingName)?;
                    }
                    let teacher = anchor
                        .checked_sub(1)
                        .map(|i| self.lines[i].to_string())
                        .filter(|t| !t.is_empty());
                    return Ok(CourseRecord {
                        name: self.lines[name_idx].to_string(),
                        teacher,
                        week_spec: self.lines[anchor].to_string(),
                        place: self.lines[anchor + 1].to_string(),
                        section_label: self.lines[anchor + 2].to_string(),
                    });
                }
            };
        }
    }
}

impl Iterator for BlockScanner<'_> {
    type Item = AnchorOutcome;

    fn next(&mut self) -> Option<AnchorOutcome> {
        let mut state = ScanState::SeekAnchor;
        while let ScanState::SeekAnchor = state {
            let line = self.lines.get(self.cursor)?;
            if is_anchor(line) {
                state = ScanState::ExpectPlace {
                    anchor: self.cursor,
                };
            }
            self.cursor += 1;
        }
        let ScanState::ExpectPlace { anchor } = state else {
            return None;
        };
        Some(AnchorOutcome {
            line: anchor,
            result: self.resolve(anchor),
        })
    }
}

/// Parses one cell into its course records. Malformed entries are dropped.
pub fn parse_cell_courses(cell_text: &str) -> Vec<CourseRecord> {
    BlockScanner::new(cell_text)
        .filter_map(|outcome| match outcome.result {
            Ok(course) => Some(course),
            Err(reason) => {
                log::debug!("Dropped entry at line {}: {:?}", outcome.line, reason);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_line_block() {
        let courses = parse_cell_courses("数据挖掘\n张老师\n3-5周\nN101\n3-4节");
        assert_eq!(courses.len(), 1);
        let c = &courses[0];
        assert_eq!(c.name, "数据挖掘");
        assert_eq!(c.teacher.as_deref(), Some("张老师"));
        assert_eq!(c.week_spec, "3-5周");
        assert_eq!(c.place, "N101");
        assert_eq!(c.section_label, "3-4节");
    }

    #[test]
    fn test_missing_section_yields_nothing() {
        assert!(parse_cell_courses("数据挖掘\n张老师\n3-5周\nN101").is_empty());
    }

    #[test]
    fn test_section_without_marker() {
        let outcomes: Vec<_> = BlockScanner::new("A\nT\n1-8[周]\nR1\n[01-02]").collect();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].result, Err(Discard::SectionWithoutPeriod));
    }

    #[test]
    fn test_anchor_at_line_one_is_discarded() {
        let outcomes: Vec<_> = BlockScanner::new("T\n1-8[周]\nR1").collect();
        assert_eq!(outcomes[0].line, 1);
        assert_eq!(outcomes[0].result, Err(Discard::MissingSection));

        let outcomes: Vec<_> = BlockScanner::new("T\n1-8[周]\nR1\n[01-02]节").collect();
        assert_eq!(outcomes[0].result, Err(Discard::MissingName));
    }

    #[test]
    fn test_trailing_anchor_has_no_place() {
        let outcomes: Vec<_> = BlockScanner::new("A\nT\n1-8[周]").collect();
        assert_eq!(outcomes[0].result, Err(Discard::MissingPlace));
    }

    #[test]
    fn test_repeat_counter_shifts_name() {
        let courses = parse_cell_courses("羽毛球\n(2)\n李老师\n1-16[周]\n体育馆\n[07-08]节");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "羽毛球");
        assert_eq!(courses[0].teacher.as_deref(), Some("李老师"));
    }

    #[test]
    fn test_repeat_counter_without_name_above() {
        let outcomes: Vec<_> = BlockScanner::new("(2)\nT\n1-8[周]\nR1\n[01-02]节").collect();
        assert_eq!(outcomes[0].result, Err(Discard::MissingName));
    }

    #[test]
    fn test_stacked_blocks_parse_independently() {
        let cell = "高等数学\n王老师\n1-8[周]\nN201\n[01-02]节\n\
                    线性代数\n赵老师\n9-16[周]\nN305\n[01-02]节";
        let courses = parse_cell_courses(cell);
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].name, "高等数学");
        assert_eq!(courses[1].name, "线性代数");
        assert_eq!(courses[1].week_spec, "9-16[周]");
    }

    #[test]
    fn test_blank_lines_and_crlf_are_ignored() {
        let courses = parse_cell_courses("\r\n  高等数学 \r\n\r\n王老师\r\n1-8[周]\r\nN201\r\n[01-02]节\r\n");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "高等数学");
        assert_eq!(courses[0].place, "N201");
    }

    #[test]
    fn test_week_marker_without_digit_is_not_anchor() {
        assert_eq!(BlockScanner::new("周老师\n单周\nR1\n[01]节").count(), 0);
    }

    #[test]
    fn test_repeat_marker_shape() {
        assert!(is_repeat_marker("(12)"));
        assert!(!is_repeat_marker("()"));
        assert!(!is_repeat_marker("(1a)"));
        assert!(!is_repeat_marker("1"));
    }
}
