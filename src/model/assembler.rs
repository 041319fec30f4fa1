// File: ./src/model/assembler.rs
use crate::model::item::{CourseEvent, CourseRecord, LanguageTag};
use crate::model::slots::split_section_slots;
use crate::model::weeks::expand_weeks;
use std::collections::HashSet;

/// Settings the assembler needs; built from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    pub flagged_courses: HashSet<String>,
    pub flagged_tag: String,
    pub default_tag: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            flagged_courses: HashSet::new(),
            flagged_tag: "[中]".to_string(),
            default_tag: "[英]".to_string(),
        }
    }
}

/// Cross-products a course's weeks and slots into individual events.
#[derive(Debug, Clone)]
pub struct EventAssembler {
    config: AssemblerConfig,
}

impl EventAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, name: &str) -> LanguageTag {
        if self.config.flagged_courses.contains(name) {
            LanguageTag::Flagged
        } else {
            LanguageTag::Default
        }
    }

    fn tag_text(&self, tag: LanguageTag) -> &str {
        match tag {
            LanguageTag::Flagged => &self.config.flagged_tag,
            LanguageTag::Default => &self.config.default_tag,
        }
    }

    /// `"<name><tag> <place>"`.
    pub fn display_text(&self, course: &CourseRecord) -> String {
        let tag = self.tag_text(self.classify(&course.name));
        format!("{}{} {}", course.name, tag, course.place)
    }

    /// Events for one course sitting in `weekday`'s column across `rows`.
    ///
    /// Weeks outside the term are dropped here. Ordering is week-major, then
    /// slot order as split from the section label.
    pub fn assemble(
        &self,
        course: &CourseRecord,
        weekday: u32,
        rows: (usize, usize),
    ) -> Vec<CourseEvent> {
        let slots = split_section_slots(&course.section_label);
        let display_text = self.display_text(course);

        expand_weeks(&course.week_spec)
            .in_term()
            .flat_map(|week| slots.iter().map(move |slot| (week, slot)))
            .map(|(week, slot)| CourseEvent {
                week,
                weekday,
                slot: slot.clone(),
                display_text: display_text.clone(),
                name: course.name.clone(),
                place: course.place.clone(),
                teacher: course.teacher.clone(),
                rows,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, weeks: &str, section: &str) -> CourseRecord {
        CourseRecord {
            name: name.to_string(),
            teacher: Some("T".to_string()),
            week_spec: weeks.to_string(),
            place: "R101".to_string(),
            section_label: section.to_string(),
        }
    }

    fn assembler() -> EventAssembler {
        EventAssembler::new(AssemblerConfig {
            flagged_courses: ["数据挖掘".to_string()].into_iter().collect(),
            ..AssemblerConfig::default()
        })
    }

    #[test]
    fn test_language_tag_by_exact_name() {
        let a = assembler();
        assert_eq!(a.display_text(&course("数据挖掘", "1", "1节")), "数据挖掘[中] R101");
        assert_eq!(a.display_text(&course("数据挖掘 ", "1", "1节")), "数据挖掘 [英] R101");
        assert_eq!(a.classify("Compilers"), LanguageTag::Default);
    }

    #[test]
    fn test_cross_product_filters_term() {
        let events = assembler().assemble(&course("A", "15-18", "[01-02-03-04]节"), 3, (3, 4));
        assert_eq!(events.len(), 4);
        let keys: Vec<(u32, &str)> = events.iter().map(|e| (e.week, e.slot.as_str())).collect();
        assert_eq!(
            keys,
            vec![(15, "01-02"), (15, "03-04"), (16, "01-02"), (16, "03-04")]
        );
        assert!(events.iter().all(|e| e.weekday == 3 && e.rows == (3, 4)));
    }

    #[test]
    fn test_no_weeks_no_events() {
        assert!(assembler().assemble(&course("A", "x-y", "[01]节"), 1, (3, 3)).is_empty());
    }
}
