// File: ./src/timetable.rs
// One forward pass: sheet cells -> course records -> events -> grid.
use crate::config::Config;
use crate::model::{CourseEvent, CourseRecord, EventAssembler, Grid, parse_cell_courses};
use crate::sheet::{CellGrid, PeriodClock, RawCellBlock, scan_blocks};

/// A course record together with where it sat in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub course: CourseRecord,
    pub weekday: u32,
    pub row_start: usize,
    pub row_end: usize,
}

/// Everything derived from one timetable sheet.
#[derive(Debug, Clone)]
pub struct Timetable {
    pub lessons: Vec<Lesson>,
    pub events: Vec<CourseEvent>,
    pub clock: PeriodClock,
}

impl Timetable {
    pub fn from_grid(grid: &dyn CellGrid, config: &Config) -> Self {
        let blocks = scan_blocks(grid, &config.layout, config.combine_merged_rows);
        let lessons = lessons_from_blocks(&blocks);
        let assembler = EventAssembler::new(config.assembler_config());

        let events: Vec<CourseEvent> = lessons
            .iter()
            .flat_map(|l| assembler.assemble(&l.course, l.weekday, (l.row_start, l.row_end)))
            .collect();

        let clock = PeriodClock::from_grid(grid, &config.layout).with_fallback(&config.period_times);

        log::info!(
            "Parsed {} cell blocks into {} lessons and {} events",
            blocks.len(),
            lessons.len(),
            events.len()
        );
        if clock.known_periods() == 0 {
            log::warn!("No period times found in the sheet or config; calendar export will be empty");
        }

        Self {
            lessons,
            events,
            clock,
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::build(&self.events)
    }
}

pub fn lessons_from_blocks(blocks: &[RawCellBlock]) -> Vec<Lesson> {
    blocks
        .iter()
        .flat_map(|block| {
            parse_cell_courses(&block.text)
                .into_iter()
                .map(move |course| Lesson {
                    course,
                    weekday: block.weekday,
                    row_start: block.row_start,
                    row_end: block.row_end,
                })
        })
        .collect()
}
