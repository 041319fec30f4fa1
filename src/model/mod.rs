// File: ./src/model/mod.rs
pub mod assembler;
pub mod grid;
pub mod item;
pub mod parser;
pub mod slots;
pub mod weeks;

pub use assembler::{AssemblerConfig, EventAssembler};
pub use grid::Grid;
pub use item::{CourseEvent, CourseRecord, LanguageTag, MAX_WEEK, SlotLabel, WeekSet};
pub use parser::parse_cell_courses;
pub use slots::split_section_slots;
pub use weeks::expand_weeks;
