// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod export;
pub mod model;
pub mod sheet;
pub mod storage;
pub mod term;
pub mod timetable;
