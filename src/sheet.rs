// File: ./src/sheet.rs
//! Access to the raw timetable grid.
//!
//! The timetable arrives as a worksheet where each weekday column holds one
//! cell per teaching period. A course spanning several periods shows up as
//! the same text repeated down consecutive rows. This module hides where the
//! grid came from behind [`CellGrid`], decodes those repeated rows into
//! explicit runs, and reads the clock time of every period from the label
//! column.
use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only (row, column) access to string cell values, both 0-based.
pub trait CellGrid {
    /// Text of a string cell, `None` for blank, numeric or missing cells.
    fn cell_value(&self, row: usize, col: usize) -> Option<&str>;
}

/// A grid held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl MemoryGrid {
    /// Places `value` at (row, col), growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        cells[col] = Some(value.into());
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

impl CellGrid for MemoryGrid {
    fn cell_value(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// First worksheet of a spreadsheet file, loaded eagerly.
#[derive(Debug, Clone)]
pub struct WorkbookGrid {
    grid: MemoryGrid,
}

impl WorkbookGrid {
    /// Opens an `.xls`, `.xlsx` or `.ods` file and reads its first sheet.
    pub fn open(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open timetable: {}", path.display()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow::anyhow!("Timetable has no worksheet: {}", path.display()))?
            .with_context(|| format!("Failed to read first worksheet of {}", path.display()))?;

        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut grid = MemoryGrid::default();
        for (row, col, data) in range.used_cells() {
            if let Data::String(s) = data {
                grid.set(row + row_offset, col + col_offset, s.clone());
            }
        }
        log::debug!("Loaded {} rows from {}", grid.height(), path.display());
        Ok(Self { grid })
    }
}

impl CellGrid for WorkbookGrid {
    fn cell_value(&self, row: usize, col: usize) -> Option<&str> {
        self.grid.cell_value(row, col)
    }
}

/// Where the timetable sits inside the worksheet. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub first_weekday_col: usize,
    pub last_weekday_col: usize,
    pub first_period_row: usize,
    pub last_period_row: usize,
    pub label_col: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            first_weekday_col: 1,
            last_weekday_col: 5,
            first_period_row: 3,
            last_period_row: 16,
            label_col: 0,
        }
    }
}

impl SheetLayout {
    /// Rejects inverted bounds, which would describe an empty timetable.
    pub fn validate(&self) -> Result<()> {
        if self.first_weekday_col > self.last_weekday_col {
            anyhow::bail!(
                "Invalid layout: first_weekday_col {} is after last_weekday_col {}",
                self.first_weekday_col,
                self.last_weekday_col
            );
        }
        if self.first_period_row > self.last_period_row {
            anyhow::bail!(
                "Invalid layout: first_period_row {} is after last_period_row {}",
                self.first_period_row,
                self.last_period_row
            );
        }
        Ok(())
    }

    pub fn weekday_of(&self, col: usize) -> u32 {
        (col.saturating_sub(self.first_weekday_col) + 1) as u32
    }

    pub fn period_of(&self, row: usize) -> u32 {
        (row.saturating_sub(self.first_period_row) + 1) as u32
    }

    pub fn row_of(&self, period: u32) -> Option<usize> {
        let row = self.first_period_row + (period as usize).checked_sub(1)?;
        (row <= self.last_period_row).then_some(row)
    }

    pub fn period_count(&self) -> usize {
        (self.last_period_row + 1).saturating_sub(self.first_period_row)
    }
}

/// A maximal stretch of identical non-blank values. Rows are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRun {
    pub value: String,
    pub row_start: usize,
    pub row_end: usize,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Run-length decodes one column of raw values, indices relative to the slice.
pub fn decode_runs(values: &[Option<&str>]) -> Vec<CellRun> {
    let mut runs: Vec<CellRun> = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.row_end + 1 == idx && run.value == value => run.row_end = idx,
            _ => runs.push(CellRun {
                value: value.to_string(),
                row_start: idx,
                row_end: idx,
            }),
        }
    }
    runs
}

/// One cell's text together with its position in the timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCellBlock {
    pub text: String,
    pub weekday: u32,
    pub row_start: usize,
    pub row_end: usize,
}

/// Collects every non-blank cell block, column by column.
///
/// With `combine` set, repeated rows collapse into a single block spanning
/// the run; otherwise each row stands alone.
pub fn scan_blocks(grid: &dyn CellGrid, layout: &SheetLayout, combine: bool) -> Vec<RawCellBlock> {
    let mut blocks = Vec::new();
    for col in layout.first_weekday_col..=layout.last_weekday_col {
        let column: Vec<Option<&str>> = (layout.first_period_row..=layout.last_period_row)
            .map(|row| grid.cell_value(row, col))
            .collect();

        let runs = if combine {
            decode_runs(&column)
        } else {
            column
                .iter()
                .enumerate()
                .filter(|(_, v)| !is_blank(**v))
                .filter_map(|(idx, v)| {
                    v.map(|v| CellRun {
                        value: v.to_string(),
                        row_start: idx,
                        row_end: idx,
                    })
                })
                .collect()
        };

        blocks.extend(runs.into_iter().map(|run| RawCellBlock {
            text: run.value,
            weekday: layout.weekday_of(col),
            row_start: run.row_start + layout.first_period_row,
            row_end: run.row_end + layout.first_period_row,
        }));
    }
    blocks
}

/// Start and end clock time of one teaching period.
pub type PeriodSpan = (NaiveTime, NaiveTime);

/// Parses `"08:00-08:45"`.
pub fn parse_period_span(text: &str) -> Option<PeriodSpan> {
    let (start, end) = text.trim().split_once('-')?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    Some((start, end))
}

/// Clock times of the teaching periods, indexed by period number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodClock {
    spans: Vec<Option<PeriodSpan>>,
    layout: SheetLayout,
}

impl PeriodClock {
    /// Reads the label column. The second line of each label carries the
    /// period's time span; any later line that parses is accepted too.
    pub fn from_grid(grid: &dyn CellGrid, layout: &SheetLayout) -> Self {
        let spans = (layout.first_period_row..=layout.last_period_row)
            .map(|row| {
                grid.cell_value(row, layout.label_col)
                    .and_then(|label| label.lines().skip(1).find_map(parse_period_span))
            })
            .collect();
        Self {
            spans,
            layout: *layout,
        }
    }

    /// Fills periods the sheet left without a time from `fallback`, which
    /// lists spans for periods 1, 2, ... in order.
    pub fn with_fallback(mut self, fallback: &[String]) -> Self {
        self.spans.resize(self.layout.period_count(), None);
        for (slot, text) in self.spans.iter_mut().zip(fallback) {
            if slot.is_none() {
                *slot = parse_period_span(text);
            }
        }
        self
    }

    pub fn period(&self, period: u32) -> Option<PeriodSpan> {
        let idx = (period as usize).checked_sub(1)?;
        self.spans.get(idx).copied().flatten()
    }

    /// Span from the start of period `lo` to the end of period `hi`.
    pub fn between(&self, lo: u32, hi: u32) -> Option<PeriodSpan> {
        let (start, _) = self.period(lo)?;
        let (_, end) = self.period(hi)?;
        (end > start).then_some((start, end))
    }

    /// Span covered by sheet rows `row_start..=row_end`.
    pub fn rows(&self, row_start: usize, row_end: usize) -> Option<PeriodSpan> {
        if row_start < self.layout.first_period_row || row_end < self.layout.first_period_row {
            return None;
        }
        self.between(self.layout.period_of(row_start), self.layout.period_of(row_end))
    }

    pub fn known_periods(&self) -> usize {
        self.spans.iter().filter(|s| s.is_some()).count()
    }
}
