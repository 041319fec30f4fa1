// File: ./src/model/grid.rs
// Per-week index of event texts by (slot, weekday), read by the chart exporters.
use crate::model::item::{CourseEvent, DAYS_PER_WEEK, MAX_WEEK, SlotLabel};
use std::collections::{BTreeSet, HashMap};

/// Separator between distinct entries sharing one rendered cell.
pub const CELL_SEPARATOR: &str = " ｜ ";

#[derive(Debug, Clone, Default)]
pub struct Grid {
    slots: Vec<SlotLabel>,
    weeks: HashMap<u32, HashMap<(SlotLabel, u32), Vec<String>>>,
}

impl Grid {
    /// Builds the grid for weeks `1..=MAX_WEEK` and weekdays `1..=7`.
    ///
    /// Every (slot, weekday) pair is present for every week, even when empty.
    pub fn build(events: &[CourseEvent]) -> Self {
        let mut slots: Vec<SlotLabel> = events
            .iter()
            .map(|e| e.slot.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        slots.sort_by_key(|s| s.sort_key());

        let mut weeks = HashMap::new();
        for week in 1..=MAX_WEEK {
            let mut cells: HashMap<(SlotLabel, u32), Vec<String>> = slots
                .iter()
                .flat_map(|s| (1..=DAYS_PER_WEEK).map(move |d| ((s.clone(), d), Vec::new())))
                .collect();
            for e in events.iter().filter(|e| e.week == week) {
                if let Some(texts) = cells.get_mut(&(e.slot.clone(), e.weekday)) {
                    texts.push(e.display_text.clone());
                }
            }
            weeks.insert(week, cells);
        }

        Self { slots, weeks }
    }

    /// Row labels in display order.
    pub fn slots(&self) -> &[SlotLabel] {
        &self.slots
    }

    /// Raw texts at one cell, duplicates kept, in event order.
    pub fn cell(&self, week: u32, slot: &SlotLabel, weekday: u32) -> &[String] {
        self.weeks
            .get(&week)
            .and_then(|cells| cells.get(&(slot.clone(), weekday)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sorted, deduplicated texts at one cell.
    pub fn cell_entries(&self, week: u32, slot: &SlotLabel, weekday: u32) -> Vec<&str> {
        self.cell(week, slot, weekday)
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rendered cell text, entries joined by [`CELL_SEPARATOR`].
    pub fn cell_text(&self, week: u32, slot: &SlotLabel, weekday: u32) -> String {
        self.cell_entries(week, slot, weekday).join(CELL_SEPARATOR)
    }

    pub fn is_week_empty(&self, week: u32) -> bool {
        self.weeks
            .get(&week)
            .is_none_or(|cells| cells.values().all(Vec::is_empty))
    }
}
