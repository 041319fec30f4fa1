// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::export::{CalendarSettings, EventTiming};
use crate::model::AssemblerConfig;
use crate::sheet::SheetLayout;
use crate::storage::OutputStorage;
use crate::term::TermSettings;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_true() -> bool {
    true
}

fn default_term_start_date() -> String {
    "2026-03-02".to_string()
}

fn default_year() -> i32 {
    2026
}
fn default_begin_week() -> u32 {
    9
}

fn default_flagged_courses() -> Vec<String> {
    vec![
        "数据挖掘".to_string(),
        "神经网络与深度学习".to_string(),
        "羽毛球".to_string(),
    ]
}
fn default_flagged_tag() -> String {
    "[中]".to_string()
}
fn default_default_tag() -> String {
    "[英]".to_string()
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}
fn default_alarm_minutes() -> u32 {
    5
}

fn default_ics_file() -> String {
    "calendar.ics".to_string()
}
fn default_chart_csv_file() -> String {
    "semester_16week_chart.csv".to_string()
}
fn default_chart_markdown_file() -> String {
    "semester_16week_chart.md".to_string()
}

/// Output file names, relative to the output directory.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct OutputFiles {
    #[serde(default = "default_ics_file")]
    pub ics: String,
    #[serde(default = "default_chart_csv_file")]
    pub chart_csv: String,
    #[serde(default = "default_chart_markdown_file")]
    pub chart_markdown: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            ics: default_ics_file(),
            chart_csv: default_chart_csv_file(),
            chart_markdown: default_chart_markdown_file(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Monday of week 1, `YYYY-MM-DD`.
    #[serde(default = "default_term_start_date")]
    pub term_start_date: String,
    // Legacy fallback when term_start_date does not parse.
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default = "default_begin_week")]
    pub begin_week: u32,

    /// Collapse repeated rows of a column into one course block.
    #[serde(default = "default_true")]
    pub combine_merged_rows: bool,
    #[serde(default = "default_true")]
    pub show_week_mapping: bool,

    /// Exact course names that get `flagged_tag` instead of `default_tag`.
    #[serde(default = "default_flagged_courses")]
    pub flagged_courses: Vec<String>,
    #[serde(default = "default_flagged_tag")]
    pub flagged_tag: String,
    #[serde(default = "default_default_tag")]
    pub default_tag: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_alarm_minutes")]
    pub alarm_minutes: u32,
    /// `HH:MM-HH:MM` per period, used where the sheet's labels carry no time.
    #[serde(default)]
    pub period_times: Vec<String>,

    #[serde(default)]
    pub layout: SheetLayout,
    #[serde(default)]
    pub output: OutputFiles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            term_start_date: default_term_start_date(),
            year: default_year(),
            begin_week: default_begin_week(),
            combine_merged_rows: true,
            show_week_mapping: true,
            flagged_courses: default_flagged_courses(),
            flagged_tag: default_flagged_tag(),
            default_tag: default_default_tag(),
            timezone: default_timezone(),
            alarm_minutes: default_alarm_minutes(),
            period_times: Vec::new(),
            layout: SheetLayout::default(),
            output: OutputFiles::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit file path (the `--config` flag).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config
            .layout
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        OutputStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            OutputStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            flagged_courses: self.flagged_courses.iter().cloned().collect(),
            flagged_tag: self.flagged_tag.clone(),
            default_tag: self.default_tag.clone(),
        }
    }

    /// Calendar output settings. Rows that were not combined keep their own
    /// period times.
    pub fn calendar_settings(&self) -> CalendarSettings {
        CalendarSettings {
            timezone: self.timezone.clone(),
            alarm_minutes: self.alarm_minutes,
            timing: if self.combine_merged_rows {
                EventTiming::SlotPeriods
            } else {
                EventTiming::SheetRows
            },
            ..CalendarSettings::default()
        }
    }

    pub fn term_settings(&self) -> TermSettings {
        TermSettings {
            term_start_date: self.term_start_date.clone(),
            year: self.year,
            begin_week: self.begin_week,
        }
    }
}
