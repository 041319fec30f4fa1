// File: ./src/cli.rs
//! Command-line argument handling and help text.
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Command {
    #[default]
    Help,
    InitConfig,
    Convert {
        input: PathBuf,
    },
}

/// Parses arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = CliArgs::default();
    let mut input = None;
    let mut init = false;
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                out.command = Command::Help;
                return Ok(out);
            }
            "-v" | "--verbose" => out.verbose = true,
            "-r" | "--root" => {
                out.root = Some(args.next().ok_or("--root needs a directory")?.into());
            }
            "-c" | "--config" => {
                out.config = Some(args.next().ok_or("--config needs a file")?.into());
            }
            "-o" | "--output" => {
                out.output_dir = Some(args.next().ok_or("--output needs a directory")?.into());
            }
            "init-config" => init = true,
            s if s.starts_with('-') => return Err(format!("Unknown option: {}", s)),
            s => {
                if input.is_some() {
                    return Err(format!("Unexpected argument: {}", s));
                }
                input = Some(PathBuf::from(s));
            }
        }
    }

    out.command = match (init, input) {
        (true, _) => Command::InitConfig,
        (false, Some(input)) => Command::Convert { input },
        (false, None) => Command::Help,
    };
    Ok(out)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Kebiao v{} - Timetable spreadsheet to calendar converter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <timetable.xls>", binary_name);
    println!("    {} [--root <path>] init-config", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and output.");
    println!("    -c, --config <file>   Read settings from this TOML file.");
    println!("    -o, --output <dir>    Write generated files here (default: current dir).");
    println!("    -v, --verbose         Log every parsed event.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("OUTPUT:");
    println!("    calendar.ics                  One event per lesson occurrence");
    println!("    semester_16week_chart.csv     Week-by-week chart (UTF-8 with BOM)");
    println!("    semester_16week_chart.md      Week-by-week chart as Markdown tables");
    println!();
    println!("CONFIG (config.toml):");
    println!("    term_start_date = \"2026-03-02\"   Monday of week 1");
    println!("    combine_merged_rows = true       Treat repeated rows as one course block");
    println!("    flagged_courses = [\"...\"]        Course names tagged with flagged_tag");
    println!("    timezone = \"Asia/Shanghai\"       TZID written into the calendar");
    println!("    alarm_minutes = 5                Reminder before each lesson (0 = none)");
    println!("    period_times = [\"08:00-08:45\"]   Fallback times for periods 1, 2, ...");
}
