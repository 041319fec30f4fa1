use anyhow::{Context, Result};
use chrono::Local;
use kebiao::cli::{self, Command};
use kebiao::config::Config;
use kebiao::context::{AppContext, StandardContext};
use kebiao::export;
use kebiao::sheet::WorkbookGrid;
use kebiao::storage::OutputStorage;
use kebiao::term::{TermStartSource, resolve_term_start, week_mapping_preview};
use kebiao::timetable::Timetable;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;

fn main() -> Result<()> {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            cli::print_help("kebiao");
            std::process::exit(2);
        }
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let ctx = StandardContext::new(args.root.clone());

    let input = match args.command {
        Command::Help => {
            cli::print_help("kebiao");
            return Ok(());
        }
        Command::InitConfig => {
            Config::default().save(&ctx)?;
            println!("Wrote default config to {}", Config::get_path_string(&ctx)?);
            return Ok(());
        }
        Command::Convert { input } => input,
    };

    // An explicit --config must exist; only the default location may be absent.
    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Cannot use config file {}", path.display()))?,
        None => match Config::load(&ctx) {
            Ok(config) => config,
            Err(e) if Config::is_missing_config_error(&e) => {
                log::info!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => return Err(e),
        },
    };

    let (term_start, source) =
        resolve_term_start(&config.term_settings(), Local::now().date_naive());
    match source {
        TermStartSource::Configured => println!("学期第1周周一日期: {}", term_start),
        TermStartSource::LegacyWeekRule => {
            println!("学期第1周周一日期: {} (按 year/begin_week 推算)", term_start)
        }
        TermStartSource::CurrentWeek => {
            println!("学期第1周周一日期: {} (未配置, 使用本周周一)", term_start)
        }
    }
    if config.show_week_mapping {
        for line in week_mapping_preview(term_start) {
            println!("  {}", line);
        }
    }

    let grid = WorkbookGrid::open(&input)?;
    let timetable = Timetable::from_grid(&grid, &config);
    println!("解析到课程片段: {}", timetable.lessons.len());

    let out_dir = match &args.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => ctx.get_output_dir()?,
    };

    let settings = config.calendar_settings();
    let ics = export::to_ics_string(&timetable.events, &settings, term_start, &timetable.clock);
    OutputStorage::write_output(&out_dir, &config.output.ics, ics)?;

    let grid = timetable.grid();
    OutputStorage::write_output(&out_dir, &config.output.chart_csv, export::week_chart_csv(&grid)?)?;
    OutputStorage::write_output(
        &out_dir,
        &config.output.chart_markdown,
        export::week_chart_markdown(&grid, term_start),
    )?;

    println!(
        "事件总数: {}; 节次行数: {}",
        timetable.events.len(),
        grid.slots().len()
    );
    Ok(())
}
