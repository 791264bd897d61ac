use clap::Parser;
use crossterm::style::{Color, Stylize};
use std::path::PathBuf;

use caseopen_core::report::{Report, ReportLine};
use caseopen_core::{parse_open_count, run, OpenerSettings};

mod config;

const DEFAULT_CATALOG: &str = "assets/cases.json";

#[derive(Debug, Parser)]
#[command(name = "case-opener", version, about = "Case opening simulator")]
struct Args {
    /// Number of cases to open per batch.
    #[arg(long, value_parser = parse_count)]
    count: u32,

    /// Currency selector: 0 = EUR, 1 = USD.
    #[arg(long)]
    currency: Option<usize>,

    /// Case catalog JSON. Falls back to the saved default, then assets/cases.json.
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Open this many batches in one session.
    #[arg(long, default_value_t = 1)]
    batches: u32,

    /// Print the full draw log after the summary.
    #[arg(long, default_value_t = false)]
    show_log: bool,

    #[arg(long, default_value_t = false)]
    no_color: bool,

    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Remember --catalog and --currency as defaults.
    #[arg(long, default_value_t = false)]
    save_config: bool,
}

fn parse_count(input: &str) -> Result<u32, String> {
    parse_open_count(input).map_err(|e| e.to_string())
}

fn init_logging(debug: bool) -> Result<(), log::SetLoggerError> {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

fn print_line(line: &ReportLine, use_color: bool) {
    match line.rarity {
        Some(rarity) if use_color => {
            let (r, g, b) = rarity.color_rgb();
            println!("{}", line.text.as_str().with(Color::Rgb { r, g, b }));
        }
        _ => println!("{}", line.text),
    }
}

fn print_report(report: &Report, use_color: bool) {
    for line in report.summary() {
        print_line(&line, use_color);
    }
    if let Some(currency) = &report.currency_line {
        println!("{currency}");
    }
    if !report.failure_lines.is_empty() {
        println!("Skipped {} case(s):", report.failure_lines.len());
        for failure in &report.failure_lines {
            println!("  {failure}");
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(err) = init_logging(args.debug) {
        eprintln!("Failed to initialise logging: {err}");
    }

    let mut cfg = config::load_config();
    if let Some(catalog) = &args.catalog {
        cfg.catalog_path = Some(catalog.clone());
    }
    if let Some(currency) = args.currency {
        cfg.currency_index = currency;
    }

    if args.save_config {
        match config::save_config(&cfg) {
            Ok(path) => log::info!("saved defaults to {}", path.display()),
            Err(err) => log::warn!("could not save defaults: {err}"),
        }
    }

    let settings = OpenerSettings {
        catalog_path: cfg
            .catalog_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG)),
        count: args.count,
        currency_index: cfg.currency_index,
        seed: args.seed,
        batches: args.batches,
    };

    let summary = match run(&settings) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let use_color = !args.no_color;
    let many = summary.reports.len() > 1;
    for (i, report) in summary.reports.iter().enumerate() {
        if many {
            println!("== Batch {} ==", i + 1);
        }
        print_report(report, use_color);
    }

    // Each report carries the whole session log; the last one is complete.
    if args.show_log {
        if let Some(last) = summary.reports.last() {
            println!("Full log:");
            for line in &last.log_lines {
                print_line(line, use_color);
            }
        }
    }
}
