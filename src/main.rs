use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use csv2ics_core::config::{parse_delimiter, parse_timezone};
use csv2ics_core::{CalendarMeta, ColumnMap, ConvertConfig, LogReporter, convert_file};
use owo_colors::OwoColorize;

#[derive(Parser, Debug)]
#[command(name = "csv2ics")]
#[command(about = "Convert a CSV file of events into an iCalendar (.ics) file")]
#[command(after_help = "Example:\n  csv2ics -i sample.csv -o sample.ics -d \";\" --rows 2,3,4,0,1")]
struct Cli {
    /// Input CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Output ICS file (overwritten if it exists)
    #[arg(short, long)]
    output: PathBuf,

    /// Field delimiter, e.g. ";" ("\t" or "tab" for tabs)
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Whether the first line of the CSV holds headers (-H false to disable)
    #[arg(
        short = 'H',
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    headers: bool,

    /// Column positions of subject, start date, end date, description, location
    #[arg(long, value_delimiter = ',', default_values_t = [0, 1, 2, 3, 4])]
    rows: Vec<usize>,

    /// Date format, e.g. "DD-MM-YYYY HH:mm" or "%d-%m-%Y %H:%M"
    #[arg(long)]
    dateformat: Option<String>,

    /// Timezone for the event times (e.g. "Europe/Paris"); floating times if unset.
    /// Times get a TZID parameter but no VTIMEZONE block is written, so the
    /// reading client must know the zone by its IANA name
    #[arg(long)]
    tz: Option<String>,

    /// TOML file overriding the calendar metadata (company, product, domain, name, url)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = build_config(&cli)?;
    let summary = convert_file(&config, &mut LogReporter)
        .with_context(|| format!("Failed to convert {}", config.input_path.display()))?;

    println!(
        "{}",
        format!(
            "  Wrote {} events to {}",
            summary.events,
            config.output_path.display()
        )
        .green()
    );
    if summary.skipped() > 0 {
        println!(
            "{}",
            format!("  Skipped {} of {} rows", summary.skipped(), summary.rows).yellow()
        );
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<ConvertConfig> {
    let mut config = ConvertConfig::new(&cli.input, &cli.output);

    config.delimiter = parse_delimiter(&cli.delimiter)?;
    config.has_headers = cli.headers;
    config.columns = ColumnMap::from_ordinals(&cli.rows)?;
    config.date_format = cli.dateformat.clone();
    config.timezone = cli.tz.as_deref().map(parse_timezone).transpose()?;

    if let Some(path) = &cli.config {
        config.metadata = CalendarMeta::load(path)?;
    }

    Ok(config)
}
