//! Subcommand implementations.

use chrono::{DateTime, FixedOffset};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::cli::args::{Args, Commands, ErrorsArgs, OutputFormat, SummaryArgs};
use crate::error::Result;
use crate::eso::{Environment, EsoFile};
use crate::err_file::ErrFile;

/// Dispatch the parsed arguments to their subcommand.
pub fn run(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Summary(summary_args) => summary(summary_args),
        Commands::Errors(errors_args) => errors(errors_args),
    }
}

/// Serializable summary of one whole .eso file.
#[derive(Debug, Serialize)]
struct SummaryReport {
    programme: String,
    version: String,
    timestamp: String,
    environments: Vec<EnvironmentSummary>,
}

#[derive(Debug, Serialize)]
struct EnvironmentSummary {
    title: String,
    latitude: f64,
    longitude: f64,
    time_zone: f64,
    elevation: f64,
    frequencies: Vec<FrequencySummary>,
}

#[derive(Debug, Serialize)]
struct FrequencySummary {
    frequency: String,
    periods: usize,
    first_start: Option<DateTime<FixedOffset>>,
    variables: Vec<VariableSummary>,
}

#[derive(Debug, Serialize)]
struct VariableSummary {
    report_code: u32,
    object_name: String,
    quantity: String,
    unit: Option<String>,
    values: usize,
}

fn summary(args: &SummaryArgs) -> Result<()> {
    info!("Summarising {}", args.eso_file.display());
    let eso = EsoFile::parse(&args.eso_file)?;

    let statement = eso.program_version();
    let report = SummaryReport {
        programme: statement.programme.clone(),
        version: statement.version.clone(),
        timestamp: statement.timestamp.clone(),
        environments: eso
            .environments()
            .iter()
            .map(summarise_environment)
            .collect::<Result<Vec<_>>>()?,
    };

    match args.format {
        OutputFormat::Text => print_text_summary(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn summarise_environment(environment: &Environment<'_>) -> Result<EnvironmentSummary> {
    let mut frequencies = Vec::new();

    let variable_summary = |code: u32, object: &str, quantity: &str, unit: Option<&str>, values: usize| {
        VariableSummary {
            report_code: code,
            object_name: object.to_string(),
            quantity: quantity.to_string(),
            unit: unit.map(str::to_string),
            values,
        }
    };

    let interval = environment.interval_periods();
    if !interval.is_empty() {
        frequencies.push(FrequencySummary {
            frequency: "interval".to_string(),
            periods: interval.len(),
            first_start: interval.start_times()?.first().copied(),
            variables: environment
                .interval_variables()
                .iter()
                .map(|v| variable_summary(v.report_code(), v.object_name(), v.quantity(), v.unit(), v.len()))
                .collect(),
        });
    }

    let daily = environment.daily_periods();
    if !daily.is_empty() {
        frequencies.push(FrequencySummary {
            frequency: "daily".to_string(),
            periods: daily.len(),
            first_start: daily.start_times()?.first().copied(),
            variables: environment
                .daily_variables()
                .iter()
                .map(|v| variable_summary(v.report_code(), v.object_name(), v.quantity(), v.unit(), v.len()))
                .collect(),
        });
    }

    let monthly = environment.monthly_periods();
    if !monthly.is_empty() {
        frequencies.push(FrequencySummary {
            frequency: "monthly".to_string(),
            periods: monthly.len(),
            first_start: monthly.start_times()?.first().copied(),
            variables: environment
                .monthly_variables()
                .iter()
                .map(|v| variable_summary(v.report_code(), v.object_name(), v.quantity(), v.unit(), v.len()))
                .collect(),
        });
    }

    let run_period = environment.run_period_periods();
    if !run_period.is_empty() {
        frequencies.push(FrequencySummary {
            frequency: "run period".to_string(),
            periods: run_period.len(),
            first_start: run_period.start_times()?.first().copied(),
            variables: environment
                .run_period_variables()
                .iter()
                .map(|v| variable_summary(v.report_code(), v.object_name(), v.quantity(), v.unit(), v.len()))
                .collect(),
        });
    }

    let annual = environment.annual_periods();
    if !annual.is_empty() {
        frequencies.push(FrequencySummary {
            frequency: "annual".to_string(),
            periods: annual.len(),
            first_start: annual.start_times()?.first().copied(),
            variables: environment
                .annual_variables()
                .iter()
                .map(|v| variable_summary(v.report_code(), v.object_name(), v.quantity(), v.unit(), v.len()))
                .collect(),
        });
    }

    Ok(EnvironmentSummary {
        title: environment.title().to_string(),
        latitude: environment.latitude(),
        longitude: environment.longitude(),
        time_zone: environment.time_zone(),
        elevation: environment.elevation(),
        frequencies,
    })
}

fn print_text_summary(report: &SummaryReport) {
    println!(
        "{} {} ({})",
        report.programme.bold(),
        report.version,
        report.timestamp
    );
    for environment in &report.environments {
        println!();
        println!("{}", environment.title.green().bold());
        println!(
            "  latitude {:.2}, longitude {:.2}, time zone {:+.1} h, elevation {:.2} m",
            environment.latitude,
            environment.longitude,
            environment.time_zone,
            environment.elevation
        );
        for frequency in &environment.frequencies {
            match frequency.first_start {
                Some(start) => println!(
                    "  {} ({} periods from {})",
                    frequency.frequency.cyan(),
                    frequency.periods,
                    start
                ),
                None => println!(
                    "  {} ({} periods)",
                    frequency.frequency.cyan(),
                    frequency.periods
                ),
            }
            for variable in &frequency.variables {
                let unit = variable.unit.as_deref().unwrap_or("-");
                println!(
                    "    [{}] {}: {} [{}] ({} values)",
                    variable.report_code, variable.object_name, variable.quantity, unit,
                    variable.values
                );
            }
        }
    }
}

fn errors(args: &ErrorsArgs) -> Result<()> {
    info!("Reading {}", args.err_file.display());
    let err = ErrFile::read(&args.err_file)?;

    for warning in err.warnings() {
        println!("{}", warning.yellow());
    }
    for severe in err.severe_errors() {
        println!("{}", severe.red().bold());
    }
    println!(
        "{} warnings, {} severe errors",
        err.warnings().len(),
        err.severe_errors().len()
    );
    Ok(())
}
