mod cli;

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timeshape_core::{
    DayHourGrid, EventLog, EventSource, Report, ResolvedRun, RunConfig, ShapedEventGenerator,
    UniformEventGenerator,
};

use crate::cli::{CliArgs, Command, Format, View};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config = RunConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            info!(path = %path.display(), "loaded run config");
            config
        }
        None => RunConfig::default(),
    };
    let run_args = args.command.args();
    run_args.apply(&mut config);

    let mut run = config.resolve(clock_seed())?;
    info!(seed = run.seed, weeks = run.weeks, width = %run.width, "resolved run");

    let output = match &args.command {
        Command::Shaped(_) => {
            let generator = ShapedEventGenerator::new(run.shape_config())?;
            let end = run.end.unwrap_or_else(|| generator.end());
            render(&generator, &run, end, run_args.view, run_args.format)?
        }
        Command::Uniform(_) => {
            if run.end.is_none() {
                run.end = Some(Local::now().naive_local());
            }
            let generator = UniformEventGenerator::new(run.uniform_config()?)?;
            render(&generator, &run, generator.end(), run_args.view, run_args.format)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

fn render(
    source: &dyn EventSource,
    run: &ResolvedRun,
    end: chrono::NaiveDateTime,
    view: View,
    format: Format,
) -> Result<String> {
    match view {
        View::Windows => {
            let report = Report::generate(source, end, run.weeks, run.width, run.anchor)?;
            let digest = report.digest()?;
            info!(%digest, windows = report.windows.len(), "report ready");
            match format {
                Format::Json => Ok(report.to_json()?),
                Format::Text => Ok(windows_text(&report)),
            }
        }
        View::Heatmap => {
            let log = source.collect_log();
            let grid = DayHourGrid::from_timestamps(log.timestamps());
            match format {
                Format::Json => Ok(serde_json::to_string_pretty(&grid)?),
                Format::Text => Ok(grid.to_string()),
            }
        }
        View::Events => {
            let log = source.collect_log();
            match format {
                Format::Json => Ok(serde_json::to_string_pretty(log.events())?),
                Format::Text => Ok(events_text(&log)),
            }
        }
    }
}

fn windows_text(report: &Report) -> String {
    let mut out = format!(
        "# source={} seed={} width={} events={}\n",
        report.source, report.seed, report.width, report.total_events
    );
    for window in &report.windows {
        out.push_str(&format!(
            "\n## week {}: {} ({} events)\n",
            window.index, window.label, window.event_count
        ));
        for bucket in &window.buckets {
            out.push_str(&format!("{}\t{}\n", bucket.start, bucket.count));
        }
    }
    out
}

fn events_text(log: &EventLog) -> String {
    log.events()
        .iter()
        .map(|e| format!("{}\t{:?}\t{:?}\n", e.timestamp, e.colour, e.size))
        .collect()
}

/// Seed for runs without `--seed`; logged so the run can be replayed.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
