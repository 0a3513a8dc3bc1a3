//! CohortForge: survey cohort dashboard
//!
//! Loads the model, survey population and cluster descriptions once, then
//! computes and renders the view for the submitted answers. In interactive
//! mode every accepted answer change recomputes the view.

use anyhow::{Context, Result};
use clap::Parser;
use cohortforge::cli::parse_field_assignment;
use cohortforge::{
    compute_view, render_charts, render_summary, AppContext, Args, FileSource, OutputFormat,
    SurveyRecord, ViewModel,
};
use std::io::{self, BufRead};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let source = FileSource::new(args.data_paths());
    let context = AppContext::load(&source).context("failed to load dashboard data")?;

    if args.interactive {
        run_interactive(&args, &context)
    } else {
        run_once(&args, &context)
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Compute and render the view for the answers given on the command line
fn run_once(args: &Args, context: &AppContext) -> Result<()> {
    let record = args.survey_record();
    let view = compute_view(&record, context)?;
    present(args, &view)
}

/// Re-run the pipeline after every accepted `field=value` line
fn run_interactive(args: &Args, context: &AppContext) -> Result<()> {
    let mut record = args.survey_record();
    refresh(args, context, &record)?;

    eprintln!("Enter updates as field=value (fields: age, edu_level, fav_animals, fav_place, gender), 'quit' to exit");

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let update = parse_field_assignment(line)
            .and_then(|(attribute, value)| record.set(attribute, value).map_err(Into::into));
        match update {
            Ok(()) => refresh(args, context, &record)?,
            Err(err) => eprintln!("{err:#}"),
        }
    }

    info!("session finished");
    Ok(())
}

/// A missing cluster description is reported and the session continues
fn refresh(args: &Args, context: &AppContext, record: &SurveyRecord) -> Result<()> {
    match compute_view(record, context) {
        Ok(view) => present(args, &view),
        Err(err) => {
            error!(%err, "cannot show group");
            eprintln!("{err}");
            Ok(())
        }
    }
}

fn present(args: &Args, view: &ViewModel) -> Result<()> {
    match args.format {
        OutputFormat::Text => print!("{}", render_summary(view)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
    }

    if let Some(output_dir) = &args.output_dir {
        let charts = render_charts(view, output_dir)
            .with_context(|| format!("failed to write charts to {}", output_dir.display()))?;
        info!(count = charts.len(), dir = %output_dir.display(), "charts saved");
    }

    Ok(())
}
