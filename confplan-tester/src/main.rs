mod reports;
mod runner;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use confplan_engine::{Catalog, EstimateSummary};

use runner::{ScenarioResult, ScenarioRunner};
use scenario::{expand_scenarios, get_scenario, list_scenarios};
use util::{load_catalog, load_script, parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "confplan-tester", version = "0.1.0")]
#[command(about = "Scenario runner and invariant sweeps for the conference planner engine")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds for random-walk scenarios (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Iterations per seed for random-walk scenarios
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Catalog JSON to load instead of the embedded default
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Replay a JSON action script and print the resulting estimate
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let catalog = load_catalog(args.catalog.as_deref())?;

    if let Some(script) = args.script.as_deref() {
        return replay_script(&args, catalog, script);
    }

    announce_banner();

    let start_time = Instant::now();
    let seeds = parse_seeds(&args.seeds)?;
    let results = run_scenarios(&args, catalog, &seeds);

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏛️  Conference Planner Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn run_scenarios(args: &Args, catalog: Arc<Catalog>, seeds: &[u64]) -> Vec<ScenarioResult> {
    let runner = ScenarioRunner::new(catalog, args.verbose);
    let mut results = Vec::new();

    for key in expand_scenarios(&split_csv(&args.scenarios)) {
        let Some(scenario) = get_scenario(&key) else {
            eprintln!("⚠️  Unknown scenario: {}", key.yellow());
            continue;
        };
        results.extend(runner.run(&scenario, seeds, args.iterations));
    }

    results
}

fn replay_script(args: &Args, catalog: Arc<Catalog>, script: &std::path::Path) -> Result<()> {
    let actions = load_script(script)?;
    let runner = ScenarioRunner::new(catalog, args.verbose);
    let run = runner.replay(&actions);

    let rejected: Vec<String> = run
        .steps
        .iter()
        .enumerate()
        .filter_map(|(idx, step)| {
            step.result
                .as_ref()
                .err()
                .map(|err| format!("step {} {}: {err}", idx + 1, step.action.key()))
        })
        .collect();
    for message in &rejected {
        log::warn!("{message}");
    }

    let summary = EstimateSummary::capture(run.store.state());
    let mut output_target = OutputTarget::new(args.output.clone())?;
    reports::generate_estimate_report(&mut output_target, &summary, &rejected, &args.report)?;
    output_target.flush_inner()?;
    Ok(())
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            reports::generate_json_report(&mut output_target, results)?;
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Conference Planner Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
