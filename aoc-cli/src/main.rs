//! AOC CLI - Command-line interface for running Advent of Code solvers

mod aggregator;
mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Link the 2025 solver plugins
use advent_2025 as _;

use aoc_solver::SolverRegistryBuilder;
use clap::Parser;
use cli::Args;
use config::Config;
use error::CliError;
use executor::Executor;
use output::OutputFormatter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(args)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(config.log_filter())
        .init();

    let registry = build_registry(&config.tags)?;
    tracing::debug!(solvers = registry.storage().len(), "registry built");

    let executor =
        Executor::new(registry, &config).map_err(|e| CliError::Config(e.to_string()))?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    let missing_inputs = check_missing_inputs(&work_items, &executor);
    if !missing_inputs.is_empty() {
        eprintln!(
            "Missing {} input file(s) under {}:",
            missing_inputs.len(),
            executor.inputs().dir().display()
        );
        for (year, day) in &missing_inputs {
            eprintln!("  - {}/day{:02}.txt", year, day);
        }
    }

    run_executor(executor, work_items, config.quiet)
}

/// Year/days whose input file is not present
fn check_missing_inputs(work_items: &[executor::WorkItem], executor: &Executor) -> Vec<(u16, u8)> {
    work_items
        .iter()
        .filter(|w| !executor.inputs().contains(w.year, w.day))
        .map(|w| (w.year, w.day))
        .collect()
}

/// Run the executor, print results in order, fail if any part failed
fn run_executor(
    executor: Executor,
    work_items: Vec<executor::WorkItem>,
    quiet: bool,
) -> Result<(), CliError> {
    if !quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let mut aggregator = aggregator::ResultAggregator::for_work_items(&work_items);
    let total = aggregator.pending();

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    let formatter = OutputFormatter::new(quiet);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            formatter.print_result(&ready);
            results.push(ready);
        }
    }

    let leftovers = aggregator.finish();
    for key in &leftovers.missing {
        tracing::warn!(year = key.year, day = key.day, part = key.part, "no result received");
    }
    for ready in leftovers.results {
        formatter.print_result(&ready);
        results.push(ready);
    }

    executor_handle
        .join()
        .map_err(|_| CliError::Config("Executor thread panicked".to_string()))?
        .map_err(CliError::Executor)?;

    formatter.print_summary(&results);

    let solved = results.iter().filter(|r| r.answer.is_ok()).count();
    if solved < total {
        return Err(CliError::PartsFailed {
            failed: total - solved,
            total,
        });
    }
    Ok(())
}

/// Build registry with tag filtering; a solver must carry every requested tag
fn build_registry(tags: &[String]) -> Result<aoc_solver::SolverRegistry, CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
