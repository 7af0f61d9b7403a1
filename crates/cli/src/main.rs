//! Bankcheck CLI - Main Entry Point
//!
//! Runs YAML scenarios against a banking REST API and writes a JSON
//! results file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use bankcheck_harness::runner::{RunnerConfig, ScenarioRunner};
use bankcheck_harness::{HarnessConfig, Scenario, SuiteResult};

/// Scenario-driven E2E test runner for a banking REST API
#[derive(Parser, Debug)]
#[command(name = "bankcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the API under test
    #[arg(long, env = "BANKCHECK_API_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Path to the scenarios directory
    #[arg(short, long, default_value = "scenarios")]
    scenarios: PathBuf,

    /// Run only scenarios matching this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only a specific scenario by name
    #[arg(short, long)]
    name: Option<String>,

    /// List scenarios without running them
    #[arg(long)]
    list: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BANKCHECK_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    if args.list {
        let scenarios = Scenario::load_all(&args.scenarios)?;
        for scenario in &scenarios {
            if scenario.tags.is_empty() {
                println!("{}", scenario.name);
            } else {
                println!("{} [{}]", scenario.name, scenario.tags.join(", "));
            }
        }
        return Ok(());
    }

    tracing::info!(
        "Running scenarios from {} against {}",
        args.scenarios.display(),
        args.base_url
    );

    let config = RunnerConfig {
        harness: HarnessConfig {
            base_url: args.base_url,
            request_timeout: Duration::from_secs(args.timeout_secs),
        },
        scenarios_dir: args.scenarios,
        output_dir: args.output,
    };
    let runner = ScenarioRunner::with_config(config)?;

    let results = if let Some(name) = args.name {
        let result = runner.run_named(&name).await?;
        SuiteResult {
            total: 1,
            passed: if result.success { 1 } else { 0 },
            failed: if result.success { 0 } else { 1 },
            skipped: 0,
            duration_ms: result.duration_ms,
            results: vec![result],
        }
    } else if let Some(tag) = args.tag {
        runner.run_tagged(&tag).await?
    } else {
        runner.run_all().await?
    };

    runner.write_results(&results)?;
    print_summary(&results);

    if results.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(results: &SuiteResult) {
    println!();
    for result in &results.results {
        if result.success {
            println!("{} {} ({} ms)", "✓".green(), result.name, result.duration_ms);
        } else {
            println!(
                "{} {} - {}",
                "✗".red(),
                result.name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!();

    let summary = format!(
        "{} total, {} passed, {} failed ({} ms)",
        results.total, results.passed, results.failed, results.duration_ms
    );
    if results.failed > 0 {
        println!("{}", summary.red().bold());
    } else {
        println!("{}", summary.green().bold());
    }
}
