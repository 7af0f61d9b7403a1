//! Runs the shipped scenario suite against the in-process mock bank

mod support;

use std::path::PathBuf;
use std::time::Duration;

use bankcheck_harness::runner::{RunnerConfig, ScenarioRunner};
use bankcheck_harness::{HarnessConfig, HarnessError};

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../scenarios")
}

fn runner_for(base_url: String, output_dir: &std::path::Path) -> ScenarioRunner {
    ScenarioRunner::with_config(RunnerConfig {
        harness: HarnessConfig {
            base_url,
            request_timeout: Duration::from_secs(5),
        },
        scenarios_dir: scenarios_dir(),
        output_dir: output_dir.to_path_buf(),
    })
    .unwrap()
}

#[tokio::test]
async fn shipped_suite_passes_against_the_mock_bank() {
    let base_url = support::spawn().await;
    let output = tempfile::tempdir().unwrap();
    let runner = runner_for(base_url, output.path());

    let results = runner.run_all().await.unwrap();

    assert_eq!(results.total, 13);
    for result in &results.results {
        assert!(result.success, "{} failed: {:?}", result.name, result.error);
    }
    assert_eq!(results.failed, 0);
    assert_eq!(results.passed, 13);

    let path = runner.write_results(&results).unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn tagged_run_selects_only_matching_scenarios() {
    let base_url = support::spawn().await;
    let output = tempfile::tempdir().unwrap();
    let runner = runner_for(base_url, output.path());

    let results = runner.run_tagged("smoke").await.unwrap();

    assert_eq!(results.total, 4);
    assert_eq!(results.failed, 0);
}

#[tokio::test]
async fn named_run_executes_a_single_scenario() {
    let base_url = support::spawn().await;
    let output = tempfile::tempdir().unwrap();
    let runner = runner_for(base_url, output.path());

    let result = runner.run_named("account-not-found").await.unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.steps.len(), 3);
}

#[tokio::test]
async fn unknown_scenario_name_is_an_error() {
    let base_url = support::spawn().await;
    let output = tempfile::tempdir().unwrap();
    let runner = runner_for(base_url, output.path());

    let err = runner.run_named("no-such-scenario").await.unwrap_err();
    assert!(matches!(err, HarnessError::ScenarioNotFound(_)));
}
