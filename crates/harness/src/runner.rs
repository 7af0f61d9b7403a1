//! Scenario runner: load, filter, execute, summarize

use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::context::ScenarioContext;
use crate::error::{HarnessError, HarnessResult};
use crate::fixture;
use crate::report::{self, ScenarioResult, StepResult, SuiteResult};
use crate::scenario::Scenario;
use crate::steps::StepExecutor;

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub harness: HarnessConfig,
    pub scenarios_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            harness: HarnessConfig::default(),
            scenarios_dir: PathBuf::from("scenarios"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Runs scenarios sequentially, each with a fresh context
pub struct ScenarioRunner {
    client: ApiClient,
    scenarios_dir: PathBuf,
    output_dir: PathBuf,
}

impl ScenarioRunner {
    pub fn with_config(config: RunnerConfig) -> HarnessResult<Self> {
        Ok(Self {
            client: ApiClient::new(&config.harness)?,
            scenarios_dir: config.scenarios_dir,
            output_dir: config.output_dir,
        })
    }

    /// Run every scenario in the scenarios directory
    pub async fn run_all(&self) -> HarnessResult<SuiteResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        self.run_scenarios(&scenarios).await
    }

    /// Run scenarios matching a tag
    pub async fn run_tagged(&self, tag: &str) -> HarnessResult<SuiteResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        let filtered: Vec<Scenario> = scenarios
            .into_iter()
            .filter(|s| s.tags.contains(&tag.to_string()))
            .collect();
        self.run_scenarios(&filtered).await
    }

    /// Run a specific scenario by name
    pub async fn run_named(&self, name: &str) -> HarnessResult<ScenarioResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        let scenario = scenarios
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| HarnessError::ScenarioNotFound(name.to_string()))?;

        Ok(self.run_scenario(&scenario).await)
    }

    /// Run a list of scenarios in order
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> HarnessResult<SuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Scenario Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            skipped: 0,
            duration_ms,
            results,
        })
    }

    /// Run one scenario: fresh context, fixtures, then steps in order,
    /// stopping at the first failure. Failures are captured in the
    /// result, never retried.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        let mut ctx = ScenarioContext::new();
        let mut step_results: Vec<StepResult> = Vec::new();
        let mut scenario_error: Option<String> = None;

        // Fixtures run before any scripted step; a failure aborts here.
        let fixtures = scenario.effective_fixtures();
        if !fixtures.is_empty() {
            let fixture_start = Instant::now();
            match fixture::provision(&fixtures, &self.client, &mut ctx).await {
                Ok(attachments) => {
                    step_results.push(StepResult {
                        step_name: "fixture:seed_accounts".to_string(),
                        success: true,
                        duration_ms: fixture_start.elapsed().as_millis() as u64,
                        error: None,
                        attachments,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    step_results.push(StepResult {
                        step_name: "fixture:seed_accounts".to_string(),
                        success: false,
                        duration_ms: fixture_start.elapsed().as_millis() as u64,
                        error: Some(message.clone()),
                        attachments: Vec::new(),
                    });
                    scenario_error = Some(message);
                }
            }
        }

        if scenario_error.is_none() {
            let executor = StepExecutor::new(&self.client);
            for step in &scenario.steps {
                let result = executor.execute_step(step, &mut ctx).await;
                if !result.success {
                    scenario_error = result.error.clone();
                    step_results.push(result);
                    break; // Stop on first failure
                }
                step_results.push(result);
            }
        }

        ScenarioResult {
            name: scenario.name.clone(),
            success: scenario_error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps: step_results,
            error: scenario_error,
        }
    }

    /// Write suite results to the output directory
    pub fn write_results(&self, results: &SuiteResult) -> HarnessResult<PathBuf> {
        report::write_results(&self.output_dir, results)
    }
}
