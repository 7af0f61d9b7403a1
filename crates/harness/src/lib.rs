//! Bankcheck E2E Harness
//!
//! This crate provides a Rust-controlled E2E testing harness that:
//! - Parses declarative YAML scenario files
//! - Translates each step into typed HTTP calls against a banking REST API
//! - Threads a per-scenario context through the steps
//! - Records request/response attachments and per-step results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Scenario Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── load scenarios (YAML) -> Vec<Scenario>               │
//! │    ├── provision fixtures -> ScenarioContext                │
//! │    ├── execute_step(step, &mut ctx) -> StepResult           │
//! │    └── write_results() -> scenario-results.json             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (YAML)                                            │
//! │    ├── name, description, tags, fixtures                    │
//! │    └── steps: [Step]                                        │
//! │          ├── prepare_create_account { currency }            │
//! │          ├── send_create_account / retrieve_account         │
//! │          ├── deposit / withdraw / transfer { amount, .. }   │
//! │          └── assert_* { expected status, body fields }      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ApiClient (reqwest)                                        │
//! │    ├── POST /account                                        │
//! │    ├── GET  /account/{id}                                   │
//! │    └── POST /transaction/{deposit,withdraw,transfer}        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod steps;

pub use client::ApiClient;
pub use config::HarnessConfig;
pub use context::ScenarioContext;
pub use error::{HarnessError, HarnessResult};
pub use report::{ScenarioResult, StepResult, SuiteResult};
pub use runner::{RunnerConfig, ScenarioRunner};
pub use scenario::{Scenario, Step};
