//! Declarative YAML scenario model

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{HarnessError, HarnessResult};

/// Scenario names matched case-insensitively against this set get the
/// `seed_accounts` fixture when no explicit `fixtures:` list is given.
/// Kept for suites written against the old naming convention.
const LEGACY_FIXTURE_KEYWORDS: &[&str] = &[
    "existing account",
    "debit account",
    "credit account",
    "transfer money",
];

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Fixtures to provision before any step runs
    #[serde(default)]
    pub fixtures: Vec<Fixture>,

    /// Steps to execute in order
    pub steps: Vec<Step>,
}

/// Pre-scenario setup selected explicitly per scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fixture {
    /// Create a debit and a credit account (USD) and store both ids
    SeedAccounts,
}

/// A single step in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Build an account-creation payload with the given currency
    PrepareCreateAccount { currency: String },

    /// Send the previously built account-creation payload
    SendCreateAccount,

    /// Require 201 on the stored response and re-extract the account id
    AssertAccountCreated,

    /// Require that an account id from a previous step is present
    UseCreatedAccount,

    /// Point the context at the non-existent sentinel account
    UseNonexistentAccount,

    /// Use the fixture-seeded debit account as the account in context,
    /// so deposit and withdraw steps run against a seeded account
    UseExistingAccount,

    /// Look up the account id currently in context
    RetrieveAccount,

    /// Require 200 and `id`, `currency`, `balance` fields in the body
    AssertAccountDetails,

    /// Require 404 on the stored response
    AssertAccountNotFound,

    /// Deposit into the account currently in context
    Deposit {
        #[serde(deserialize_with = "de_amount")]
        amount: f64,
        currency: String,
    },

    /// Withdraw from the account currently in context
    Withdraw {
        #[serde(deserialize_with = "de_amount")]
        amount: f64,
        currency: String,
    },

    /// Record an assumed balance (and optionally an account id) without
    /// checking it against the API
    AssumeBalance {
        #[serde(default)]
        account_id: Option<String>,
        #[serde(deserialize_with = "de_amount")]
        balance: f64,
    },

    /// Use the fixture-seeded debit account for the transfer
    UseSeededDebitAccount,

    /// Use the fixture-seeded credit account for the transfer
    UseSeededCreditAccount,

    /// Use the non-existent sentinel as the debit account
    UseNonexistentDebitAccount,

    /// Use the non-existent sentinel as the credit account
    UseNonexistentCreditAccount,

    /// Create a fresh debit account and fund it with the given balance
    FundDebitAccount {
        #[serde(deserialize_with = "de_amount")]
        balance: f64,
        currency: String,
    },

    /// Transfer between the debit and credit accounts in context
    Transfer {
        #[serde(deserialize_with = "de_amount")]
        amount: f64,
        currency: String,
    },

    /// Require 200 on the stored response
    AssertSuccess,

    /// Require an exact status on the stored response
    AssertStatus { status: u16 },
}

/// Accept amounts as YAML numbers or as decimal strings; step text like
/// `"50.25"` must reach the payload as `50.25` unchanged.
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

impl Scenario {
    /// Parse a scenario from a YAML string
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        serde_yaml::from_str(yaml).map_err(HarnessError::from)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            HarnessError::ScenarioParse(format!("{}: {}", path.display(), e))
        })
    }

    /// Load all scenarios from a directory, in path order
    pub fn load_all(dir: &Path) -> HarnessResult<Vec<Self>> {
        let mut paths: Vec<_> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        paths.sort();

        let mut scenarios = Vec::new();
        for path in paths {
            scenarios.push(Self::from_file(&path)?);
        }

        Ok(scenarios)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(scenarios: &'a [Self], tag: &str) -> Vec<&'a Self> {
        scenarios
            .iter()
            .filter(|s| s.tags.contains(&tag.to_string()))
            .collect()
    }

    /// Fixtures to provision: the explicit list wins; without one, the
    /// legacy keyword match on the scenario name decides.
    pub fn effective_fixtures(&self) -> Vec<Fixture> {
        if !self.fixtures.is_empty() {
            return self.fixtures.clone();
        }

        let name = self.name.to_lowercase();
        if LEGACY_FIXTURE_KEYWORDS.iter().any(|k| name.contains(k)) {
            vec![Fixture::SeedAccounts]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parse_account_scenario() {
        let yaml = r#"
name: create-account
description: Create an account and read it back
tags:
  - account
  - smoke
steps:
  - step: prepare_create_account
    currency: EUR
  - step: send_create_account
  - step: assert_account_created
  - step: retrieve_account
  - step: assert_account_details
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.name, "create-account");
        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(
            scenario.steps[0],
            Step::PrepareCreateAccount { ref currency } if currency == "EUR"
        ));
    }

    #[test]
    fn parse_transfer_scenario_with_explicit_fixture() {
        let yaml = r#"
name: transfer-success
fixtures:
  - seed_accounts
steps:
  - step: fund_debit_account
    balance: "100"
    currency: USD
  - step: use_seeded_credit_account
  - step: transfer
    amount: 40
    currency: USD
  - step: assert_success
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.effective_fixtures(), vec![Fixture::SeedAccounts]);
        assert!(matches!(
            scenario.steps[0],
            Step::FundDebitAccount { balance, .. } if balance == 100.0
        ));
    }

    #[test_case("50.25", 50.25 ; "decimal string")]
    #[test_case(" 10 ", 10.0 ; "padded string")]
    fn amount_parses_from_step_text(text: &str, expected: f64) {
        let yaml = format!(
            "name: t\nsteps:\n  - step: deposit\n    amount: \"{}\"\n    currency: USD\n",
            text
        );
        let scenario = Scenario::from_yaml(&yaml).unwrap();
        assert!(matches!(
            scenario.steps[0],
            Step::Deposit { amount, .. } if amount == expected
        ));
    }

    #[test]
    fn non_numeric_amount_is_a_parse_error() {
        let yaml = "name: t\nsteps:\n  - step: deposit\n    amount: \"lots\"\n    currency: USD\n";
        assert!(Scenario::from_yaml(yaml).is_err());
    }

    #[test_case("Transfer money between accounts", true ; "transfer keyword")]
    #[test_case("Deposit into an existing account", true ; "existing account keyword")]
    #[test_case("Retrieve a missing account", false ; "no keyword")]
    fn legacy_names_select_the_seed_fixture(name: &str, seeded: bool) {
        let scenario = Scenario {
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            fixtures: Vec::new(),
            steps: Vec::new(),
        };
        assert_eq!(
            scenario.effective_fixtures() == vec![Fixture::SeedAccounts],
            seeded
        );
    }

    #[test]
    fn explicit_fixtures_override_legacy_matching() {
        let yaml = "name: transfer money\nfixtures: [seed_accounts]\nsteps: []\n";
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.effective_fixtures(), vec![Fixture::SeedAccounts]);
    }

    #[test]
    fn filter_by_tag_matches_exactly() {
        let yaml = "name: a\ntags: [smoke]\nsteps: []\n";
        let a = Scenario::from_yaml(yaml).unwrap();
        let b = Scenario::from_yaml("name: b\nsteps: []\n").unwrap();
        let scenarios = vec![a, b];

        let smoke = Scenario::filter_by_tag(&scenarios, "smoke");
        assert_eq!(smoke.len(), 1);
        assert_eq!(smoke[0].name, "a");
    }
}
