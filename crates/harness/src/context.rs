//! Per-scenario mutable state
//!
//! One `ScenarioContext` is created empty at scenario start, written by
//! steps in execution order, and dropped at scenario end. It is owned by
//! exactly one running scenario and never shared. Accessors return a
//! `MissingContext` error when a step reads state that no earlier step
//! populated.

use serde::{Deserialize, Serialize};

use crate::client::ApiResponse;
use crate::error::{HarnessError, HarnessResult};

/// An account referenced by transfer steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
    pub balance: Option<f64>,
    pub currency: Option<String>,
}

impl AccountRef {
    /// Reference by id only, balance and currency unknown
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: None,
            currency: None,
        }
    }
}

/// Mutable state bag threaded through one scenario's steps
#[derive(Debug, Default)]
pub struct ScenarioContext {
    /// Last constructed request body, kept for reporting
    pub payload: Option<serde_json::Value>,

    /// Last received response
    pub response: Option<ApiResponse>,

    /// Most recently created or referenced account id
    pub account_id: Option<String>,

    /// Fixture-seeded account ids, set at most once per scenario
    pub debit_account_id: Option<String>,
    pub credit_account_id: Option<String>,

    /// Accounts resolved for transfer steps
    pub debit_account: Option<AccountRef>,
    pub credit_account: Option<AccountRef>,

    /// Assumed balance for withdrawal scenarios; a test-data assumption,
    /// never verified against the live account
    pub balance: Option<f64>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&self) -> HarnessResult<&serde_json::Value> {
        self.payload
            .as_ref()
            .ok_or(HarnessError::MissingContext("payload"))
    }

    pub fn response(&self) -> HarnessResult<&ApiResponse> {
        self.response
            .as_ref()
            .ok_or(HarnessError::MissingContext("response"))
    }

    pub fn account_id(&self) -> HarnessResult<&str> {
        self.account_id
            .as_deref()
            .ok_or(HarnessError::MissingContext("account_id"))
    }

    pub fn debit_account_id(&self) -> HarnessResult<&str> {
        self.debit_account_id
            .as_deref()
            .ok_or(HarnessError::MissingContext("debit_account_id"))
    }

    pub fn credit_account_id(&self) -> HarnessResult<&str> {
        self.credit_account_id
            .as_deref()
            .ok_or(HarnessError::MissingContext("credit_account_id"))
    }

    pub fn debit_account(&self) -> HarnessResult<&AccountRef> {
        self.debit_account
            .as_ref()
            .ok_or(HarnessError::MissingContext("debit_account"))
    }

    pub fn credit_account(&self) -> HarnessResult<&AccountRef> {
        self.credit_account
            .as_ref()
            .ok_or(HarnessError::MissingContext("credit_account"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_unpopulated_response_is_a_precondition_error() {
        let ctx = ScenarioContext::new();
        let err = ctx.response().unwrap_err();
        assert!(err.to_string().contains("response"));
    }

    #[test]
    fn reading_unpopulated_transfer_accounts_fails() {
        let ctx = ScenarioContext::new();
        assert!(ctx.debit_account().is_err());
        assert!(ctx.credit_account().is_err());
    }

    #[test]
    fn populated_fields_read_back() {
        let mut ctx = ScenarioContext::new();
        ctx.account_id = Some("7".to_string());
        ctx.debit_account = Some(AccountRef::by_id("8"));

        assert_eq!(ctx.account_id().unwrap(), "7");
        assert_eq!(ctx.debit_account().unwrap().id, "8");
    }
}
