//! Step library: translate scenario steps into API calls and assertions
//!
//! Request-issuing steps build a typed request, call the adapter, and
//! store the response in the context. Assertion steps only read the
//! stored response. Every step records attachments for the report.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::client::{ApiClient, CreateAccountRequest, TransactionRequest, TransferRequest};
use crate::context::{AccountRef, ScenarioContext};
use crate::error::HarnessResult;
use crate::report::{Attachment, StepResult};
use crate::scenario::Step;

/// Fixed identifier guaranteed not to exist, for not-found paths
pub const SENTINEL_ACCOUNT_ID: &str = "999999999";

/// The two transaction endpoints sharing one payload shape
#[derive(Debug, Clone, Copy)]
enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    fn name(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }

    fn title(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
        }
    }
}

/// Executes scenario steps against one API client
pub struct StepExecutor<'a> {
    client: &'a ApiClient,
}

impl<'a> StepExecutor<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute a single step, capturing its outcome and attachments
    pub async fn execute_step(&self, step: &Step, ctx: &mut ScenarioContext) -> StepResult {
        let start = Instant::now();
        let step_name = step_name(step);
        debug!("Executing step: {}", step_name);

        let mut attachments = Vec::new();
        let result = self.dispatch(step, ctx, &mut attachments).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => StepResult {
                step_name,
                success: true,
                duration_ms,
                error: None,
                attachments,
            },
            Err(e) => StepResult {
                step_name,
                success: false,
                duration_ms,
                error: Some(e.to_string()),
                attachments,
            },
        }
    }

    async fn dispatch(
        &self,
        step: &Step,
        ctx: &mut ScenarioContext,
        attachments: &mut Vec<Attachment>,
    ) -> HarnessResult<()> {
        match step {
            Step::PrepareCreateAccount { currency } => {
                info!("Preparing to create account with currency: {}", currency);
                ctx.payload = Some(serde_json::json!({ "currency": currency }));
                Ok(())
            }
            Step::SendCreateAccount => self.send_create_account(ctx, attachments).await,
            Step::AssertAccountCreated => assert_account_created(ctx, attachments),
            Step::UseCreatedAccount => {
                let id = ctx.account_id()?;
                info!("Using created account ID: {}", id);
                Ok(())
            }
            Step::UseNonexistentAccount => {
                info!("Using a non-existent account ID: {}", SENTINEL_ACCOUNT_ID);
                ctx.account_id = Some(SENTINEL_ACCOUNT_ID.to_string());
                Ok(())
            }
            Step::UseExistingAccount => {
                let id = ctx.debit_account_id()?.to_string();
                info!("Using seeded account ID: {}", id);
                ctx.account_id = Some(id);
                Ok(())
            }
            Step::RetrieveAccount => self.retrieve_account(ctx, attachments).await,
            Step::AssertAccountDetails => assert_account_details(ctx, attachments),
            Step::AssertAccountNotFound => {
                let response = ctx.response()?;
                attachments.push(Attachment::text(
                    "Non-Existent Account Response",
                    response.body.clone(),
                ));
                response.require_status(404)?;
                warn!("Account not found, as expected.");
                Ok(())
            }
            Step::Deposit { amount, currency } => {
                self.transaction(ctx, attachments, TransactionKind::Deposit, *amount, currency)
                    .await
            }
            Step::Withdraw { amount, currency } => {
                self.transaction(ctx, attachments, TransactionKind::Withdraw, *amount, currency)
                    .await
            }
            Step::AssumeBalance {
                account_id,
                balance,
            } => {
                if let Some(id) = account_id {
                    ctx.account_id = Some(id.clone());
                }
                ctx.balance = Some(*balance);
                info!(
                    "Assuming balance {} for account {:?}",
                    balance, ctx.account_id
                );
                Ok(())
            }
            Step::UseSeededDebitAccount => {
                let id = ctx.debit_account_id()?.to_string();
                info!("Using debit account ID {}", id);
                let account = AccountRef::by_id(id);
                attachments.push(Attachment::json(
                    "Debit Account Details",
                    serde_json::to_string(&account)?,
                ));
                ctx.debit_account = Some(account);
                Ok(())
            }
            Step::UseSeededCreditAccount => {
                let id = ctx.credit_account_id()?.to_string();
                info!("Using credit account ID {}", id);
                let account = AccountRef::by_id(id);
                attachments.push(Attachment::json(
                    "Credit Account Details",
                    serde_json::to_string(&account)?,
                ));
                ctx.credit_account = Some(account);
                Ok(())
            }
            Step::UseNonexistentDebitAccount => {
                info!("Using non-existent debit account ID {}", SENTINEL_ACCOUNT_ID);
                ctx.debit_account = Some(AccountRef::by_id(SENTINEL_ACCOUNT_ID));
                Ok(())
            }
            Step::UseNonexistentCreditAccount => {
                info!(
                    "Using non-existent credit account ID {}",
                    SENTINEL_ACCOUNT_ID
                );
                ctx.credit_account = Some(AccountRef::by_id(SENTINEL_ACCOUNT_ID));
                Ok(())
            }
            Step::FundDebitAccount { balance, currency } => {
                self.fund_debit_account(ctx, attachments, *balance, currency)
                    .await
            }
            Step::Transfer { amount, currency } => {
                self.transfer(ctx, attachments, *amount, currency).await
            }
            Step::AssertSuccess => assert_status(ctx, attachments, 200),
            Step::AssertStatus { status } => assert_status(ctx, attachments, *status),
        }
    }

    async fn send_create_account(
        &self,
        ctx: &mut ScenarioContext,
        attachments: &mut Vec<Attachment>,
    ) -> HarnessResult<()> {
        let payload = ctx.payload()?.clone();
        let request: CreateAccountRequest = serde_json::from_value(payload.clone())?;

        info!("Sending account creation request: {}", payload);
        attachments.push(Attachment::json(
            "Create Account Request Payload",
            payload.to_string(),
        ));

        let response = self.client.create_account(&request).await?;
        attachments.push(Attachment::json("Create Account API Response", response.body.clone()));
        info!("Response: {} - {}", response.status, response.body);

        if response.status == 201 {
            ctx.account_id = Some(response.id()?);
        }
        ctx.response = Some(response);
        Ok(())
    }

    async fn retrieve_account(
        &self,
        ctx: &mut ScenarioContext,
        attachments: &mut Vec<Attachment>,
    ) -> HarnessResult<()> {
        let id = ctx.account_id()?.to_string();
        info!("Retrieving account {}", id);

        let response = self.client.get_account(&id).await?;
        attachments.push(Attachment::json(
            "Retrieve Account API Response",
            response.body.clone(),
        ));
        info!("Response: {} - {}", response.status, response.body);

        ctx.response = Some(response);
        Ok(())
    }

    /// Deposit and withdraw share one payload shape and differ only in
    /// the endpoint.
    async fn transaction(
        &self,
        ctx: &mut ScenarioContext,
        attachments: &mut Vec<Attachment>,
        kind: TransactionKind,
        amount: f64,
        currency: &str,
    ) -> HarnessResult<()> {
        let request = TransactionRequest {
            account_id: ctx.account_id()?.to_string(),
            amount,
            currency: currency.to_string(),
        };
        let payload = serde_json::to_value(&request)?;
        attachments.push(Attachment::json(
            format!("{} Request Payload", kind.title()),
            payload.to_string(),
        ));
        ctx.payload = Some(payload);

        info!("Sending {} request: {:?}", kind.name(), request);
        let response = match kind {
            TransactionKind::Deposit => self.client.deposit(&request).await?,
            TransactionKind::Withdraw => self.client.withdraw(&request).await?,
        };

        attachments.push(Attachment::text(
            format!("{} API Response Code", kind.title()),
            format!("Status Code: {}", response.status),
        ));
        attachments.push(Attachment::json(
            format!("{} API Response Body", kind.title()),
            response.body.clone(),
        ));
        info!("Response: {} - {}", response.status, response.body);

        ctx.response = Some(response);
        Ok(())
    }

    /// Two-call given: create a fresh account, then fund it.
    async fn fund_debit_account(
        &self,
        ctx: &mut ScenarioContext,
        attachments: &mut Vec<Attachment>,
        balance: f64,
        currency: &str,
    ) -> HarnessResult<()> {
        let create = CreateAccountRequest {
            currency: currency.to_string(),
        };
        let response = self.client.create_account(&create).await?;
        attachments.push(Attachment::json(
            "Debit Account Creation Response",
            response.body.clone(),
        ));
        response.require_status(201)?;
        let id = response.id()?;
        info!("Created new debit account with ID: {} in {}", id, currency);

        let deposit = TransactionRequest {
            account_id: id.clone(),
            amount: balance,
            currency: currency.to_string(),
        };
        attachments.push(Attachment::json(
            "Deposit Request Payload",
            serde_json::to_string(&deposit)?,
        ));
        let response = self.client.deposit(&deposit).await?;
        attachments.push(Attachment::json("Deposit API Response", response.body.clone()));
        response.require_status(200)?;
        info!("Deposited {} {} into account {}", balance, currency, id);

        ctx.debit_account_id = Some(id.clone());
        ctx.debit_account = Some(AccountRef {
            id,
            balance: Some(balance),
            currency: Some(currency.to_string()),
        });
        Ok(())
    }

    async fn transfer(
        &self,
        ctx: &mut ScenarioContext,
        attachments: &mut Vec<Attachment>,
        amount: f64,
        currency: &str,
    ) -> HarnessResult<()> {
        let request = TransferRequest {
            debit_account_id: ctx.debit_account()?.id.clone(),
            credit_account_id: ctx.credit_account()?.id.clone(),
            amount,
            currency: currency.to_string(),
        };
        let payload = serde_json::to_value(&request)?;
        attachments.push(Attachment::json(
            "Transfer Request Payload",
            payload.to_string(),
        ));
        ctx.payload = Some(payload);

        info!("Sending transfer request: {:?}", request);
        let response = self.client.transfer(&request).await?;
        attachments.push(Attachment::json("Transfer API Response", response.body.clone()));
        info!("Response: {} - {}", response.status, response.body);

        ctx.response = Some(response);
        Ok(())
    }
}

/// Assert 201 on the stored response and re-extract the id. Safe to run
/// more than once against the same response.
fn assert_account_created(
    ctx: &mut ScenarioContext,
    attachments: &mut Vec<Attachment>,
) -> HarnessResult<()> {
    let response = ctx.response()?;
    response.require_status(201)?;

    let id = response.id()?;
    attachments.push(Attachment::json("Created Account Details", response.body.clone()));
    info!("Account creation successful. ID: {}", id);

    ctx.account_id = Some(id);
    Ok(())
}

/// Assert 200 and the presence of `id`, `currency`, and `balance`.
fn assert_account_details(
    ctx: &ScenarioContext,
    attachments: &mut Vec<Attachment>,
) -> HarnessResult<()> {
    let response = ctx.response()?;
    response.require_status(200)?;

    for field in ["id", "currency", "balance"] {
        response.field(field)?;
    }

    attachments.push(Attachment::json("Retrieved Account Details", response.body.clone()));
    info!("Account details retrieved: {}", response.body);
    Ok(())
}

/// Assert an exact status. The body is attached as JSON when it parses
/// and as raw text otherwise; a malformed body never fails the step on
/// its own.
fn assert_status(
    ctx: &ScenarioContext,
    attachments: &mut Vec<Attachment>,
    expected: u16,
) -> HarnessResult<()> {
    let response = ctx.response()?;
    attachments.push(Attachment::text(
        "API Status Code",
        format!("Status Code: {}", response.status),
    ));

    match response.json() {
        Some(json) => {
            attachments.push(Attachment::json("API Response", json.to_string()));
        }
        None => {
            warn!("API returned a body that is not valid JSON: {}", response.body);
            attachments.push(Attachment::text(
                "API Response (Invalid JSON)",
                response.body.clone(),
            ));
        }
    }

    response.require_status(expected)
}

/// Short display name for a step, used in logs and results
pub fn step_name(step: &Step) -> String {
    match step {
        Step::PrepareCreateAccount { currency } => format!("prepare_create_account:{}", currency),
        Step::SendCreateAccount => "send_create_account".to_string(),
        Step::AssertAccountCreated => "assert_account_created".to_string(),
        Step::UseCreatedAccount => "use_created_account".to_string(),
        Step::UseNonexistentAccount => "use_nonexistent_account".to_string(),
        Step::UseExistingAccount => "use_existing_account".to_string(),
        Step::RetrieveAccount => "retrieve_account".to_string(),
        Step::AssertAccountDetails => "assert_account_details".to_string(),
        Step::AssertAccountNotFound => "assert_account_not_found".to_string(),
        Step::Deposit { amount, currency } => format!("deposit:{} {}", amount, currency),
        Step::Withdraw { amount, currency } => format!("withdraw:{} {}", amount, currency),
        Step::AssumeBalance { balance, .. } => format!("assume_balance:{}", balance),
        Step::UseSeededDebitAccount => "use_seeded_debit_account".to_string(),
        Step::UseSeededCreditAccount => "use_seeded_credit_account".to_string(),
        Step::UseNonexistentDebitAccount => "use_nonexistent_debit_account".to_string(),
        Step::UseNonexistentCreditAccount => "use_nonexistent_credit_account".to_string(),
        Step::FundDebitAccount { balance, currency } => {
            format!("fund_debit_account:{} {}", balance, currency)
        }
        Step::Transfer { amount, currency } => format!("transfer:{} {}", amount, currency),
        Step::AssertSuccess => "assert_success".to_string(),
        Step::AssertStatus { status } => format!("assert_status:{}", status),
    }
}
