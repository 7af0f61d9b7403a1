//! Fixture provisioning
//!
//! Fixtures run before any scenario step. A failed fixture aborts the
//! scenario immediately; fixture setup is never retried.

use tracing::info;

use crate::client::{ApiClient, CreateAccountRequest};
use crate::context::ScenarioContext;
use crate::error::{HarnessError, HarnessResult};
use crate::report::Attachment;
use crate::scenario::Fixture;

/// Currency used for fixture-seeded accounts
const FIXTURE_CURRENCY: &str = "USD";

/// Provision the given fixtures into a fresh context, returning the
/// attachments recorded along the way.
pub async fn provision(
    fixtures: &[Fixture],
    client: &ApiClient,
    ctx: &mut ScenarioContext,
) -> HarnessResult<Vec<Attachment>> {
    let mut attachments = Vec::new();

    for fixture in fixtures {
        match fixture {
            Fixture::SeedAccounts => seed_accounts(client, ctx, &mut attachments).await?,
        }
    }

    Ok(attachments)
}

/// Create a debit and a credit account and store both ids in the context.
async fn seed_accounts(
    client: &ApiClient,
    ctx: &mut ScenarioContext,
    attachments: &mut Vec<Attachment>,
) -> HarnessResult<()> {
    let request = CreateAccountRequest {
        currency: FIXTURE_CURRENCY.to_string(),
    };

    info!("Creating a test debit account before scenario execution...");
    let response = client.create_account(&request).await?;
    if response.status != 201 {
        return Err(HarnessError::Fixture(format!(
            "failed to create test debit account. Response: {}",
            response.body
        )));
    }
    attachments.push(Attachment::json("Seeded Debit Account", response.body.clone()));
    let debit_id = response.id()?;
    info!("Test debit account created with ID: {}", debit_id);

    info!("Creating a test credit account before scenario execution...");
    let response = client.create_account(&request).await?;
    if response.status != 201 {
        return Err(HarnessError::Fixture(format!(
            "failed to create test credit account. Response: {}",
            response.body
        )));
    }
    attachments.push(Attachment::json("Seeded Credit Account", response.body.clone()));
    let credit_id = response.id()?;
    info!("Test credit account created with ID: {}", credit_id);

    ctx.debit_account_id = Some(debit_id);
    ctx.credit_account_id = Some(credit_id);

    Ok(())
}
