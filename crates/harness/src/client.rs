//! Typed HTTP adapter for the banking API
//!
//! Request bodies are explicit structs per endpoint rather than loose
//! key/value maps, so shape errors surface at build time instead of at
//! the API boundary. Non-2xx statuses are not errors at this layer;
//! only transport failures are.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};

/// Body for `POST /account`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub currency: String,
}

/// Body for `POST /transaction/deposit` and `POST /transaction/withdraw`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub account_id: String,
    pub amount: f64,
    pub currency: String,
}

/// Body for `POST /transaction/transfer`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub debit_account_id: String,
    pub credit_account_id: String,
    pub amount: f64,
    pub currency: String,
}

/// Account representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub currency: String,
    pub balance: f64,
}

/// Status and raw body of an API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON, if it is JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Fail unless the status matches the expected one
    pub fn require_status(&self, expected: u16) -> HarnessResult<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(HarnessError::StatusMismatch {
                expected,
                actual: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// Extract a named field from the JSON body
    pub fn field(&self, name: &'static str) -> HarnessResult<serde_json::Value> {
        self.json()
            .and_then(|v| v.get(name).cloned())
            .ok_or_else(|| HarnessError::MissingField {
                field: name,
                body: self.body.clone(),
            })
    }

    /// Extract the `id` field as a string, accepting numeric ids too
    pub fn id(&self) -> HarnessResult<String> {
        match self.field("id")? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            _ => Err(HarnessError::MissingField {
                field: "id",
                body: self.body.clone(),
            }),
        }
    }
}

/// HTTP client for the banking API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with the configured base URL and request timeout
    pub fn new(config: &HarnessConfig) -> HarnessResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client points at
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /account`
    pub async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> HarnessResult<ApiResponse> {
        self.post_json("/account", request).await
    }

    /// `GET /account/{id}`
    pub async fn get_account(&self, id: &str) -> HarnessResult<ApiResponse> {
        let url = format!("{}/account/{}", self.base_url, id);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Response: {} - {}", status, body);

        Ok(ApiResponse { status, body })
    }

    /// `POST /transaction/deposit`
    pub async fn deposit(&self, request: &TransactionRequest) -> HarnessResult<ApiResponse> {
        self.post_json("/transaction/deposit", request).await
    }

    /// `POST /transaction/withdraw`
    pub async fn withdraw(&self, request: &TransactionRequest) -> HarnessResult<ApiResponse> {
        self.post_json("/transaction/withdraw", request).await
    }

    /// `POST /transaction/transfer`
    pub async fn transfer(&self, request: &TransferRequest) -> HarnessResult<ApiResponse> {
        self.post_json("/transaction/transfer", request).await
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> HarnessResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} {}", url, serde_json::to_string(body)?);

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Response: {} - {}", status, body);

        Ok(ApiResponse { status, body })
    }
}
