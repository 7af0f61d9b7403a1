//! In-process mock of the banking API for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use bankcheck_harness::client::{CreateAccountRequest, TransactionRequest, TransferRequest};

#[derive(Clone, Default)]
pub struct Bank {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    next_id: Arc<AtomicU64>,
}

pub struct Account {
    currency: String,
    balance: f64,
}

fn account_json(id: &str, account: &Account) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "currency": account.currency,
        "balance": account.balance,
    })
}

fn error_json(message: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message }))
}

async fn create_account(
    State(bank): State<Bank>,
    Json(request): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let id = (1000 + bank.next_id.fetch_add(1, Ordering::SeqCst)).to_string();
    let account = Account {
        currency: request.currency,
        balance: 0.0,
    };
    let body = account_json(&id, &account);
    bank.accounts.lock().unwrap().insert(id, account);

    (StatusCode::CREATED, Json(body))
}

async fn get_account(State(bank): State<Bank>, Path(id): Path<String>) -> impl IntoResponse {
    match bank.accounts.lock().unwrap().get(&id) {
        Some(account) => (StatusCode::OK, Json(account_json(&id, account))).into_response(),
        None => (StatusCode::NOT_FOUND, error_json("account not found")).into_response(),
    }
}

async fn deposit(
    State(bank): State<Bank>,
    Json(request): Json<TransactionRequest>,
) -> impl IntoResponse {
    if request.amount <= 0.0 {
        return (StatusCode::BAD_REQUEST, error_json("amount must be positive")).into_response();
    }

    let mut accounts = bank.accounts.lock().unwrap();
    match accounts.get_mut(&request.account_id) {
        Some(account) => {
            account.balance += request.amount;
            (StatusCode::OK, Json(account_json(&request.account_id, account))).into_response()
        }
        None => (StatusCode::NOT_FOUND, error_json("account not found")).into_response(),
    }
}

async fn withdraw(
    State(bank): State<Bank>,
    Json(request): Json<TransactionRequest>,
) -> impl IntoResponse {
    let mut accounts = bank.accounts.lock().unwrap();
    let Some(account) = accounts.get_mut(&request.account_id) else {
        return (StatusCode::NOT_FOUND, error_json("account not found")).into_response();
    };

    if request.amount <= 0.0 {
        return (StatusCode::BAD_REQUEST, error_json("amount must be positive")).into_response();
    }
    if account.balance < request.amount {
        return (StatusCode::BAD_REQUEST, error_json("insufficient funds")).into_response();
    }

    account.balance -= request.amount;
    (StatusCode::OK, Json(account_json(&request.account_id, account))).into_response()
}

async fn transfer(
    State(bank): State<Bank>,
    Json(request): Json<TransferRequest>,
) -> impl IntoResponse {
    let mut accounts = bank.accounts.lock().unwrap();

    if !accounts.contains_key(&request.debit_account_id) {
        return (StatusCode::NOT_FOUND, error_json("debit account not found")).into_response();
    }
    if !accounts.contains_key(&request.credit_account_id) {
        return (StatusCode::NOT_FOUND, error_json("credit account not found")).into_response();
    }
    if request.amount <= 0.0 {
        return (StatusCode::BAD_REQUEST, error_json("amount must be positive")).into_response();
    }

    let debit_balance = accounts[&request.debit_account_id].balance;
    if debit_balance < request.amount {
        return (StatusCode::BAD_REQUEST, error_json("insufficient funds")).into_response();
    }

    accounts.get_mut(&request.debit_account_id).unwrap().balance -= request.amount;
    accounts.get_mut(&request.credit_account_id).unwrap().balance += request.amount;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "debitAccountId": request.debit_account_id,
            "creditAccountId": request.credit_account_id,
            "amount": request.amount,
            "currency": request.currency,
        })),
    )
        .into_response()
}

fn bank_router(bank: Bank) -> Router {
    Router::new()
        .route("/account", post(create_account))
        .route("/account/:id", get(get_account))
        .route("/transaction/deposit", post(deposit))
        .route("/transaction/withdraw", post(withdraw))
        .route("/transaction/transfer", post(transfer))
        .with_state(bank)
}

async fn spawn_router(app: Router) -> String {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Spawn a fresh mock bank on an ephemeral port and return its base URL
pub async fn spawn() -> String {
    spawn_router(bank_router(Bank::default())).await
}

/// A bank whose account-creation endpoint is down
pub async fn spawn_unavailable() -> String {
    let app = Router::new().route(
        "/account",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "maintenance") }),
    );
    spawn_router(app).await
}

/// A bank whose transfer endpoint answers 200 with a non-JSON body
pub async fn spawn_with_opaque_transfer() -> String {
    let bank = Bank::default();
    let app = Router::new()
        .route("/account", post(create_account))
        .route("/account/:id", get(get_account))
        .route("/transaction/deposit", post(deposit))
        .route("/transaction/withdraw", post(withdraw))
        .route(
            "/transaction/transfer",
            post(|| async { (StatusCode::OK, "transfer accepted") }),
        )
        .with_state(bank);
    spawn_router(app).await
}
