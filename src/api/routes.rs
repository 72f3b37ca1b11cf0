//! API Routes
//!
//! HTTP endpoint definitions for `/bankaccount`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Account, AccountType, BalancePatch, Card, ClientType, NewAccount};
use crate::error::{AppError, AppResult};
use crate::service::{AccountService, ServiceError};
use crate::store::AccountStream;

// =========================================================================
// Request/Response types
// =========================================================================

/// Body of a successful create
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub obj: Account,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
///
/// Handlers take their path and body extractors as `Result`, so malformed
/// input is answered by `AppError::InvalidRequest`.
pub fn create_router() -> Router<AccountService> {
    Router::new()
        .route("/bankaccount", get(find_all).post(create_account))
        .route(
            "/bankaccount/:id",
            get(find_by_id).put(edit_balance).delete(delete_account),
        )
        .route(
            "/bankaccount/typeClient/:code_client/:type_client",
            get(find_by_type_client),
        )
        .route("/bankaccount/client/:code_client", get(find_by_code_client))
        // GET takes an account type code, PUT an account number
        .route(
            "/bankaccount/client/:code_client/:key",
            get(find_by_type_account).put(assign_card),
        )
        .route(
            "/bankaccount/account/:code_client/:account_number",
            get(find_by_account_number),
        )
        .route(
            "/bankaccount/main/:client_code/:card_number",
            get(find_main_account),
        )
}

async fn collect(accounts: AccountStream) -> AppResult<Json<Vec<Account>>> {
    let accounts: Vec<Account> = accounts.try_collect().await.map_err(ServiceError::from)?;
    Ok(Json(accounts))
}

fn not_found(key: impl std::fmt::Display) -> AppError {
    AppError::AccountNotFound(key.to_string())
}

// =========================================================================
// GET /bankaccount
// =========================================================================

async fn find_all(State(service): State<AccountService>) -> AppResult<Json<Vec<Account>>> {
    collect(service.find_all()).await
}

// =========================================================================
// GET /bankaccount/:id
// =========================================================================

async fn find_by_id(
    State(service): State<AccountService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Account>> {
    let Path(id) = path?;
    service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

// =========================================================================
// GET /bankaccount/typeClient/:code_client/:type_client
// =========================================================================

async fn find_by_type_client(
    State(service): State<AccountService>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> AppResult<Json<Vec<Account>>> {
    let Path((code_client, type_client)) = path?;
    let client_type = ClientType::from_code(type_client)?;
    collect(service.find_by_code_client_and_type_client(&code_client, client_type)).await
}

// =========================================================================
// GET /bankaccount/client/:code_client
// =========================================================================

async fn find_by_code_client(
    State(service): State<AccountService>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Vec<Account>>> {
    let Path(code_client) = path?;
    collect(service.find_by_code_client(&code_client)).await
}

// =========================================================================
// GET /bankaccount/client/:code_client/:type_account
// =========================================================================

async fn find_by_type_account(
    State(service): State<AccountService>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> AppResult<Json<Vec<Account>>> {
    let Path((code_client, type_account)) = path?;
    let account_type = AccountType::from_code(type_account)?;
    collect(service.find_by_code_client_and_type_account(&code_client, account_type)).await
}

// =========================================================================
// GET /bankaccount/account/:code_client/:account_number
// =========================================================================

async fn find_by_account_number(
    State(service): State<AccountService>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> AppResult<Json<Account>> {
    let Path((code_client, account_number)) = path?;
    service
        .find_by_code_client_and_account_number(&code_client, &account_number)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(format!("{}/{}", code_client, account_number)))
}

// =========================================================================
// POST /bankaccount
// =========================================================================

async fn create_account(
    State(service): State<AccountService>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let result = service.create(payload).await?;
    let location = format!("/bankaccount/{}", result.obj.account_number());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreateAccountResponse {
            obj: result.obj,
            message: result.message,
            timestamp: Utc::now(),
        }),
    ))
}

// =========================================================================
// PUT /bankaccount/:id
// =========================================================================

/// Only `balance` is read from the body; other fields are ignored
async fn edit_balance(
    State(service): State<AccountService>,
    path: Result<Path<Uuid>, PathRejection>,
    patch: Result<Json<BalancePatch>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(patch) = patch?;
    let account = service
        .edit_balance(id, patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    let location = format!("/bankaccount/{}", account.account_number());

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(account)))
}

// =========================================================================
// DELETE /bankaccount/:id
// =========================================================================

async fn delete_account(
    State(service): State<AccountService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    service.delete(id).await?.ok_or_else(|| not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// PUT /bankaccount/client/:code_client/:account_number
// =========================================================================

async fn assign_card(
    State(service): State<AccountService>,
    path: Result<Path<(String, String)>, PathRejection>,
    card: Result<Json<Card>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path((code_client, account_number)) = path?;
    let Json(card) = card?;
    let account = service
        .assign_card(&code_client, &account_number, card)
        .await?
        .ok_or_else(|| not_found(format!("{}/{}", code_client, account_number)))?;
    let location = format!("/bankaccount/client/{}/{}", code_client, account_number);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(account)))
}

// =========================================================================
// GET /bankaccount/main/:client_code/:card_number
// =========================================================================

async fn find_main_account(
    State(service): State<AccountService>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> AppResult<Json<Account>> {
    let Path((client_code, card_number)) = path?;
    service
        .main_account(&client_code, &card_number)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(format!("{}/{}", client_code, card_number)))
}
