//! Transaction routes: declaration/invoice records converted to THB.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thbfx_core::auth::{Principal, authorize};
use thbfx_core::currency::{AMOUNT_SCALE, RATE_SCALE, RateSource, THB_SCALE};
use thbfx_core::transaction::{
    NormalizedTransaction, TransactionDraft, TransactionQuery, parse_iso_date,
};
use thbfx_db::entities::transactions;
use thbfx_db::{CurrencyRepository, TransactionRepository, TransactionWithRelations};
use thbfx_shared::AppError;
use thbfx_shared::types::{PageResponse, UserId};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::AuthUser,
    routes::currencies::CurrencyResponse,
};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Page number, from 1.
    pub page: Option<u64>,
    /// Page size, 1 to 100.
    pub limit: Option<u64>,
    /// Matches declaration or invoice number.
    pub search: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
    /// Earliest declaration date, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Latest declaration date, `YYYY-MM-DD`.
    pub date_to: Option<String>,
}

/// Creator summary embedded in responses.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
}

/// Transaction as returned by the API. Decimals are fixed-scale strings.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: i32,
    /// Declaration number.
    pub declaration_number: String,
    /// Declaration date.
    pub declaration_date: NaiveDate,
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Currency code.
    pub currency_code: String,
    /// Foreign amount, 4 places.
    pub foreign_amount: String,
    /// Exchange rate, 6 places.
    pub exchange_rate: String,
    /// THB amount, 2 places.
    pub thb_amount: String,
    /// Rate lookup date.
    pub rate_date: NaiveDate,
    /// Rate provenance.
    pub rate_source: RateSource,
    /// Creator.
    pub created_by: Uuid,
    /// Notes.
    pub notes: Option<String>,
    /// Created timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated timestamp.
    pub updated_at: DateTime<FixedOffset>,
    /// Creator summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    /// Currency details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyResponse>,
}

fn fixed(mut value: Decimal, scale: u32) -> String {
    value.rescale(scale);
    value.to_string()
}

impl From<transactions::Model> for TransactionResponse {
    fn from(t: transactions::Model) -> Self {
        Self {
            id: t.id,
            declaration_number: t.declaration_number,
            declaration_date: t.declaration_date,
            invoice_number: t.invoice_number,
            invoice_date: t.invoice_date,
            currency_code: t.currency_code,
            foreign_amount: fixed(t.foreign_amount, AMOUNT_SCALE),
            exchange_rate: fixed(t.exchange_rate, RATE_SCALE),
            thb_amount: fixed(t.thb_amount, THB_SCALE),
            rate_date: t.rate_date,
            rate_source: t.rate_source.into(),
            created_by: t.created_by,
            notes: t.notes,
            created_at: t.created_at,
            updated_at: t.updated_at,
            user: None,
            currency: None,
        }
    }
}

impl From<TransactionWithRelations> for TransactionResponse {
    fn from(row: TransactionWithRelations) -> Self {
        Self {
            user: row.user.map(|u| UserSummary {
                id: u.id,
                name: u.name,
                email: u.email,
            }),
            currency: row.currency.map(Into::into),
            ..Self::from(row.transaction)
        }
    }
}

fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_iso_date(v)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{field} must be in YYYY-MM-DD format"))),
    }
}

/// Builds the list state for `principal` from request parameters.
fn build_query(principal: &Principal, params: &ListTransactionsQuery) -> Result<TransactionQuery, AppError> {
    let mut query = TransactionQuery::for_principal(principal);
    if let Some(search) = &params.search {
        query.set_search(search);
    }
    if let Some(currency) = &params.currency {
        query.set_currency(currency);
    }
    query.set_date_from(optional_date("date_from", params.date_from.as_deref())?);
    query.set_date_to(optional_date("date_to", params.date_to.as_deref())?);
    if let Some(limit) = params.limit {
        query.set_limit(limit);
    }
    query.go_to_page(params.page.unwrap_or(1));
    Ok(query)
}

/// Validates a submitted record against the currency table.
async fn normalize(state: &AppState, draft: &TransactionDraft) -> ApiResult<NormalizedTransaction> {
    let codes = CurrencyRepository::new((*state.db).clone()).codes().await?;
    Ok(draft.normalize(|code| codes.iter().any(|c| c == code))?)
}

/// Loads a record and applies the access rule: missing before forbidden.
async fn load_authorized(
    repo: &TransactionRepository,
    principal: &Principal,
    id: i32,
) -> ApiResult<transactions::Model> {
    let existing = repo.find_by_id(id).await?;
    authorize(
        principal,
        existing.as_ref().map(|t| UserId::from_uuid(t.created_by)),
    )?;
    existing.ok_or_else(|| AppError::NotFound("Transaction not found".to_string()).into())
}

/// GET `/transactions` - List visible transactions.
async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(params): ApiQuery<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = build_query(&principal, &params)?;
    let (rows, total) = TransactionRepository::new((*state.db).clone())
        .list(&query)
        .await?;

    let page = PageResponse::new(rows, query.page(), total).map(TransactionResponse::from);
    Ok(Json(page))
}

/// GET `/transactions/{id}` - One transaction.
async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    load_authorized(&repo, &principal, id).await?;

    let row = repo
        .find_with_relations(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    Ok(Json(json!({ "data": TransactionResponse::from(row) })))
}

/// POST `/transactions` - Create a transaction owned by the caller.
async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(draft): ApiJson<TransactionDraft>,
) -> ApiResult<impl IntoResponse> {
    let record = normalize(&state, &draft).await?;

    let created = TransactionRepository::new((*state.db).clone())
        .create(&record, principal.id.into_inner())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": TransactionResponse::from(created) })),
    ))
}

/// PUT `/transactions/{id}` - Replace a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(draft): ApiJson<TransactionDraft>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    load_authorized(&repo, &principal, id).await?;

    let record = normalize(&state, &draft).await?;
    let updated = repo.update(id, &record).await?;

    Ok(Json(json!({ "data": TransactionResponse::from(updated) })))
}

/// DELETE `/transactions/{id}` - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    load_authorized(&repo, &principal, id).await?;

    repo.delete(id).await?;

    Ok(Json(json!({ "message": "Transaction deleted" })))
}
