//! Currency listing routes.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use serde_json::{Value, json};
use thbfx_db::{CurrencyRepository, entities::currencies};

use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the currency routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// Response for a currency.
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyResponse {
    /// Currency code (ISO 4217).
    pub code: String,
    /// Thai name.
    pub name_th: String,
    /// English name.
    pub name_en: String,
    /// Currency symbol.
    pub symbol: String,
}

impl From<currencies::Model> for CurrencyResponse {
    fn from(c: currencies::Model) -> Self {
        Self {
            code: c.code,
            name_th: c.name_th,
            name_en: c.name_en,
            symbol: c.symbol,
        }
    }
}

/// GET `/currencies` - List all currencies.
async fn list_currencies(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Json<Value>> {
    let currencies = CurrencyRepository::new((*state.db).clone()).list().await?;
    let data: Vec<CurrencyResponse> = currencies.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "data": data })))
}
