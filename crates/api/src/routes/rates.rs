//! Exchange-rate lookup route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use thbfx_core::currency::{BOT_CURRENCIES, RateResult, is_bot_currency, is_local_currency};
use thbfx_core::transaction::parse_iso_date;
use thbfx_shared::AppError;
use tracing::info;

use crate::{
    AppState, error::ApiResult, extract::ApiPath, middleware::AuthUser, services::attempt_fetch,
};

/// Creates the rate routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/rates/{currency}/{date}", get(get_rate))
}

/// GET `/rates/{currency}/{date}` - Rate for a currency on a day.
///
/// `404 RATE_UNAVAILABLE` tells the client to fall back to manual entry.
async fn get_rate(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath((currency, date)): ApiPath<(String, String)>,
) -> ApiResult<Response> {
    let currency = currency.trim().to_ascii_uppercase();

    let date = parse_iso_date(&date).ok_or_else(|| {
        AppError::Validation("Invalid date format. Use YYYY-MM-DD".to_string())
    })?;

    if !is_local_currency(&currency) && !is_bot_currency(&currency) {
        return Err(AppError::Validation(format!(
            "Invalid currency. Supported: THB, {}",
            BOT_CURRENCIES.join(", ")
        ))
        .into());
    }

    match attempt_fetch(state.rate_provider.as_ref(), &currency, date).await {
        RateResult::Available(quote) => {
            info!(user_id = %principal.id, currency = %currency, %date, source = %quote.source, "Rate served");
            Ok((StatusCode::OK, Json(json!({ "data": quote }))).into_response())
        }
        RateResult::Unavailable => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "RATE_UNAVAILABLE",
                "message": "Exchange rate not available. You can enter the rate manually.",
                "data": null,
            })),
        )
            .into_response()),
    }
}
