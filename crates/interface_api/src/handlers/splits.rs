//! Split handlers

use axum::{extract::State, Json};
use domain_settlement::compute_split;
use tracing::debug;
use validator::Validate;

use crate::dto::splits::{SplitRequest, SplitResponse};
use crate::{error::ApiError, AppState};

/// Computes shares, balances and transfers for one bill snapshot
///
/// Stateless: nothing about the request is kept after the response.
pub async fn create_split(
    State(state): State<AppState>,
    Json(request): Json<SplitRequest>,
) -> Result<Json<SplitResponse>, ApiError> {
    request.validate()?;

    let currency = request.currency(state.config.default_currency)?;
    let bill = request.to_bill(currency)?;
    let mode = request.payer_mode(currency)?;
    let config = state.config.settlement_config(request.strategy);

    debug!(
        participants = bill.roster().len(),
        items = bill.items().len(),
        %currency,
        "Computing split"
    );

    let outcome = compute_split(&bill, &mode, config)?;

    Ok(Json(SplitResponse::from_outcome(outcome, currency, config.epsilon)))
}
