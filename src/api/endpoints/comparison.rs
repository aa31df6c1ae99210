//! Static versus context-aware alert comparison.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ComparisonResponse};
use crate::models::AlertFilter;

/// `GET /api/comparison`
pub async fn summary(
    State(ctx): State<ApiContext>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let store = ctx.core.store();
    let state = store.get_simulation_state()?;
    let alerts = store.get_alerts(&AlertFilter::default())?;
    Ok(Json(ComparisonResponse::from_alerts(
        state.current_hour,
        &alerts,
    )))
}
