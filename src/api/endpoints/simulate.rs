//! Simulation control endpoints.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AdvanceResponse, ApiContext, SimulateRequest};
use crate::models::SimulationState;

/// `POST /api/simulate`: `reset`, `advance`, `play` or `pause`.
///
/// `reset` restores seed data and immediately applies hour 0. `advance`
/// applies `targetHour`, or the next scheduled hour when omitted.
pub async fn control(
    State(ctx): State<ApiContext>,
    Json(request): Json<SimulateRequest>,
) -> Result<Response, ApiError> {
    let simulation = ctx.core.simulation();
    match request.action.as_str() {
        "reset" => Ok(Json(simulation.reset_and_prime()?).into_response()),
        "advance" => {
            let tick = simulation.advance(request.target_hour)?;
            Ok(Json(AdvanceResponse {
                success: true,
                hour: tick.hour,
                results: tick.results,
            })
            .into_response())
        }
        "play" => Ok(Json(simulation.set_playing(true)?).into_response()),
        "pause" => Ok(Json(simulation.set_playing(false)?).into_response()),
        other => Err(ApiError::BadRequest(format!("Invalid action: {other:?}"))),
    }
}

/// `GET /api/simulate`: the current simulation clock.
pub async fn state(State(ctx): State<ApiContext>) -> Result<Json<SimulationState>, ApiError> {
    Ok(Json(ctx.core.simulation().state()?))
}
