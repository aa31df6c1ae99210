//! Shift handover endpoint.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientQuery};
use crate::engine::{generate_handover_summary, HandoverSummary};
use crate::models::AlertFilter;

/// `GET /api/handover?patientId=`
pub async fn summary(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<HandoverSummary>, ApiError> {
    let patient_id = query.require().ok_or(ApiError::MissingInput("patientId"))?;

    let store = ctx.core.store();
    if store.get_patient(patient_id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }

    let alerts = store.get_alerts(&AlertFilter::for_patient(patient_id))?;
    let medications = store.get_medications(Some(patient_id))?;
    let labs = store.get_lab_results(Some(patient_id))?;

    Ok(Json(generate_handover_summary(
        patient_id,
        &alerts,
        &medications,
        &labs,
    )))
}
