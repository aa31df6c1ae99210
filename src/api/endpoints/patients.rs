//! Patient list and detail endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientDetail, PatientOverview};
use crate::models::AlertFilter;

/// `GET /api/patients`: every patient with latest renal labs and alert counts.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<PatientOverview>>, ApiError> {
    let store = ctx.core.store();
    let mut overviews = Vec::new();
    for patient in store.get_patients()? {
        let labs = store.get_lab_results(Some(patient.id.as_str()))?;
        let alerts = store.get_alerts(&AlertFilter::for_patient(&patient.id))?;
        overviews.push(PatientOverview::new(patient, &labs, &alerts));
    }
    Ok(Json(overviews))
}

/// `GET /api/patients/:id`: patient with medications, labs and alerts.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<PatientDetail>, ApiError> {
    let store = ctx.core.store();
    let patient = store
        .get_patient(&id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    let medications = store.get_medications(Some(id.as_str()))?;

    let mut labs = store.get_lab_results(Some(id.as_str()))?;
    labs.sort_by_key(|l| l.timestamp);

    let mut alerts = store.get_alerts(&AlertFilter::for_patient(&id))?;
    alerts.reverse();
    alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(PatientDetail {
        patient,
        medications,
        labs,
        alerts,
    }))
}
