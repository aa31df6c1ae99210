//! Alert feed and clinician feedback.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{AlertPatch, AlertQuery, ApiContext, SuccessResponse};
use crate::db::StoreError;
use crate::models::enums::{Actor, AuditAction};
use crate::models::{Alert, AlertFilter, AlertUpdate, AuditLog};

/// `GET /api/alerts?patientId=&alertType=`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    let filter = AlertFilter {
        patient_id: query.patient_id,
        alert_type: query.alert_type,
        ..AlertFilter::default()
    };
    Ok(Json(ctx.core.store().get_alerts(&filter)?))
}

/// `PATCH /api/alerts/:id`: dismiss, confirm or annotate an alert.
///
/// Every change is recorded in the audit trail with the status the alert
/// held before the update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(patch): Json<AlertPatch>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let alert_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid alert ID".into()))?;

    let store = ctx.core.store();
    let previous = store
        .get_alert(&alert_id)?
        .ok_or_else(|| ApiError::NotFound("Alert not found".into()))?;

    let update = AlertUpdate {
        status: patch.status,
        clinician_feedback: patch.clinician_feedback,
    };
    let updated = store.update_alert(&alert_id, &update).map_err(|e| match e {
        StoreError::NotFound { .. } => ApiError::NotFound("Alert not found".into()),
        other => other.into(),
    })?;

    store.insert_audit_log(&AuditLog::new(
        Some(alert_id),
        &updated.patient_id,
        AuditAction::for_status_change(update.status),
        Actor::Clinician,
        serde_json::json!({
            "status": update.status,
            "clinicianFeedback": update.clinician_feedback,
            "previousStatus": previous.status,
        }),
    ))?;

    tracing::info!(
        alert_id = %alert_id,
        patient_id = %updated.patient_id,
        status = %updated.status,
        "Alert updated by clinician"
    );

    Ok(Json(SuccessResponse { success: true }))
}
