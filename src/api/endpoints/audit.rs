//! Audit trail endpoint.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PatientQuery};
use crate::models::AuditLog;

/// `GET /api/audit?patientId=`: newest first. Without `patientId`, the
/// whole trail.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<Vec<AuditLog>>, ApiError> {
    let mut logs = ctx.core.store().get_audit_logs(query.require())?;
    // Stored oldest first; reversing before the stable sort keeps later
    // inserts ahead on equal timestamps.
    logs.reverse();
    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(Json(logs))
}
