//! Live risk view: every active interaction for one patient, scored
//! against the current lab picture, with its intervention card.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, InteractionRisk, PatientQuery, RiskResponse};
use crate::engine::{generate_intervention_card, RenalSnapshot};
use crate::models::active_drug_codes;

/// `GET /api/risk?patientId=`
pub async fn assess(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<RiskResponse>, ApiError> {
    let patient_id = query.require().ok_or(ApiError::MissingInput("patientId"))?;

    let store = ctx.core.store();
    let patient = store
        .get_patient(patient_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    let medications = store.get_medications(Some(patient_id))?;
    let labs = store.get_lab_results(Some(patient_id))?;
    let snapshot = RenalSnapshot::from_labs(&patient, &labs);

    let interactions = ctx
        .core
        .knowledge()
        .interacting_pairs(&active_drug_codes(&medications))
        .into_iter()
        .map(|pair| {
            let risk_score = snapshot.score(&pair);
            let intervention = generate_intervention_card(
                &risk_score,
                &pair,
                snapshot.current_creatinine,
                snapshot.current_gfr,
            );
            InteractionRisk {
                drug_pair: pair,
                risk_score,
                intervention,
            }
        })
        .collect();

    Ok(Json(RiskResponse {
        patient_id: patient.id,
        current_creatinine: snapshot.current_creatinine,
        current_gfr: snapshot.current_gfr,
        baseline_creatinine: snapshot.baseline_creatinine,
        interactions,
    }))
}
