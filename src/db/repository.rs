//! Row-level SQLite operations. Each entity is read into a raw row type
//! inside the rusqlite closure, then converted with enum and UUID parsing
//! outside it so failures surface as `StoreError`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::StoreError;
use crate::models::enums::*;
use crate::models::*;

fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::ConstraintViolation(e.to_string()))
}

// ═══════════════════════════════════════════
// Patients
// ═══════════════════════════════════════════

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO patients (id, name, age, sex, weight_kg, comorbidities,
         baseline_creatinine, baseline_gfr, unit, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.id,
            patient.name,
            patient.age,
            patient.sex,
            patient.weight_kg,
            serde_json::to_string(&patient.comorbidities)?,
            patient.baseline_creatinine,
            patient.baseline_gfr,
            patient.unit,
            patient.status.as_str(),
        ],
    )?;
    Ok(())
}

struct PatientRow {
    id: String,
    name: String,
    age: u32,
    sex: String,
    weight_kg: f64,
    comorbidities: String,
    baseline_creatinine: f64,
    baseline_gfr: f64,
    unit: String,
    status: String,
}

const PATIENT_COLUMNS: &str = "id, name, age, sex, weight_kg, comorbidities,
     baseline_creatinine, baseline_gfr, unit, status";

fn patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        sex: row.get(3)?,
        weight_kg: row.get(4)?,
        comorbidities: row.get(5)?,
        baseline_creatinine: row.get(6)?,
        baseline_gfr: row.get(7)?,
        unit: row.get(8)?,
        status: row.get(9)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, StoreError> {
    Ok(Patient {
        id: row.id,
        name: row.name,
        age: row.age,
        sex: row.sex,
        weight_kg: row.weight_kg,
        comorbidities: serde_json::from_str(&row.comorbidities)?,
        baseline_creatinine: row.baseline_creatinine,
        baseline_gfr: row.baseline_gfr,
        unit: row.unit,
        status: PatientStatus::from_str(&row.status)?,
    })
}

pub fn get_patients(conn: &Connection) -> Result<Vec<Patient>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY rowid"))?;
    let rows = stmt
        .query_map([], patient_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(patient_from_row).collect()
}

pub fn get_patient(conn: &Connection, id: &str) -> Result<Option<Patient>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"))?;
    stmt.query_row(params![id], patient_row)
        .optional()?
        .map(patient_from_row)
        .transpose()
}

// ═══════════════════════════════════════════
// Medications
// ═══════════════════════════════════════════

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO medications (id, patient_id, drug_name, drug_code, dose, route,
         frequency, start_time, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            med.id.to_string(),
            med.patient_id,
            med.drug_name,
            med.drug_code,
            med.dose,
            med.route,
            med.frequency,
            med.start_time,
            med.status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_medications(
    conn: &Connection,
    patient_id: Option<&str>,
) -> Result<Vec<Medication>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, drug_name, drug_code, dose, route, frequency, start_time, status
         FROM medications WHERE (?1 IS NULL OR patient_id = ?1) ORDER BY seq",
    )?;

    let rows = stmt
        .query_map(params![patient_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, DateTime<Utc>>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(id, patient_id, drug_name, drug_code, dose, route, frequency, start_time, status)| {
                Ok(Medication {
                    id: parse_uuid(&id)?,
                    patient_id,
                    drug_name,
                    drug_code,
                    dose,
                    route,
                    frequency,
                    start_time,
                    status: MedicationStatus::from_str(&status)?,
                })
            },
        )
        .collect()
}

// ═══════════════════════════════════════════
// Lab results
// ═══════════════════════════════════════════

pub fn insert_lab_result(conn: &Connection, lab: &LabResult) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO lab_results (id, patient_id, lab_type, value, unit, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            lab.id.to_string(),
            lab.patient_id,
            lab.lab_type.as_str(),
            lab.value,
            lab.unit,
            lab.timestamp,
        ],
    )?;
    Ok(())
}

pub fn get_lab_results(
    conn: &Connection,
    patient_id: Option<&str>,
) -> Result<Vec<LabResult>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, lab_type, value, unit, timestamp
         FROM lab_results WHERE (?1 IS NULL OR patient_id = ?1) ORDER BY seq",
    )?;

    let rows = stmt
        .query_map(params![patient_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, DateTime<Utc>>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, patient_id, lab_type, value, unit, timestamp)| {
            Ok(LabResult {
                id: parse_uuid(&id)?,
                patient_id,
                lab_type: LabType::from_str(&lab_type)?,
                value,
                unit,
                timestamp,
            })
        })
        .collect()
}

// ═══════════════════════════════════════════
// Alerts
// ═══════════════════════════════════════════

pub fn insert_alert(conn: &Connection, alert: &Alert) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO alerts (id, patient_id, alert_type, severity, title, mechanism,
         risk_projection, recommendation, drug_a, drug_b, risk_score, status,
         clinician_feedback, created_at, simulation_hour)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            alert.id.to_string(),
            alert.patient_id,
            alert.alert_type.as_str(),
            alert.severity.as_str(),
            alert.title,
            alert.mechanism,
            alert.risk_projection,
            alert.recommendation,
            alert.drug_pair.0,
            alert.drug_pair.1,
            alert.risk_score,
            alert.status.as_str(),
            alert.clinician_feedback,
            alert.created_at,
            alert.simulation_hour,
        ],
    )?;
    Ok(())
}

struct AlertRow {
    id: String,
    patient_id: String,
    alert_type: String,
    severity: String,
    title: String,
    mechanism: String,
    risk_projection: String,
    recommendation: String,
    drug_a: String,
    drug_b: String,
    risk_score: f64,
    status: String,
    clinician_feedback: Option<String>,
    created_at: DateTime<Utc>,
    simulation_hour: u32,
}

const ALERT_COLUMNS: &str = "id, patient_id, alert_type, severity, title, mechanism,
     risk_projection, recommendation, drug_a, drug_b, risk_score, status,
     clinician_feedback, created_at, simulation_hour";

fn alert_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRow> {
    Ok(AlertRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        alert_type: row.get(2)?,
        severity: row.get(3)?,
        title: row.get(4)?,
        mechanism: row.get(5)?,
        risk_projection: row.get(6)?,
        recommendation: row.get(7)?,
        drug_a: row.get(8)?,
        drug_b: row.get(9)?,
        risk_score: row.get(10)?,
        status: row.get(11)?,
        clinician_feedback: row.get(12)?,
        created_at: row.get(13)?,
        simulation_hour: row.get(14)?,
    })
}

fn alert_from_row(row: AlertRow) -> Result<Alert, StoreError> {
    Ok(Alert {
        id: parse_uuid(&row.id)?,
        patient_id: row.patient_id,
        alert_type: AlertType::from_str(&row.alert_type)?,
        severity: AlertSeverity::from_str(&row.severity)?,
        title: row.title,
        mechanism: row.mechanism,
        risk_projection: row.risk_projection,
        recommendation: row.recommendation,
        drug_pair: (row.drug_a, row.drug_b),
        risk_score: row.risk_score,
        status: AlertStatus::from_str(&row.status)?,
        clinician_feedback: row.clinician_feedback,
        created_at: row.created_at,
        simulation_hour: row.simulation_hour,
    })
}

pub fn get_alerts(conn: &Connection, filter: &AlertFilter) -> Result<Vec<Alert>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ALERT_COLUMNS} FROM alerts
         WHERE (?1 IS NULL OR patient_id = ?1)
           AND (?2 IS NULL OR alert_type = ?2)
           AND (?3 IS NULL OR status = ?3)
         ORDER BY seq"
    ))?;

    let rows = stmt
        .query_map(
            params![
                filter.patient_id,
                filter.alert_type.map(|t| t.as_str()),
                filter.status.map(|s| s.as_str()),
            ],
            alert_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(alert_from_row).collect()
}

pub fn get_alert(conn: &Connection, id: &Uuid) -> Result<Option<Alert>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?1"))?;
    stmt.query_row(params![id.to_string()], alert_row)
        .optional()?
        .map(alert_from_row)
        .transpose()
}

pub fn update_alert_fields(
    conn: &Connection,
    id: &Uuid,
    status: AlertStatus,
    clinician_feedback: Option<&str>,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE alerts SET status = ?2, clinician_feedback = ?3 WHERE id = ?1",
        params![id.to_string(), status.as_str(), clinician_feedback],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("alert", id));
    }
    Ok(())
}

/// Supersede active context-aware alerts for a patient, optionally only
/// those for one (unordered) drug pair.
pub fn supersede_context_alerts(
    conn: &Connection,
    patient_id: &str,
    drug_pair: Option<(&str, &str)>,
) -> Result<usize, StoreError> {
    let changed = match drug_pair {
        Some((a, b)) => conn.execute(
            "UPDATE alerts SET status = 'superseded'
             WHERE patient_id = ?1 AND alert_type = 'context_aware' AND status = 'active'
               AND ((drug_a = ?2 AND drug_b = ?3) OR (drug_a = ?3 AND drug_b = ?2))",
            params![patient_id, a, b],
        )?,
        None => conn.execute(
            "UPDATE alerts SET status = 'superseded'
             WHERE patient_id = ?1 AND alert_type = 'context_aware' AND status = 'active'",
            params![patient_id],
        )?,
    };
    Ok(changed)
}

// ═══════════════════════════════════════════
// Audit log
// ═══════════════════════════════════════════

pub fn insert_audit_log(conn: &Connection, log: &AuditLog) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO audit_log (id, alert_id, patient_id, action, actor, details, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.alert_id.map(|id| id.to_string()),
            log.patient_id,
            log.action.as_str(),
            log.actor.as_str(),
            serde_json::to_string(&log.details)?,
            log.timestamp,
        ],
    )?;
    Ok(())
}

pub fn get_audit_logs(
    conn: &Connection,
    patient_id: Option<&str>,
) -> Result<Vec<AuditLog>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, alert_id, patient_id, action, actor, details, timestamp
         FROM audit_log WHERE (?1 IS NULL OR patient_id = ?1) ORDER BY seq",
    )?;

    let rows = stmt
        .query_map(params![patient_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, DateTime<Utc>>(6)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, alert_id, patient_id, action, actor, details, timestamp)| {
            Ok(AuditLog {
                id: parse_uuid(&id)?,
                alert_id: alert_id.as_deref().map(parse_uuid).transpose()?,
                patient_id,
                action: AuditAction::from_str(&action)?,
                actor: Actor::from_str(&actor)?,
                details: serde_json::from_str(&details)?,
                timestamp,
            })
        })
        .collect()
}

// ═══════════════════════════════════════════
// Simulation state (singleton row id = 1)
// ═══════════════════════════════════════════

pub fn get_simulation_state(conn: &Connection) -> Result<SimulationState, StoreError> {
    let state = conn.query_row(
        "SELECT current_hour, is_playing, last_applied_hour FROM simulation_state WHERE id = 1",
        [],
        |row| {
            Ok(SimulationState {
                current_hour: row.get(0)?,
                is_playing: row.get(1)?,
                last_applied_hour: row.get(2)?,
            })
        },
    )?;
    Ok(state)
}

pub fn save_simulation_state(conn: &Connection, state: &SimulationState) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE simulation_state SET current_hour = ?1, is_playing = ?2, last_applied_hour = ?3
         WHERE id = 1",
        params![state.current_hour, state.is_playing, state.last_applied_hour],
    )?;
    Ok(())
}

/// Wipe every generated row and reload the seed dataset.
pub fn clear_all(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "DELETE FROM audit_log;
         DELETE FROM alerts;
         DELETE FROM lab_results;
         DELETE FROM medications;
         DELETE FROM patients;
         UPDATE simulation_state SET current_hour = 0, is_playing = 0, last_applied_hour = NULL
         WHERE id = 1;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::seed::seed_data;

    fn seeded() -> Connection {
        let conn = open_memory_database().unwrap();
        let seed = seed_data(Utc::now());
        for p in &seed.patients {
            insert_patient(&conn, p).unwrap();
        }
        for m in &seed.medications {
            insert_medication(&conn, m).unwrap();
        }
        for l in &seed.labs {
            insert_lab_result(&conn, l).unwrap();
        }
        conn
    }

    #[test]
    fn patient_round_trip_preserves_comorbidities() {
        let conn = seeded();
        let patient = get_patient(&conn, "patient-2").unwrap().unwrap();
        assert_eq!(patient.name, "Maria Santos");
        assert_eq!(patient.comorbidities.len(), 3);
        assert_eq!(patient.status, PatientStatus::Admitted);
        assert!(get_patient(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn medications_filter_by_patient() {
        let conn = seeded();
        assert_eq!(get_medications(&conn, Some("patient-1")).unwrap().len(), 12);
        assert_eq!(get_medications(&conn, None).unwrap().len(), 30);
    }

    #[test]
    fn lab_timestamps_survive_storage() {
        let conn = seeded();
        let lab = LabResult::new("patient-3", LabType::Bun, 21.0, "mg/dL", Utc::now());
        insert_lab_result(&conn, &lab).unwrap();
        let labs = get_lab_results(&conn, Some("patient-3")).unwrap();
        let stored = labs.last().unwrap();
        assert_eq!(stored.id, lab.id);
        assert_eq!(stored.timestamp, lab.timestamp);
        assert_eq!(stored.lab_type, LabType::Bun);
    }

    #[test]
    fn lab_for_unknown_patient_violates_foreign_key() {
        let conn = seeded();
        let lab = LabResult::new("ghost", LabType::Gfr, 50.0, "mL/min", Utc::now());
        assert!(insert_lab_result(&conn, &lab).is_err());
    }

    #[test]
    fn invalid_enum_in_row_is_reported() {
        let conn = seeded();
        conn.execute("UPDATE lab_results SET lab_type = 'sodium' WHERE patient_id = 'patient-2'", [])
            .unwrap();
        let err = get_lab_results(&conn, Some("patient-2")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidEnum { .. }));
    }

    #[test]
    fn simulation_state_round_trip() {
        let conn = seeded();
        let state = SimulationState {
            current_hour: 24,
            is_playing: true,
            last_applied_hour: Some(24),
        };
        save_simulation_state(&conn, &state).unwrap();
        assert_eq!(get_simulation_state(&conn).unwrap(), state);
    }
}
