//! Demonstration ICU census: three patients, their medication lists and
//! admission labs. Every store starts from (and resets to) this dataset.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::enums::{LabType, MedicationStatus, PatientStatus};
use crate::models::{LabResult, Medication, Patient};

pub struct SeedData {
    pub patients: Vec<Patient>,
    pub medications: Vec<Medication>,
    pub labs: Vec<LabResult>,
}

#[allow(clippy::too_many_arguments)]
fn patient(
    id: &str,
    name: &str,
    age: u32,
    sex: &str,
    weight_kg: f64,
    comorbidities: &[&str],
    baseline: (f64, f64),
    unit: &str,
    status: PatientStatus,
) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        age,
        sex: sex.to_string(),
        weight_kg,
        comorbidities: comorbidities.iter().map(|c| c.to_string()).collect(),
        baseline_creatinine: baseline.0,
        baseline_gfr: baseline.1,
        unit: unit.to_string(),
        status,
    }
}

// (drug name, code, dose, route, frequency)
type MedRow = (&'static str, &'static str, &'static str, &'static str, &'static str);

const PATIENT_1_MEDS: &[MedRow] = &[
    ("Vancomycin", "VANC", "1g", "IV", "Q12H"),
    ("Gentamicin", "GENT", "80mg", "IV", "Q8H"),
    ("Norepinephrine", "NORE", "0.1mcg/kg/min", "IV", "Continuous"),
    ("Normal Saline", "NS", "125mL/hr", "IV", "Continuous"),
    ("Propofol", "PROP", "20mcg/kg/min", "IV", "Continuous"),
    ("Fentanyl", "FENT", "50mcg/hr", "IV", "Continuous"),
    ("Heparin", "HEP", "5000 units", "SubQ", "Q8H"),
    ("Insulin (Regular)", "INS", "2-10 units/hr", "IV", "Continuous"),
    ("Pantoprazole", "PANT", "40mg", "IV", "Daily"),
    ("Metoprolol", "METO", "25mg", "PO", "BID"),
    ("Furosemide", "FURO", "20mg", "IV", "Q12H"),
    ("Dexmedetomidine", "DEX", "0.4mcg/kg/hr", "IV", "Continuous"),
];

const PATIENT_2_MEDS: &[MedRow] = &[
    ("Metformin", "METF", "500mg", "PO", "BID"),
    ("IV Contrast", "CNTR", "100mL", "IV", "Once"),
    ("Aspirin", "ASA", "81mg", "PO", "Daily"),
    ("Atorvastatin", "ATOR", "40mg", "PO", "Daily"),
    ("Clopidogrel", "CLOP", "75mg", "PO", "Daily"),
    ("Insulin Glargine", "IGLA", "22 units", "SubQ", "QHS"),
    ("Amlodipine", "AMLO", "5mg", "PO", "Daily"),
    ("Famotidine", "FAMO", "20mg", "IV", "BID"),
    ("Enoxaparin", "ENOX", "40mg", "SubQ", "Daily"),
];

const PATIENT_3_MEDS: &[MedRow] = &[
    ("Ketorolac", "KETO", "30mg", "IV", "Q6H"),
    ("Lisinopril", "LISI", "10mg", "PO", "Daily"),
    ("Omeprazole", "OMEP", "20mg", "PO", "Daily"),
    ("Hydromorphone", "HYDM", "0.5mg", "IV", "Q4H PRN"),
    ("Ondansetron", "ONDA", "4mg", "IV", "Q6H PRN"),
    ("Cefazolin", "CEFA", "2g", "IV", "Q8H"),
    ("Acetaminophen", "APAP", "1000mg", "PO", "Q6H"),
    ("Metoclopramide", "METC", "10mg", "IV", "Q6H PRN"),
    ("Heparin", "HEP", "5000 units", "SubQ", "Q12H"),
];

const BASELINE_LABS: &[(&str, &[(LabType, f64, &str)])] = &[
    (
        "patient-1",
        &[
            (LabType::Creatinine, 1.0, "mg/dL"),
            (LabType::Bun, 18.0, "mg/dL"),
            (LabType::Gfr, 95.0, "mL/min"),
            (LabType::Potassium, 4.2, "mEq/L"),
        ],
    ),
    (
        "patient-2",
        &[
            (LabType::Creatinine, 1.3, "mg/dL"),
            (LabType::Gfr, 68.0, "mL/min"),
            (LabType::Potassium, 4.0, "mEq/L"),
        ],
    ),
    (
        "patient-3",
        &[
            (LabType::Creatinine, 1.1, "mg/dL"),
            (LabType::Gfr, 82.0, "mL/min"),
            (LabType::Potassium, 4.4, "mEq/L"),
        ],
    ),
];

fn medications(patient_id: &str, rows: &[MedRow], now: DateTime<Utc>) -> Vec<Medication> {
    rows.iter()
        .map(|(name, code, dose, route, frequency)| Medication {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            drug_name: name.to_string(),
            drug_code: code.to_string(),
            dose: dose.to_string(),
            route: route.to_string(),
            frequency: frequency.to_string(),
            start_time: now,
            status: MedicationStatus::Active,
        })
        .collect()
}

/// Build the seed dataset with every timestamp set to `now`.
pub fn seed_data(now: DateTime<Utc>) -> SeedData {
    let patients = vec![
        patient(
            "patient-1",
            "Robert Chen",
            68,
            "M",
            82.0,
            &["Sepsis", "Type 2 Diabetes", "Hypertension"],
            (1.0, 95.0),
            "ICU Bed 4",
            PatientStatus::Critical,
        ),
        patient(
            "patient-2",
            "Maria Santos",
            72,
            "F",
            65.0,
            &["Type 2 Diabetes", "CKD Stage 2", "Coronary Artery Disease"],
            (1.3, 68.0),
            "ICU Bed 7",
            PatientStatus::Admitted,
        ),
        patient(
            "patient-3",
            "James Wilson",
            55,
            "M",
            95.0,
            &["Hypertension", "Post-surgical", "Osteoarthritis"],
            (1.1, 82.0),
            "ICU Bed 12",
            PatientStatus::Admitted,
        ),
    ];

    let mut meds = medications("patient-1", PATIENT_1_MEDS, now);
    meds.extend(medications("patient-2", PATIENT_2_MEDS, now));
    meds.extend(medications("patient-3", PATIENT_3_MEDS, now));

    let labs = BASELINE_LABS
        .iter()
        .flat_map(|(patient_id, rows)| {
            rows.iter()
                .map(move |(lab_type, value, unit)| {
                    LabResult::new(patient_id, *lab_type, *value, unit, now)
                })
        })
        .collect();

    SeedData {
        patients,
        medications: meds,
        labs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_three_patients_and_their_meds() {
        let seed = seed_data(Utc::now());
        assert_eq!(seed.patients.len(), 3);
        assert_eq!(seed.medications.len(), 12 + 9 + 9);
        assert_eq!(seed.labs.len(), 10);
        assert!(seed.medications.iter().all(|m| m.is_active()));
    }

    #[test]
    fn baseline_creatinine_matches_admission_lab() {
        let seed = seed_data(Utc::now());
        for patient in &seed.patients {
            let lab = seed
                .labs
                .iter()
                .find(|l| l.patient_id == patient.id && l.lab_type == LabType::Creatinine)
                .unwrap();
            assert_eq!(lab.value, patient.baseline_creatinine);
        }
    }
}
