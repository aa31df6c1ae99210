//! Drug-pair interaction knowledge base.
//!
//! Read-only after load. Matching is by drug code and is order-independent.

use thiserror::Error;

use crate::models::DrugPair;

const BUNDLED_DRUG_PAIRS: &str = include_str!("../../resources/drug_pairs.json");

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Failed to parse drug pair data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Drug pair {drug_a} + {drug_b} has invalid toxicity multiplier {value}")]
    InvalidMultiplier {
        drug_a: String,
        drug_b: String,
        value: f64,
    },
}

/// Lookup seam consumed by the stepper and the risk endpoint.
pub trait InteractionLookup: Send + Sync {
    fn all_pairs(&self) -> &[DrugPair];

    fn find_pair(&self, code_a: &str, code_b: &str) -> Option<&DrugPair> {
        self.all_pairs()
            .iter()
            .find(|p| p.matches_codes(code_a, code_b))
    }

    fn interactions_for_drug(&self, code: &str) -> Vec<&DrugPair> {
        self.all_pairs().iter().filter(|p| p.involves(code)).collect()
    }

    /// Known pairs among every unordered combination of `codes`, in the
    /// order the combinations are visited.
    fn interacting_pairs(&self, codes: &[String]) -> Vec<DrugPair> {
        let mut pairs = Vec::new();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                if let Some(pair) = self.find_pair(a, b) {
                    pairs.push(pair.clone());
                }
            }
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pairs: Vec<DrugPair>,
}

impl KnowledgeBase {
    /// Load the drug pairs compiled into the binary.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED_DRUG_PAIRS)
    }

    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let pairs: Vec<DrugPair> = serde_json::from_str(json)?;
        Self::new(pairs)
    }

    pub fn new(pairs: Vec<DrugPair>) -> Result<Self, KnowledgeError> {
        for pair in &pairs {
            if !(pair.toxicity_multiplier >= 1.0 && pair.toxicity_multiplier.is_finite()) {
                return Err(KnowledgeError::InvalidMultiplier {
                    drug_a: pair.drug_a.clone(),
                    drug_b: pair.drug_b.clone(),
                    value: pair.toxicity_multiplier,
                });
            }
        }
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl InteractionLookup for KnowledgeBase {
    fn all_pairs(&self) -> &[DrugPair] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bundled_data_loads() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert!(!kb.is_empty());
        assert!(kb.all_pairs().iter().all(|p| p.toxicity_multiplier >= 1.0));
    }

    #[test]
    fn find_pair_is_order_independent() {
        let kb = KnowledgeBase::bundled().unwrap();
        let forward = kb.find_pair("VANC", "GENT").unwrap();
        let reverse = kb.find_pair("GENT", "VANC").unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.drug_a, "Vancomycin");
    }

    #[test]
    fn unknown_codes_find_nothing() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert!(kb.find_pair("VANC", "XXXX").is_none());
        assert!(kb.interacting_pairs(&codes(&["PROP", "FENT"])).is_empty());
        assert!(kb.interacting_pairs(&[]).is_empty());
    }

    #[test]
    fn interacting_pairs_scans_all_combinations() {
        let kb = KnowledgeBase::bundled().unwrap();
        let pairs = kb.interacting_pairs(&codes(&["VANC", "NORE", "GENT", "FURO"]));
        let names: Vec<(String, String)> = pairs.iter().map(|p| p.names()).collect();
        assert_eq!(
            names,
            vec![
                ("Vancomycin".to_string(), "Gentamicin".to_string()),
                ("Vancomycin".to_string(), "Furosemide".to_string()),
                ("Gentamicin".to_string(), "Furosemide".to_string()),
            ]
        );
    }

    #[test]
    fn interactions_for_drug_filters_by_code() {
        let kb = KnowledgeBase::bundled().unwrap();
        let vanc = kb.interactions_for_drug("VANC");
        assert_eq!(vanc.len(), 2);
        assert!(vanc.iter().all(|p| p.involves("VANC")));
    }

    #[test]
    fn rejects_multiplier_below_one() {
        let json = r#"[{
            "drugA": "A", "drugB": "B", "drugCodeA": "A", "drugCodeB": "B",
            "clearanceRoute": "renal", "toxicityMultiplier": 0.5,
            "mechanism": "m", "riskDescription": "r", "recommendation": "x"
        }]"#;
        let err = KnowledgeBase::from_json(json).unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidMultiplier { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = KnowledgeBase::from_json("{not json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }
}
