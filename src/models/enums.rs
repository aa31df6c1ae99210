use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(PatientStatus {
    Admitted => "admitted",
    Discharged => "discharged",
    Critical => "critical",
});

str_enum!(MedicationStatus {
    Active => "active",
    Discontinued => "discontinued",
    Held => "held",
});

str_enum!(LabType {
    Creatinine => "creatinine",
    Bun => "bun",
    Gfr => "gfr",
    Potassium => "potassium",
    Ast => "ast",
    Alt => "alt",
});

impl LabType {
    /// Every lab type, in handover display order.
    pub const ALL: [LabType; 6] = [
        LabType::Creatinine,
        LabType::Bun,
        LabType::Gfr,
        LabType::Potassium,
        LabType::Ast,
        LabType::Alt,
    ];
}

str_enum!(ClearanceRoute {
    Renal => "renal",
    Hepatic => "hepatic",
    Both => "both",
});

str_enum!(TrendDirection {
    Rising => "rising",
    Stable => "stable",
    Falling => "falling",
});

str_enum!(AlertType {
    ContextAware => "context_aware",
    Static => "static",
});

str_enum!(AlertSeverity {
    Critical => "critical",
    Warning => "warning",
    Informational => "informational",
    Silent => "silent",
});

impl AlertSeverity {
    /// Position in the escalation order silent < informational < warning < critical.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Silent => 0,
            Self::Informational => 1,
            Self::Warning => 2,
            Self::Critical => 3,
        }
    }

    /// Silent means "no alert"; it never reaches the alert feed.
    pub fn fires(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

str_enum!(AlertStatus {
    Active => "active",
    Dismissed => "dismissed",
    Confirmed => "confirmed",
    Superseded => "superseded",
});

str_enum!(Actor {
    System => "system",
    Clinician => "clinician",
});

str_enum!(AuditAction {
    AlertGenerated => "alert_generated",
    AlertDismissed => "alert_dismissed",
    AlertConfirmed => "alert_confirmed",
    AlertUpdated => "alert_updated",
});

impl AuditAction {
    /// Action recorded when a clinician moves an alert to `status`.
    pub fn for_status_change(status: Option<AlertStatus>) -> Self {
        match status {
            Some(AlertStatus::Dismissed) => Self::AlertDismissed,
            Some(AlertStatus::Confirmed) => Self::AlertConfirmed,
            Some(AlertStatus::Active) | Some(AlertStatus::Superseded) | None => Self::AlertUpdated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn medication_status_round_trip() {
        for (variant, s) in [
            (MedicationStatus::Active, "active"),
            (MedicationStatus::Discontinued, "discontinued"),
            (MedicationStatus::Held, "held"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MedicationStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn lab_type_round_trip() {
        for variant in LabType::ALL {
            assert_eq!(LabType::from_str(variant.as_str()).unwrap(), variant);
        }
    }

    #[test]
    fn alert_type_serializes_snake_case() {
        let json = serde_json::to_string(&AlertType::ContextAware).unwrap();
        assert_eq!(json, "\"context_aware\"");
        let parsed: AlertType = serde_json::from_str("\"static\"").unwrap();
        assert_eq!(parsed, AlertType::Static);
    }

    #[test]
    fn severity_rank_is_strictly_ordered() {
        assert!(AlertSeverity::Silent.rank() < AlertSeverity::Informational.rank());
        assert!(AlertSeverity::Informational.rank() < AlertSeverity::Warning.rank());
        assert!(AlertSeverity::Warning.rank() < AlertSeverity::Critical.rank());
        assert!(!AlertSeverity::Silent.fires());
        assert!(AlertSeverity::Informational.fires());
    }

    #[test]
    fn audit_action_follows_new_status() {
        assert_eq!(
            AuditAction::for_status_change(Some(AlertStatus::Dismissed)),
            AuditAction::AlertDismissed
        );
        assert_eq!(
            AuditAction::for_status_change(Some(AlertStatus::Confirmed)),
            AuditAction::AlertConfirmed
        );
        assert_eq!(AuditAction::for_status_change(None), AuditAction::AlertUpdated);
    }

    #[test]
    fn invalid_enum_value_rejected() {
        let err = AlertStatus::from_str("archived").unwrap_err();
        assert!(err.to_string().contains("AlertStatus"));
    }
}
