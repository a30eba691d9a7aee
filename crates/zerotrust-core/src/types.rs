use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tokens::{Location, PostureCheck, Role, ThreatType};

/// Risk sentinel reported for principals or devices the directories do not know.
pub const UNREGISTERED_RISK_SCORE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub authenticated: bool,
    pub user_id: String,
    pub display_name: Option<String>,
    pub department: Option<String>,
    pub role: Role,
    pub trust_score: f64,
    pub risk_score: u32,
    pub mfa_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePosture {
    pub device_id: String,
    pub compliant: bool,
    pub risk_score: u32,
    pub failed_checks: BTreeSet<PostureCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatSignal {
    pub is_malicious: bool,
    pub threat_types: BTreeSet<ThreatType>,
    pub confidence_score: f64,
}

/// Per-request signals the engine weighs next to the identity and device records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskContext {
    pub user_risk: u32,
    pub device_risk: u32,
    pub device_compliant: bool,
    pub location: Location,
    /// Hour of day, 0..=23.
    pub time_of_day: u8,
    pub threat: ThreatSignal,
}

impl UserIdentity {
    pub fn unauthenticated(user_id: &str) -> Self {
        Self {
            authenticated: false,
            user_id: user_id.to_string(),
            display_name: None,
            department: None,
            role: Role::Unknown,
            trust_score: 0.0,
            risk_score: UNREGISTERED_RISK_SCORE,
            mfa_enabled: false,
        }
    }
}

impl DevicePosture {
    pub fn unregistered(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            compliant: false,
            risk_score: UNREGISTERED_RISK_SCORE,
            failed_checks: BTreeSet::from([PostureCheck::DeviceNotRegistered]),
        }
    }
}

impl ThreatSignal {
    pub fn benign() -> Self {
        Self {
            is_malicious: false,
            threat_types: BTreeSet::new(),
            confidence_score: 0.05,
        }
    }

    pub fn malicious() -> Self {
        Self {
            is_malicious: true,
            threat_types: BTreeSet::from([ThreatType::SuspiciousActivity, ThreatType::PotentialBreach]),
            confidence_score: 0.95,
        }
    }
}

impl RiskContext {
    pub fn new(
        identity: &UserIdentity,
        device: &DevicePosture,
        location: Location,
        time_of_day: u8,
        threat: ThreatSignal,
    ) -> Self {
        Self {
            user_risk: identity.risk_score,
            device_risk: device.risk_score,
            device_compliant: device.compliant,
            location,
            time_of_day,
            threat,
        }
    }

    /// Identity plus device risk. Threat and location are separate checks.
    pub fn total_risk(&self) -> u32 {
        self.user_risk.saturating_add(self.device_risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_device_is_never_compliant() {
        let posture = DevicePosture::unregistered("unknown-device-001");
        assert!(!posture.compliant);
        assert_eq!(posture.risk_score, 100);
        assert_eq!(posture.failed_checks.len(), 1);
        assert!(posture.failed_checks.contains(&PostureCheck::DeviceNotRegistered));
    }

    #[test]
    fn test_total_risk_excludes_threat() {
        let identity = UserIdentity::unauthenticated("nobody");
        let device = DevicePosture::unregistered("nothing");
        let context = RiskContext::new(&identity, &device, Location::Office, 9, ThreatSignal::malicious());
        assert_eq!(context.total_risk(), 200);
        assert!(!context.device_compliant);
    }
}
