use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use zerotrust_core::risk::RiskLevel;
use zerotrust_core::tokens::Action;

/// The final word on one access request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub access_granted: bool,
    pub outcome: DecisionOutcome,
    pub reason: String,
    pub risk_level: RiskLevel,
    /// User + device risk, once the pipeline got far enough to compute it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_risk: Option<u32>,
    pub session_timeout_seconds: u64,
    pub allowed_actions: Vec<Action>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Outcome categories, in pipeline order. Every one of them is data, not a fault.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    GateFailure,
    PolicyNotFound,
    RoleDenied,
    DeviceNonCompliant,
    TrustTooLow,
    RiskTooHigh,
    LocationBlocked,
    TimeWindowViolation,
    ThreatMatch,
    Granted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub outcome: DecisionOutcome,
    pub reason: String,
    pub total_risk: Option<u32>,
}

impl Decision {
    pub fn granted(total_risk: u32) -> Self {
        let risk_level = RiskLevel::from_total(total_risk);
        Self {
            access_granted: true,
            outcome: DecisionOutcome::Granted,
            reason: "all zero trust checks passed".to_string(),
            risk_level,
            total_risk: Some(total_risk),
            session_timeout_seconds: risk_level.session_timeout_secs(true),
            allowed_actions: risk_level.allowed_actions(true),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Denials are reported at the lowest tier regardless of how far evaluation got.
    pub fn denied(denial: Denial) -> Self {
        let risk_level = RiskLevel::from_total(0);
        Self {
            access_granted: false,
            outcome: denial.outcome,
            reason: denial.reason,
            risk_level,
            total_risk: denial.total_risk,
            session_timeout_seconds: risk_level.session_timeout_secs(false),
            allowed_actions: risk_level.allowed_actions(false),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Restamps the decision with the time it was made on the caller's clock.
    pub fn at(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether two decisions agree on everything except when they were made.
    pub fn same_verdict(&self, other: &Decision) -> bool {
        self.access_granted == other.access_granted
            && self.outcome == other.outcome
            && self.reason == other.reason
            && self.risk_level == other.risk_level
            && self.total_risk == other.total_risk
            && self.session_timeout_seconds == other.session_timeout_seconds
            && self.allowed_actions == other.allowed_actions
    }

    pub fn verdict_label(&self) -> &'static str {
        if self.access_granted {
            "GRANTED"
        } else {
            "DENIED"
        }
    }
}

impl Denial {
    pub fn new(outcome: DecisionOutcome, reason: impl Into<String>) -> Self {
        Self {
            outcome,
            reason: reason.into(),
            total_risk: None,
        }
    }

    pub fn authentication_failed() -> Self {
        Self::new(DecisionOutcome::GateFailure, "user authentication failed")
    }

    pub fn policy_not_found(app_id: &str) -> Self {
        Self::new(
            DecisionOutcome::PolicyNotFound,
            format!("application not found in policies: {app_id}"),
        )
    }

    pub fn with_total_risk(mut self, total_risk: u32) -> Self {
        self.total_risk = Some(total_risk);
        self
    }
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::GateFailure => "gate_failure",
            DecisionOutcome::PolicyNotFound => "policy_not_found",
            DecisionOutcome::RoleDenied => "role_denied",
            DecisionOutcome::DeviceNonCompliant => "device_non_compliant",
            DecisionOutcome::TrustTooLow => "trust_too_low",
            DecisionOutcome::RiskTooHigh => "risk_too_high",
            DecisionOutcome::LocationBlocked => "location_blocked",
            DecisionOutcome::TimeWindowViolation => "time_window_violation",
            DecisionOutcome::ThreatMatch => "threat_match",
            DecisionOutcome::Granted => "granted",
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
