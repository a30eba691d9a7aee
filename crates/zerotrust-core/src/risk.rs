use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tokens::Action;

pub const MEDIUM_RISK_FLOOR: u32 = 30;
pub const HIGH_RISK_FLOOR: u32 = 70;

pub const LOW_RISK_SESSION_SECS: u64 = 3600;
pub const ELEVATED_RISK_SESSION_SECS: u64 = 900;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Tiers are half-open: `[0, 30)` low, `[30, 70)` medium, `[70, ..)` high.
    pub fn from_total(total_risk: u32) -> Self {
        if total_risk < MEDIUM_RISK_FLOOR {
            RiskLevel::Low
        } else if total_risk < HIGH_RISK_FLOOR {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Session length for a granted request. Denials carry no session.
    pub fn session_timeout_secs(&self, granted: bool) -> u64 {
        match (granted, self) {
            (false, _) => 0,
            (true, RiskLevel::Low) => LOW_RISK_SESSION_SECS,
            (true, _) => ELEVATED_RISK_SESSION_SECS,
        }
    }

    pub fn allowed_actions(&self, granted: bool) -> Vec<Action> {
        match (granted, self) {
            (false, _) => Vec::new(),
            (true, RiskLevel::Low) => vec![Action::Read, Action::Write],
            (true, _) => vec![Action::Read],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
