//! Contextual checks that run once identity and device have passed.
//!
//! Order matters: the risk ceiling is checked before location, location
//! before the time window, and threat intelligence last.

use zerotrust_core::config::ApplicationPolicy;
use zerotrust_core::types::RiskContext;

use crate::decision::{DecisionOutcome, Denial};

pub fn check_risk_ceiling(policy: &ApplicationPolicy, total_risk: u32) -> Result<(), Denial> {
    if total_risk > policy.max_risk_score {
        return Err(Denial::new(
            DecisionOutcome::RiskTooHigh,
            format!("total risk score too high: {total_risk}"),
        ));
    }
    Ok(())
}

pub fn check_location(policy: &ApplicationPolicy, context: &RiskContext) -> Result<(), Denial> {
    if policy.blocked_locations.contains(&context.location) {
        return Err(Denial::new(
            DecisionOutcome::LocationBlocked,
            format!("access blocked from location: {}", context.location),
        ));
    }
    Ok(())
}

pub fn check_time_window(policy: &ApplicationPolicy, context: &RiskContext) -> Result<(), Denial> {
    match policy.time_restrictions {
        Some(window) if !window.contains(context.time_of_day) => Err(Denial::new(
            DecisionOutcome::TimeWindowViolation,
            "access outside allowed hours",
        )),
        _ => Ok(()),
    }
}

pub fn check_threat(context: &RiskContext) -> Result<(), Denial> {
    if context.threat.is_malicious {
        return Err(Denial::new(
            DecisionOutcome::ThreatMatch,
            "threat intelligence match detected",
        ));
    }
    Ok(())
}
