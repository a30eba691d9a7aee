use zerotrust_core::config::ApplicationPolicy;
use zerotrust_core::types::UserIdentity;

use crate::decision::{DecisionOutcome, Denial};

pub fn check_role(
    policy: &ApplicationPolicy,
    app_id: &str,
    identity: &UserIdentity,
) -> Result<(), Denial> {
    if policy.allowed_roles.contains(&identity.role) {
        return Ok(());
    }
    Err(Denial::new(
        DecisionOutcome::RoleDenied,
        format!("role {} not allowed for {app_id}", identity.role),
    ))
}

pub fn check_trust(policy: &ApplicationPolicy, identity: &UserIdentity) -> Result<(), Denial> {
    if identity.trust_score < policy.min_user_trust {
        return Err(Denial::new(
            DecisionOutcome::TrustTooLow,
            format!("user trust score too low: {}", identity.trust_score),
        ));
    }
    Ok(())
}
