use anyhow::Result;

use zerotrust_core::config::Config;
use zerotrust_core::types::{DevicePosture, RiskContext, UserIdentity};

mod decision;
pub mod registry;
pub mod rules;

pub use decision::{Decision, DecisionOutcome, Denial};
pub use registry::PolicyRegistry;

/// Anything that can turn resolved request data into a decision.
pub trait AccessEvaluator: Send + Sync {
    fn evaluate(
        &self,
        identity: &UserIdentity,
        device: &DevicePosture,
        app_id: &str,
        context: &RiskContext,
    ) -> Decision;
}

/// Zero-trust policy decision engine.
///
/// Holds no mutable state: the same inputs always yield the same verdict, and
/// one engine can be shared across threads without locking.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    registry: PolicyRegistry,
}

impl PolicyEngine {
    pub fn new(registry: PolicyRegistry) -> Self {
        Self { registry }
    }

    /// Creates a new PolicyEngine from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = PolicyRegistry::from_config(config)?;
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Runs the ordered checks; the first failing check decides the reason.
    pub fn evaluate(
        &self,
        identity: &UserIdentity,
        device: &DevicePosture,
        app_id: &str,
        context: &RiskContext,
    ) -> Decision {
        match self.run_checks(identity, device, app_id, context) {
            Ok(total_risk) => Decision::granted(total_risk),
            Err(denial) => Decision::denied(denial),
        }
    }

    fn run_checks(
        &self,
        identity: &UserIdentity,
        device: &DevicePosture,
        app_id: &str,
        context: &RiskContext,
    ) -> Result<u32, Denial> {
        let policy = self
            .registry
            .get(app_id)
            .ok_or_else(|| Denial::policy_not_found(app_id))?;

        rules::identity::check_role(policy, app_id, identity)?;
        rules::device::check_compliance(policy, device)?;
        rules::identity::check_trust(policy, identity)?;

        let total_risk = context.total_risk();
        let contextual = || -> Result<(), Denial> {
            rules::context::check_risk_ceiling(policy, total_risk)?;
            rules::context::check_location(policy, context)?;
            rules::context::check_time_window(policy, context)?;
            rules::context::check_threat(context)
        };
        contextual().map_err(|denial| denial.with_total_risk(total_risk))?;

        Ok(total_risk)
    }
}

impl AccessEvaluator for PolicyEngine {
    fn evaluate(
        &self,
        identity: &UserIdentity,
        device: &DevicePosture,
        app_id: &str,
        context: &RiskContext,
    ) -> Decision {
        PolicyEngine::evaluate(self, identity, device, app_id, context)
    }
}
