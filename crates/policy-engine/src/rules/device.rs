use zerotrust_core::config::ApplicationPolicy;
use zerotrust_core::types::DevicePosture;

use crate::decision::{DecisionOutcome, Denial};

/// Unregistered devices reach this check as ordinary non-compliant posture.
pub fn check_compliance(policy: &ApplicationPolicy, device: &DevicePosture) -> Result<(), Denial> {
    if policy.require_device_compliance && !device.compliant {
        return Err(Denial::new(
            DecisionOutcome::DeviceNonCompliant,
            "device compliance check failed",
        ));
    }
    Ok(())
}
