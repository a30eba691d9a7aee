use tracing::info;
use uuid::Uuid;

use policy_engine::Decision;
use zerotrust_core::request::AccessRequest;

/// Emits the security log event for one handled request.
pub fn log_access_attempt(request_id: Uuid, request: &AccessRequest, decision: &Decision) {
    info!(
        target: "security_log",
        request_id = %request_id,
        user_id = %request.user_id,
        device_id = %request.device_id,
        application = %request.application_id,
        decision = decision.verdict_label(),
        outcome = %decision.outcome,
        reason = %decision.reason,
        risk_level = %decision.risk_level,
        "access attempt"
    );
}
