//! Request orchestration: resolve the principal, gate on authentication,
//! resolve the device, assemble the risk context and hand it to the engine.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use policy_engine::{AccessEvaluator, Decision, Denial, PolicyEngine};
use resolvers::{
    DeviceInventory, DeviceResolver, IdentityResolver, ThreatFeed, ThreatResolver, UserDirectory,
};
use zerotrust_core::clock::Clock;
use zerotrust_core::config::Config;
use zerotrust_core::request::AccessRequest;
use zerotrust_core::tokens::Location;
use zerotrust_core::types::RiskContext;

pub mod audit;

/// Response half of the service boundary. The decision fields sit at the top
/// level next to the request id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResponse {
    pub request_id: Uuid,
    pub application_id: String,
    #[serde(flatten)]
    pub decision: Decision,
}

pub struct AccessBroker<E: AccessEvaluator> {
    evaluator: E,
    identities: Arc<dyn IdentityResolver>,
    devices: Arc<dyn DeviceResolver>,
    threats: Arc<dyn ThreatResolver>,
    clock: Arc<dyn Clock>,
    default_location: Location,
}

impl AccessBroker<PolicyEngine> {
    /// Broker over the seeded directories and the configured policies.
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let engine = PolicyEngine::from_config(config)?;
        let broker = Self::new(
            engine,
            Arc::new(UserDirectory::seeded(Arc::clone(&clock))),
            Arc::new(DeviceInventory::seeded(Arc::clone(&clock))),
            Arc::new(ThreatFeed::from_config(&config.threat_intel)),
            clock,
        )
        .with_default_location(config.broker.default_location);
        Ok(broker)
    }
}

impl<E: AccessEvaluator> AccessBroker<E> {
    pub fn new(
        evaluator: E,
        identities: Arc<dyn IdentityResolver>,
        devices: Arc<dyn DeviceResolver>,
        threats: Arc<dyn ThreatResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            evaluator,
            identities,
            devices,
            threats,
            clock,
            default_location: Location::Office,
        }
    }

    pub fn with_default_location(mut self, location: Location) -> Self {
        self.default_location = location;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn handle(&self, request: &AccessRequest) -> AccessResponse {
        let request_id = Uuid::new_v4();
        let decision = self.decide(request).at(self.clock.now());
        audit::log_access_attempt(request_id, request, &decision);
        AccessResponse {
            request_id,
            application_id: request.application_id.clone(),
            decision,
        }
    }

    fn decide(&self, request: &AccessRequest) -> Decision {
        let identity = self.identities.resolve(&request.user_id);
        if !identity.authenticated {
            return Decision::denied(Denial::authentication_failed());
        }

        let device = self.devices.resolve(&request.device_id);
        let threat = self.threats.resolve(&request.user_id, &request.device_id);
        let location = self.resolve_location(request.location.as_deref());
        let context = RiskContext::new(&identity, &device, location, self.clock.hour_of_day(), threat);

        self.evaluator
            .evaluate(&identity, &device, &request.application_id, &context)
    }

    fn resolve_location(&self, token: Option<&str>) -> Location {
        let Some(token) = token else {
            return self.default_location;
        };
        let location = Location::from_token_lenient(token);
        if location == Location::Unknown && !token.trim().eq_ignore_ascii_case("unknown") {
            warn!(location = token, "unrecognised location token, treating as unknown");
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use policy_engine::DecisionOutcome;
    use time::macros::datetime;
    use zerotrust_core::clock::FixedClock;
    use zerotrust_core::types::{DevicePosture, UserIdentity};

    struct CountingEvaluator {
        inner: PolicyEngine,
        calls: AtomicUsize,
        last_context: std::sync::Mutex<Option<RiskContext>>,
    }

    impl AccessEvaluator for CountingEvaluator {
        fn evaluate(
            &self,
            identity: &UserIdentity,
            device: &DevicePosture,
            app_id: &str,
            context: &RiskContext,
        ) -> Decision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_context.lock().unwrap() = Some(context.clone());
            self.inner.evaluate(identity, device, app_id, context)
        }
    }

    fn broker() -> AccessBroker<CountingEvaluator> {
        let config = Config::default_config();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(datetime!(2025-06-02 10:15 UTC)));
        AccessBroker::new(
            CountingEvaluator {
                inner: PolicyEngine::from_config(&config).unwrap(),
                calls: AtomicUsize::new(0),
                last_context: std::sync::Mutex::new(None),
            },
            Arc::new(UserDirectory::seeded(Arc::clone(&clock))),
            Arc::new(DeviceInventory::seeded(Arc::clone(&clock))),
            Arc::new(ThreatFeed::from_config(&config.threat_intel)),
            clock,
        )
    }

    #[test]
    fn test_unknown_user_never_reaches_engine() {
        let broker = broker();
        let response = broker.handle(&AccessRequest::new("hacker123", "laptop-compliant", "hr_system"));
        assert!(!response.decision.access_granted);
        assert_eq!(response.decision.outcome, DecisionOutcome::GateFailure);
        assert_eq!(response.decision.reason, "user authentication failed");
        assert_eq!(response.decision.session_timeout_seconds, 0);
        assert_eq!(broker.evaluator().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_known_user_reaches_engine_once() {
        let broker = broker();
        let response = broker.handle(&AccessRequest::new("employee123", "laptop-compliant", "hr_system"));
        assert!(response.decision.access_granted);
        assert_eq!(response.application_id, "hr_system");
        assert_eq!(broker.evaluator().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_context_assembly() {
        let broker = broker();
        broker.handle(
            &AccessRequest::new("intern456", "unknown-device-001", "intern_portal").from_location("airport"),
        );
        let context = broker.evaluator().last_context.lock().unwrap().clone().unwrap();
        assert_eq!(context.user_risk, 45);
        assert_eq!(context.device_risk, 100);
        assert!(!context.device_compliant);
        assert_eq!(context.location, Location::Unknown);
        assert_eq!(context.time_of_day, 10);
        assert!(!context.threat.is_malicious);

        broker.handle(&AccessRequest::new("intern456", "device-malware-001", "intern_portal"));
        let context = broker.evaluator().last_context.lock().unwrap().clone().unwrap();
        assert_eq!(context.device_risk, 10);
        assert!(context.device_compliant);
        assert_eq!(context.location, Location::Office);
        assert!(context.threat.is_malicious);
    }

    #[test]
    fn test_default_location_applies() {
        let broker = broker().with_default_location(Location::HomeNetwork);
        broker.handle(&AccessRequest::new("employee123", "laptop-compliant", "intern_portal"));
        let context = broker.evaluator().last_context.lock().unwrap().clone().unwrap();
        assert_eq!(context.location, Location::HomeNetwork);
    }

    #[test]
    fn test_response_serializes() {
        let broker = broker();
        let response = broker.handle(&AccessRequest::new("employee123", "laptop-compliant", "file_share"));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["outcome"], "policy_not_found");
        assert_eq!(value["access_granted"], false);
        assert_eq!(value["application_id"], "file_share");
        assert!(value["request_id"].is_string());
        assert!(value.get("decision").is_none());

        let granted = broker.handle(&AccessRequest::new("employee123", "laptop-compliant", "hr_system"));
        let value = serde_json::to_value(&granted).unwrap();
        assert_eq!(value["access_granted"], true);
        assert_eq!(value["session_timeout_seconds"], 3600);
        assert_eq!(value["allowed_actions"], serde_json::json!(["read", "write"]));

        let parsed: AccessResponse = serde_json::from_value(value).unwrap();
        assert!(parsed.decision.same_verdict(&granted.decision));
        assert_eq!(parsed.request_id, granted.request_id);
    }

    #[test]
    fn test_decisions_are_stamped_from_broker_clock() {
        let broker = broker();
        let granted = broker.handle(&AccessRequest::new("employee123", "laptop-compliant", "hr_system"));
        assert_eq!(granted.decision.timestamp, datetime!(2025-06-02 10:15 UTC));
        let gated = broker.handle(&AccessRequest::new("hacker123", "laptop-compliant", "hr_system"));
        assert_eq!(gated.decision.timestamp, datetime!(2025-06-02 10:15 UTC));
    }
}
