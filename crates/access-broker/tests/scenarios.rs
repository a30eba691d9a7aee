use std::collections::BTreeSet;
use std::sync::Arc;

use access_broker::AccessBroker;
use policy_engine::{DecisionOutcome, PolicyEngine, PolicyRegistry};
use resolvers::{DeviceInventory, ThreatFeed, UserDirectory};
use time::macros::datetime;
use time::OffsetDateTime;
use zerotrust_core::clock::{Clock, FixedClock};
use zerotrust_core::config::{ApplicationPolicy, Config};
use zerotrust_core::request::AccessRequest;
use zerotrust_core::risk::RiskLevel;
use zerotrust_core::tokens::{Action, Role};

fn broker_at(now: OffsetDateTime) -> AccessBroker<PolicyEngine> {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    AccessBroker::from_config(&Config::default_config(), clock).unwrap()
}

fn office_hours() -> AccessBroker<PolicyEngine> {
    broker_at(datetime!(2025-06-02 10:00 UTC))
}

fn outcome(broker: &AccessBroker<PolicyEngine>, request: AccessRequest) -> DecisionOutcome {
    broker.handle(&request).decision.outcome
}

#[test]
fn employee_reaches_hr_portal_with_full_session() {
    let broker = office_hours();
    let decision = broker
        .handle(&AccessRequest::new("employee123", "laptop-compliant", "hr_system"))
        .decision;
    assert!(decision.access_granted);
    assert_eq!(decision.risk_level, RiskLevel::Low);
    assert_eq!(decision.session_timeout_seconds, 3600);
    assert_eq!(decision.allowed_actions, vec![Action::Read, Action::Write]);
}

#[test]
fn role_based_access() {
    let broker = office_hours();
    assert_eq!(
        outcome(&broker, AccessRequest::new("employee123", "laptop-compliant", "financial_system")),
        DecisionOutcome::RoleDenied
    );
    assert_eq!(
        outcome(&broker, AccessRequest::new("intern456", "laptop-compliant", "hr_system")),
        DecisionOutcome::RoleDenied
    );
    assert_eq!(
        outcome(&broker, AccessRequest::new("manager789", "laptop-compliant", "financial_system")),
        DecisionOutcome::Granted
    );
    assert_eq!(
        outcome(&broker, AccessRequest::new("finance042", "laptop-compliant", "financial_system")),
        DecisionOutcome::Granted
    );
}

#[test]
fn intern_gets_read_only_session() {
    let broker = office_hours();
    let decision = broker
        .handle(&AccessRequest::new("intern456", "laptop-compliant", "intern_portal"))
        .decision;
    assert!(decision.access_granted);
    assert_eq!(decision.total_risk, Some(55));
    assert_eq!(decision.risk_level, RiskLevel::Medium);
    assert_eq!(decision.session_timeout_seconds, 900);
    assert_eq!(decision.allowed_actions, vec![Action::Read]);
}

#[test]
fn device_posture_gates_every_application() {
    let broker = office_hours();
    assert_eq!(
        outcome(&broker, AccessRequest::new("employee123", "mobile-compliant", "intern_portal")),
        DecisionOutcome::Granted
    );
    assert_eq!(
        outcome(&broker, AccessRequest::new("employee123", "laptop-non-compliant", "intern_portal")),
        DecisionOutcome::DeviceNonCompliant
    );
    assert_eq!(
        outcome(&broker, AccessRequest::new("employee123", "unknown-device-001", "hr_system")),
        DecisionOutcome::DeviceNonCompliant
    );
}

#[test]
fn location_policies() {
    let broker = office_hours();
    assert_eq!(
        outcome(
            &broker,
            AccessRequest::new("manager789", "laptop-compliant", "financial_system")
                .from_location("high_risk_country")
        ),
        DecisionOutcome::LocationBlocked
    );
    assert_eq!(
        outcome(
            &broker,
            AccessRequest::new("employee123", "laptop-compliant", "hr_system")
                .from_location("high_risk_country")
        ),
        DecisionOutcome::LocationBlocked
    );
    // The HR policy only blocks high-risk countries.
    assert_eq!(
        outcome(
            &broker,
            AccessRequest::new("employee123", "laptop-compliant", "hr_system").from_location("public_wifi")
        ),
        DecisionOutcome::Granted
    );
    assert_eq!(
        outcome(
            &broker,
            AccessRequest::new("employee123", "laptop-compliant", "intern_portal")
                .from_location("home_network")
        ),
        DecisionOutcome::Granted
    );
}

#[test]
fn financial_system_closes_after_hours() {
    let evening = broker_at(datetime!(2025-06-02 19:00 UTC));
    let decision = evening
        .handle(&AccessRequest::new("manager789", "laptop-compliant", "financial_system"))
        .decision;
    assert_eq!(decision.outcome, DecisionOutcome::TimeWindowViolation);
    assert_eq!(decision.reason, "access outside allowed hours");

    let closing = broker_at(datetime!(2025-06-02 18:59 UTC));
    assert_eq!(
        outcome(&closing, AccessRequest::new("manager789", "laptop-compliant", "financial_system")),
        DecisionOutcome::Granted
    );
}

#[test]
fn unknown_principal_fails_the_gate() {
    let broker = office_hours();
    let decision = broker
        .handle(&AccessRequest::new("hacker123", "laptop-compliant", "hr_system"))
        .decision;
    assert_eq!(decision.outcome, DecisionOutcome::GateFailure);
    assert!(decision.allowed_actions.is_empty());
}

#[test]
fn compromised_registered_device_matches_threat_intel() {
    let now = datetime!(2025-06-02 10:00 UTC);
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    let broker = AccessBroker::new(
        PolicyEngine::from_config(&Config::default_config()).unwrap(),
        Arc::new(UserDirectory::seeded(Arc::clone(&clock))),
        Arc::new(DeviceInventory::seeded(Arc::clone(&clock))),
        Arc::new(ThreatFeed::default().with_compromised_device("laptop-compliant")),
        clock,
    );
    let decision = broker
        .handle(&AccessRequest::new("employee123", "laptop-compliant", "hr_system"))
        .decision;
    assert_eq!(decision.outcome, DecisionOutcome::ThreatMatch);
    assert_eq!(decision.reason, "threat intelligence match detected");
}

#[test]
fn seeded_compromised_device_reaches_threat_check() {
    let broker = office_hours();
    let decision = broker
        .handle(&AccessRequest::new("employee123", "device-malware-001", "intern_portal"))
        .decision;
    assert_eq!(decision.outcome, DecisionOutcome::ThreatMatch);
    assert_eq!(decision.total_risk, Some(10));
    assert!(decision.allowed_actions.is_empty());
}

#[test]
fn application_without_policy_is_not_found() {
    let broker = office_hours();
    let decision = broker
        .handle(&AccessRequest::new("employee123", "laptop-compliant", "file_share"))
        .decision;
    assert_eq!(decision.outcome, DecisionOutcome::PolicyNotFound);
    assert_eq!(decision.risk_level, RiskLevel::Low);
}

#[test]
fn tenants_with_independent_registries() {
    let now = datetime!(2025-06-02 10:00 UTC);
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    let permissive = ApplicationPolicy {
        min_user_trust: 0.0,
        require_device_compliance: false,
        allowed_roles: BTreeSet::from([Role::Intern, Role::Employee]),
        max_risk_score: 500,
        blocked_locations: BTreeSet::new(),
        require_mfa: false,
        time_restrictions: None,
    };
    let tenant_a = AccessBroker::new(
        PolicyEngine::new(PolicyRegistry::empty().with_policy("wiki", permissive)),
        Arc::new(UserDirectory::seeded(Arc::clone(&clock))),
        Arc::new(DeviceInventory::seeded(Arc::clone(&clock))),
        Arc::new(ThreatFeed::default()),
        Arc::clone(&clock),
    );
    let tenant_b = AccessBroker::new(
        PolicyEngine::new(PolicyRegistry::empty()),
        Arc::new(UserDirectory::seeded(Arc::clone(&clock))),
        Arc::new(DeviceInventory::seeded(Arc::clone(&clock))),
        Arc::new(ThreatFeed::default()),
        clock,
    );

    let request = AccessRequest::new("intern456", "laptop-non-compliant", "wiki");
    assert_eq!(tenant_a.handle(&request).decision.outcome, DecisionOutcome::Granted);
    assert_eq!(tenant_b.handle(&request).decision.outcome, DecisionOutcome::PolicyNotFound);
}
