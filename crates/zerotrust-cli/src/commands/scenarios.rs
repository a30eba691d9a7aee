use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use access_broker::AccessBroker;
use policy_engine::DecisionOutcome;
use zerotrust_core::request::AccessRequest;

use super::config::{build_clock, load_config};

struct Scenario {
    group: &'static str,
    name: &'static str,
    user: &'static str,
    device: &'static str,
    app: &'static str,
    location: &'static str,
    expected: DecisionOutcome,
}

const CATALOGUE: &[Scenario] = &[
    Scenario {
        group: "employee",
        name: "Standard employee on HR portal",
        user: "employee123",
        device: "laptop-compliant",
        app: "hr_system",
        location: "office",
        expected: DecisionOutcome::Granted,
    },
    Scenario {
        group: "employee",
        name: "Manager on financial system (business hours)",
        user: "manager789",
        device: "laptop-compliant",
        app: "financial_system",
        location: "office",
        expected: DecisionOutcome::Granted,
    },
    Scenario {
        group: "employee",
        name: "Employee on financial system",
        user: "employee123",
        device: "laptop-compliant",
        app: "financial_system",
        location: "office",
        expected: DecisionOutcome::RoleDenied,
    },
    Scenario {
        group: "device",
        name: "Compliant mobile device",
        user: "employee123",
        device: "mobile-compliant",
        app: "intern_portal",
        location: "office",
        expected: DecisionOutcome::Granted,
    },
    Scenario {
        group: "device",
        name: "Non-compliant laptop on basic app",
        user: "employee123",
        device: "laptop-non-compliant",
        app: "intern_portal",
        location: "office",
        expected: DecisionOutcome::DeviceNonCompliant,
    },
    Scenario {
        group: "device",
        name: "Unregistered device",
        user: "employee123",
        device: "unknown-device-001",
        app: "hr_system",
        location: "office",
        expected: DecisionOutcome::DeviceNonCompliant,
    },
    Scenario {
        group: "location",
        name: "Public wifi on HR portal",
        user: "employee123",
        device: "laptop-compliant",
        app: "hr_system",
        location: "public_wifi",
        expected: DecisionOutcome::Granted,
    },
    Scenario {
        group: "location",
        name: "High-risk country on financial system",
        user: "manager789",
        device: "laptop-compliant",
        app: "financial_system",
        location: "high_risk_country",
        expected: DecisionOutcome::LocationBlocked,
    },
    Scenario {
        group: "location",
        name: "Remote employee on basic app",
        user: "employee123",
        device: "laptop-compliant",
        app: "intern_portal",
        location: "home_network",
        expected: DecisionOutcome::Granted,
    },
    Scenario {
        group: "role",
        name: "Intern on HR portal",
        user: "intern456",
        device: "laptop-compliant",
        app: "hr_system",
        location: "office",
        expected: DecisionOutcome::RoleDenied,
    },
    Scenario {
        group: "role",
        name: "Intern on intern portal",
        user: "intern456",
        device: "laptop-compliant",
        app: "intern_portal",
        location: "office",
        expected: DecisionOutcome::Granted,
    },
    Scenario {
        group: "threat",
        name: "Denylisted user outside the directory",
        user: "hacker123",
        device: "laptop-compliant",
        app: "hr_system",
        location: "office",
        expected: DecisionOutcome::GateFailure,
    },
    Scenario {
        group: "threat",
        name: "Compromised device",
        user: "employee123",
        device: "device-malware-001",
        app: "intern_portal",
        location: "office",
        expected: DecisionOutcome::ThreatMatch,
    },
    Scenario {
        group: "threat",
        name: "Application without policy",
        user: "employee123",
        device: "laptop-compliant",
        app: "file_share",
        location: "office",
        expected: DecisionOutcome::PolicyNotFound,
    },
];

pub fn execute(config_path: Option<PathBuf>, at_hour: Option<u8>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let clock = build_clock(&config, at_hour)?;
    let broker = AccessBroker::from_config(&config, clock)?;

    let mut matches = 0usize;
    let mut granted = 0usize;
    let mut blocks: BTreeMap<&'static str, usize> = BTreeMap::new();

    let mut current_group = "";
    for scenario in CATALOGUE {
        if scenario.group != current_group {
            current_group = scenario.group;
            println!("\n[{current_group}]");
        }

        let request = AccessRequest::new(scenario.user, scenario.device, scenario.app)
            .from_location(scenario.location);
        let decision = broker.handle(&request).decision;

        if decision.access_granted {
            granted += 1;
        } else {
            *blocks.entry(decision.outcome.as_str()).or_insert(0) += 1;
        }
        let marker = if decision.outcome == scenario.expected {
            matches += 1;
            "ok"
        } else {
            "MISMATCH"
        };

        println!(
            "  {marker:>8}  {}: {} [{}] ({}, risk {})",
            scenario.name,
            decision.verdict_label(),
            decision.outcome,
            decision.reason,
            decision.risk_level
        );
        if decision.outcome == DecisionOutcome::Granted {
            println!(
                "            session {}s, {} action(s)",
                decision.session_timeout_seconds,
                decision.allowed_actions.len()
            );
        }
    }

    let total = CATALOGUE.len();
    let denied = total - granted;
    println!("\nScenarios: {total}");
    println!("Matched expectations: {matches}/{total}");
    println!("Granted: {granted}");
    println!("Denied: {denied}");
    for (outcome, count) in &blocks {
        println!("  {outcome}: {count}");
    }
    Ok(())
}
