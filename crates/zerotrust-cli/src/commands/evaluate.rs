use std::path::PathBuf;

use anyhow::{Context, Result};

use access_broker::AccessBroker;
use zerotrust_core::request::AccessRequest;

use super::config::{build_clock, load_config};

pub struct EvaluateInputs {
    pub config_path: Option<PathBuf>,
    pub user: String,
    pub device: String,
    pub application: String,
    pub location: Option<String>,
    pub at_hour: Option<u8>,
    pub json: bool,
}

pub fn execute(inputs: EvaluateInputs) -> Result<()> {
    let config = load_config(inputs.config_path.as_deref())?;
    let clock = build_clock(&config, inputs.at_hour)?;
    let broker = AccessBroker::from_config(&config, clock)?;

    let request = AccessRequest {
        user_id: inputs.user,
        device_id: inputs.device,
        application_id: inputs.application,
        location: inputs.location,
    };
    let response = broker.handle(&request);

    if inputs.json {
        let output = serde_json::to_string_pretty(&response).context("render decision JSON")?;
        println!("{}", output);
        return Ok(());
    }

    let decision = &response.decision;
    let app_name = config
        .applications
        .get(&request.application_id)
        .map(|info| info.name.as_str())
        .unwrap_or(request.application_id.as_str());
    println!("{} -> {}", request.user_id, app_name);
    println!("Decision: {} ({})", decision.verdict_label(), decision.outcome);
    println!("Reason: {}", decision.reason);
    println!("Risk level: {}", decision.risk_level);
    if decision.access_granted {
        let actions: Vec<String> = decision
            .allowed_actions
            .iter()
            .map(|action| action.to_string())
            .collect();
        println!("Session timeout: {}s", decision.session_timeout_seconds);
        println!("Allowed actions: {}", actions.join(", "));
    }
    Ok(())
}
