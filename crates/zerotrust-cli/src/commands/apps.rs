use std::path::PathBuf;

use anyhow::Result;

use policy_engine::PolicyRegistry;

use super::config::load_config;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let registry = PolicyRegistry::from_config(&config)?;

    for (app_id, info) in &config.applications {
        let guard = if registry.contains(app_id) {
            "policy"
        } else {
            "no policy"
        };
        println!(
            "{app_id}: {} [{:?}, {:?}, clearance {}] ({guard})",
            info.name, info.sensitivity, info.data_classification, info.required_clearance
        );
    }
    for app_id in registry.app_ids() {
        if !config.applications.contains_key(app_id) {
            println!("{app_id}: (no metadata) (policy)");
        }
    }
    Ok(())
}
