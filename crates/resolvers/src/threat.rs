use std::collections::HashSet;

use tracing::debug;

use zerotrust_core::config::ThreatIntelConfig;
use zerotrust_core::types::ThreatSignal;

use crate::ThreatResolver;

/// Static denylists of suspicious users and compromised devices.
#[derive(Debug, Clone, Default)]
pub struct ThreatFeed {
    suspicious_users: HashSet<String>,
    compromised_devices: HashSet<String>,
}

impl ThreatFeed {
    pub fn from_config(config: &ThreatIntelConfig) -> Self {
        Self {
            suspicious_users: config.suspicious_users.iter().cloned().collect(),
            compromised_devices: config.compromised_devices.iter().cloned().collect(),
        }
    }

    pub fn with_suspicious_user(mut self, user_id: &str) -> Self {
        self.suspicious_users.insert(user_id.to_string());
        self
    }

    pub fn with_compromised_device(mut self, device_id: &str) -> Self {
        self.compromised_devices.insert(device_id.to_string());
        self
    }
}

impl ThreatResolver for ThreatFeed {
    fn resolve(&self, user_id: &str, device_id: &str) -> ThreatSignal {
        let is_malicious =
            self.suspicious_users.contains(user_id) || self.compromised_devices.contains(device_id);
        if is_malicious {
            debug!(user_id, device_id, "threat intelligence match");
            ThreatSignal::malicious()
        } else {
            ThreatSignal::benign()
        }
    }
}
