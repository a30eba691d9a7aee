use std::collections::HashMap;

use anyhow::Result;

use zerotrust_core::config::{ApplicationPolicy, Config};

/// Immutable set of per-application policies, built once and handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, ApplicationPolicy>,
}

impl PolicyRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates the configuration before any policy becomes visible.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let policies = config
            .policies
            .iter()
            .map(|(app_id, policy)| (app_id.clone(), policy.clone()))
            .collect();
        Ok(Self { policies })
    }

    pub fn with_policy(mut self, app_id: &str, policy: ApplicationPolicy) -> Self {
        self.policies.insert(app_id.to_string(), policy);
        self
    }

    pub fn get(&self, app_id: &str) -> Option<&ApplicationPolicy> {
        self.policies.get(app_id)
    }

    pub fn contains(&self, app_id: &str) -> bool {
        self.policies.contains_key(app_id)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn app_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use zerotrust_core::tokens::Role;

    #[test]
    fn test_registry_from_default_config() {
        let registry = PolicyRegistry::from_config(&Config::default_config()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.app_ids(),
            vec!["financial_system", "hr_system", "intern_portal"]
        );
        assert!(!registry.contains("file_share"));
    }

    #[test]
    fn test_invalid_config_never_builds_a_registry() {
        let mut config = Config::default_config();
        config.policies.get_mut("hr_system").unwrap().min_user_trust = -0.1;
        assert!(PolicyRegistry::from_config(&config).is_err());
    }

    #[test]
    fn test_independent_registries() {
        let policy = ApplicationPolicy {
            min_user_trust: 0.1,
            require_device_compliance: false,
            allowed_roles: BTreeSet::from([Role::Intern]),
            max_risk_score: 100,
            blocked_locations: BTreeSet::new(),
            require_mfa: false,
            time_restrictions: None,
        };
        let tenant_a = PolicyRegistry::empty().with_policy("wiki", policy);
        let tenant_b = PolicyRegistry::empty();
        assert!(tenant_a.get("wiki").is_some());
        assert!(tenant_b.get("wiki").is_none());
        assert!(tenant_b.is_empty());
    }
}
