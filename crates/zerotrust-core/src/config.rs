use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::clock::SystemClock;
use crate::error::ZeroTrustError;
use crate::tokens::{Location, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub threat_intel: ThreatIntelConfig,
    pub policies: BTreeMap<String, ApplicationPolicy>,
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub default_location: Location,
    /// Offset applied to UTC wall-clock before taking the hour of day.
    pub utc_offset_hours: i8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatIntelConfig {
    pub suspicious_users: BTreeSet<String>,
    pub compromised_devices: BTreeSet<String>,
}

/// Rule set guarding one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPolicy {
    pub min_user_trust: f64,
    pub require_device_compliance: bool,
    pub allowed_roles: BTreeSet<Role>,
    /// Ceiling on user risk + device risk.
    pub max_risk_score: u32,
    #[serde(default)]
    pub blocked_locations: BTreeSet<Location>,
    /// Carried with the policy but not enforced by the decision pipeline.
    #[serde(default)]
    pub require_mfa: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_restrictions: Option<TimeWindow>,
}

/// Inclusive range of hours during which access may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub name: String,
    pub sensitivity: Sensitivity,
    pub data_classification: DataClassification,
    pub required_clearance: Role,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataClassification {
    Internal,
    Confidential,
    Restricted,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            default_location: Location::Office,
            utc_offset_hours: 0,
        }
    }
}

impl TimeWindow {
    pub fn contains(&self, hour: u8) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }
}

impl Config {
    pub fn default_config() -> Self {
        let mut policies = BTreeMap::new();
        policies.insert(
            "hr_system".to_string(),
            ApplicationPolicy {
                min_user_trust: 0.8,
                require_device_compliance: true,
                allowed_roles: BTreeSet::from([Role::Employee, Role::Manager]),
                max_risk_score: 30,
                blocked_locations: BTreeSet::from([Location::HighRiskCountry]),
                require_mfa: true,
                time_restrictions: None,
            },
        );
        policies.insert(
            "financial_system".to_string(),
            ApplicationPolicy {
                min_user_trust: 0.9,
                require_device_compliance: true,
                allowed_roles: BTreeSet::from([Role::Manager, Role::Finance]),
                max_risk_score: 20,
                blocked_locations: BTreeSet::from([Location::HighRiskCountry, Location::PublicWifi]),
                require_mfa: true,
                time_restrictions: Some(TimeWindow {
                    start_hour: 6,
                    end_hour: 18,
                }),
            },
        );
        policies.insert(
            "intern_portal".to_string(),
            ApplicationPolicy {
                min_user_trust: 0.5,
                require_device_compliance: true,
                allowed_roles: BTreeSet::from([Role::Intern, Role::Employee, Role::Manager]),
                max_risk_score: 70,
                blocked_locations: BTreeSet::new(),
                require_mfa: false,
                time_restrictions: None,
            },
        );

        let mut applications = BTreeMap::new();
        applications.insert(
            "hr_system".to_string(),
            ApplicationInfo {
                name: "Human Resources Portal".to_string(),
                sensitivity: Sensitivity::High,
                data_classification: DataClassification::Confidential,
                required_clearance: Role::Employee,
            },
        );
        applications.insert(
            "financial_system".to_string(),
            ApplicationInfo {
                name: "Financial Management System".to_string(),
                sensitivity: Sensitivity::VeryHigh,
                data_classification: DataClassification::Restricted,
                required_clearance: Role::Manager,
            },
        );
        applications.insert(
            "intern_portal".to_string(),
            ApplicationInfo {
                name: "Intern Resources Portal".to_string(),
                sensitivity: Sensitivity::Low,
                data_classification: DataClassification::Internal,
                required_clearance: Role::Intern,
            },
        );
        applications.insert(
            "file_share".to_string(),
            ApplicationInfo {
                name: "Corporate File Share".to_string(),
                sensitivity: Sensitivity::Medium,
                data_classification: DataClassification::Internal,
                required_clearance: Role::Employee,
            },
        );

        Self {
            broker: BrokerConfig::default(),
            threat_intel: ThreatIntelConfig {
                suspicious_users: BTreeSet::from(["hacker123".to_string()]),
                compromised_devices: BTreeSet::from(["device-malware-001".to_string()]),
            },
            policies,
            applications,
        }
    }

    /// Rejects configurations that would otherwise yield silently wrong decisions.
    pub fn validate(&self) -> Result<(), ZeroTrustError> {
        SystemClock::with_offset_hours(self.broker.utc_offset_hours)?;

        for (app_id, policy) in &self.policies {
            if !(0.0..=1.0).contains(&policy.min_user_trust) {
                return Err(ZeroTrustError::InvalidConfig(format!(
                    "policy {app_id}: min_user_trust {} outside [0, 1]",
                    policy.min_user_trust
                )));
            }
            if policy.allowed_roles.is_empty() {
                return Err(ZeroTrustError::InvalidConfig(format!(
                    "policy {app_id}: allowed_roles is empty"
                )));
            }
            if let Some(window) = policy.time_restrictions {
                if window.start_hour > 23 || window.end_hour > 23 {
                    return Err(ZeroTrustError::InvalidConfig(format!(
                        "policy {app_id}: time_restrictions hours must be within 0..=23"
                    )));
                }
                if window.start_hour > window.end_hour {
                    return Err(ZeroTrustError::InvalidConfig(format!(
                        "policy {app_id}: time_restrictions start_hour {} after end_hour {}",
                        window.start_hour, window.end_hour
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            ZeroTrustError::Io(format!("read config at {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("load config at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "zerotrust", "zerotrust")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        Ok(Self {
            config_path: project_dirs.config_dir().join("config.toml"),
        })
    }
}
