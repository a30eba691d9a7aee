//! Closed vocabularies shared by the directories, the policy registry and the engine.
//!
//! Parsing from configuration is strict: a misspelled role or location is a
//! configuration fault, never a silently different policy. Request-side
//! location parsing goes through [`Location::from_token_lenient`] instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ZeroTrustError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Intern,
    Employee,
    Manager,
    Finance,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Office,
    HomeNetwork,
    PublicWifi,
    HighRiskCountry,
    Unknown,
}

/// Device baseline checks a posture lookup can fail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostureCheck {
    DiskEncryption,
    Firewall,
    Antivirus,
    OsUpdates,
    DeviceInactive,
    DeviceNotRegistered,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ThreatType {
    SuspiciousActivity,
    PotentialBreach,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Intern => "intern",
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Finance => "finance",
            Role::Unknown => "unknown",
        }
    }
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Office => "office",
            Location::HomeNetwork => "home_network",
            Location::PublicWifi => "public_wifi",
            Location::HighRiskCountry => "high_risk_country",
            Location::Unknown => "unknown",
        }
    }

    /// Maps any unrecognised token to [`Location::Unknown`].
    pub fn from_token_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Location::Unknown)
    }
}

impl PostureCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureCheck::DiskEncryption => "disk_encryption",
            PostureCheck::Firewall => "firewall",
            PostureCheck::Antivirus => "antivirus",
            PostureCheck::OsUpdates => "os_updates",
            PostureCheck::DeviceInactive => "device_inactive",
            PostureCheck::DeviceNotRegistered => "device_not_registered",
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
        }
    }
}

impl FromStr for Role {
    type Err = ZeroTrustError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "intern" => Ok(Role::Intern),
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "finance" => Ok(Role::Finance),
            "unknown" => Ok(Role::Unknown),
            _ => Err(ZeroTrustError::UnknownToken {
                kind: "role",
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for Location {
    type Err = ZeroTrustError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "office" => Ok(Location::Office),
            "home_network" => Ok(Location::HomeNetwork),
            "public_wifi" => Ok(Location::PublicWifi),
            "high_risk_country" => Ok(Location::HighRiskCountry),
            "unknown" => Ok(Location::Unknown),
            _ => Err(ZeroTrustError::UnknownToken {
                kind: "location",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PostureCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
