//! Device posture lookups.
//!
//! A posture check is not read-only: every lookup that finds a device idle for
//! more than a week adds a fixed penalty to that device's stored risk score, so
//! repeated checks against an inactive device keep raising its risk. Each record
//! has its own lock so concurrent checks against one device never lose or
//! double-apply that penalty, while checks against different devices never wait
//! on each other.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use zerotrust_core::clock::Clock;
use zerotrust_core::tokens::PostureCheck;
use zerotrust_core::types::DevicePosture;

use crate::DeviceResolver;

pub const INACTIVITY_PENALTY: u32 = 20;
pub const FAILED_CHECK_WEIGHT: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub encryption_enabled: bool,
    pub firewall_active: bool,
    pub antivirus_updated: bool,
    pub os_patched: bool,
    pub last_seen: OffsetDateTime,
    pub risk_score: u32,
}

pub struct DeviceInventory {
    records: HashMap<String, Mutex<DeviceRecord>>,
    clock: Arc<dyn Clock>,
}

impl DeviceInventory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            clock,
        }
    }

    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self::new(clock)
            .with_device(
                "laptop-compliant",
                DeviceRecord {
                    encryption_enabled: true,
                    firewall_active: true,
                    antivirus_updated: true,
                    os_patched: true,
                    last_seen: now - Duration::hours(2),
                    risk_score: 10,
                },
            )
            .with_device(
                "laptop-non-compliant",
                DeviceRecord {
                    encryption_enabled: false,
                    firewall_active: false,
                    antivirus_updated: false,
                    os_patched: false,
                    last_seen: now - Duration::days(30),
                    risk_score: 75,
                },
            )
            .with_device(
                "mobile-compliant",
                DeviceRecord {
                    encryption_enabled: true,
                    firewall_active: true,
                    antivirus_updated: true,
                    os_patched: true,
                    last_seen: now - Duration::hours(1),
                    risk_score: 15,
                },
            )
            // Clean posture; only the threat feed knows it is compromised.
            .with_device(
                "device-malware-001",
                DeviceRecord {
                    encryption_enabled: true,
                    firewall_active: true,
                    antivirus_updated: true,
                    os_patched: true,
                    last_seen: now - Duration::hours(4),
                    risk_score: 10,
                },
            )
    }

    pub fn with_device(mut self, device_id: &str, record: DeviceRecord) -> Self {
        self.records.insert(device_id.to_string(), Mutex::new(record));
        self
    }

    /// Stored risk before per-check weighting; `None` for unregistered devices.
    pub fn stored_risk_score(&self, device_id: &str) -> Option<u32> {
        let slot = self.records.get(device_id)?;
        let record = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(record.risk_score)
    }
}

fn failed_baseline_checks(record: &DeviceRecord) -> BTreeSet<PostureCheck> {
    let mut failed = BTreeSet::new();
    if !record.encryption_enabled {
        failed.insert(PostureCheck::DiskEncryption);
    }
    if !record.firewall_active {
        failed.insert(PostureCheck::Firewall);
    }
    if !record.antivirus_updated {
        failed.insert(PostureCheck::Antivirus);
    }
    if !record.os_patched {
        failed.insert(PostureCheck::OsUpdates);
    }
    failed
}

impl DeviceResolver for DeviceInventory {
    fn resolve(&self, device_id: &str) -> DevicePosture {
        let Some(slot) = self.records.get(device_id) else {
            debug!(device_id, "device not registered");
            return DevicePosture::unregistered(device_id);
        };

        let now = self.clock.now();
        let mut record = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut failed_checks = failed_baseline_checks(&record);
        if now - record.last_seen > Duration::days(7) {
            failed_checks.insert(PostureCheck::DeviceInactive);
            record.risk_score = record.risk_score.saturating_add(INACTIVITY_PENALTY);
        }

        let weight = FAILED_CHECK_WEIGHT.saturating_mul(failed_checks.len() as u32);
        let risk_score = record.risk_score.saturating_add(weight);
        let compliant = failed_checks.is_empty();
        debug!(device_id, compliant, risk_score, failed = failed_checks.len(), "checked device posture");

        DevicePosture {
            device_id: device_id.to_string(),
            compliant,
            risk_score,
            failed_checks,
        }
    }
}
