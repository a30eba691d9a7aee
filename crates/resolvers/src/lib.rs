//! Directory lookups the broker consults before asking the policy engine.
//!
//! Each directory sits behind a single-method trait so tests can swap in
//! fixtures and deployments can swap in real services.

use zerotrust_core::types::{DevicePosture, ThreatSignal, UserIdentity};

pub mod device;
pub mod identity;
pub mod threat;

pub use device::{DeviceInventory, DeviceRecord};
pub use identity::{RiskFactor, UserDirectory, UserRecord};
pub use threat::ThreatFeed;

pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, user_id: &str) -> UserIdentity;
}

pub trait DeviceResolver: Send + Sync {
    fn resolve(&self, device_id: &str) -> DevicePosture;
}

pub trait ThreatResolver: Send + Sync {
    fn resolve(&self, user_id: &str, device_id: &str) -> ThreatSignal;
}
