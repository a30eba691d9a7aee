pub mod clock;
pub mod config;
pub mod error;
pub mod request;
pub mod risk;
pub mod tokens;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ApplicationInfo, ApplicationPolicy, Config, ConfigPaths, TimeWindow};
pub use error::ZeroTrustError;
pub use request::AccessRequest;
pub use risk::RiskLevel;
pub use tokens::{Action, Location, PostureCheck, Role, ThreatType};
pub use types::{DevicePosture, RiskContext, ThreatSignal, UserIdentity};
