use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use zerotrust_core::clock::Clock;
use zerotrust_core::tokens::Role;
use zerotrust_core::types::UserIdentity;

use crate::IdentityResolver;

const NEW_ACCOUNT_RISK: u32 = 25;
const STALE_LOGIN_RISK: u32 = 30;
const AGING_LOGIN_RISK: u32 = 15;
const NO_MFA_RISK: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    NewAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub role: Role,
    pub department: String,
    pub trust_score: f64,
    pub last_login: OffsetDateTime,
    pub mfa_enabled: bool,
    pub risk_factors: Vec<RiskFactor>,
}

/// In-memory user directory keyed by user id.
pub struct UserDirectory {
    records: HashMap<String, UserRecord>,
    clock: Arc<dyn Clock>,
}

impl UserDirectory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            clock,
        }
    }

    /// Directory with the demo staff, login times relative to `clock`.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self::new(clock)
            .with_user(
                "employee123",
                UserRecord {
                    name: "Vivek Shasi".to_string(),
                    role: Role::Employee,
                    department: "Engineering".to_string(),
                    trust_score: 0.9,
                    last_login: now - Duration::hours(2),
                    mfa_enabled: true,
                    risk_factors: Vec::new(),
                },
            )
            .with_user(
                "intern456",
                UserRecord {
                    name: "Rahul".to_string(),
                    role: Role::Intern,
                    department: "HR".to_string(),
                    trust_score: 0.7,
                    last_login: now - Duration::days(1),
                    mfa_enabled: false,
                    risk_factors: vec![RiskFactor::NewAccount],
                },
            )
            .with_user(
                "manager789",
                UserRecord {
                    name: "Pratap".to_string(),
                    role: Role::Manager,
                    department: "Finance".to_string(),
                    trust_score: 0.95,
                    last_login: now - Duration::minutes(30),
                    mfa_enabled: true,
                    risk_factors: Vec::new(),
                },
            )
            .with_user(
                "finance042",
                UserRecord {
                    name: "Meera".to_string(),
                    role: Role::Finance,
                    department: "Finance".to_string(),
                    trust_score: 0.92,
                    last_login: now - Duration::days(3),
                    mfa_enabled: true,
                    risk_factors: Vec::new(),
                },
            )
    }

    pub fn with_user(mut self, user_id: &str, record: UserRecord) -> Self {
        self.records.insert(user_id.to_string(), record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Additive and uncapped: new account, login recency and missing MFA each add risk.
pub fn identity_risk_score(record: &UserRecord, now: OffsetDateTime) -> u32 {
    let mut risk = 0u32;

    if record.risk_factors.contains(&RiskFactor::NewAccount) {
        risk += NEW_ACCOUNT_RISK;
    }

    let since_login = now - record.last_login;
    if since_login > Duration::days(30) {
        risk += STALE_LOGIN_RISK;
    } else if since_login > Duration::days(7) {
        risk += AGING_LOGIN_RISK;
    }

    if !record.mfa_enabled {
        risk += NO_MFA_RISK;
    }

    risk
}

impl IdentityResolver for UserDirectory {
    fn resolve(&self, user_id: &str) -> UserIdentity {
        let Some(record) = self.records.get(user_id) else {
            debug!(user_id, "user not found in directory");
            return UserIdentity::unauthenticated(user_id);
        };

        let risk_score = identity_risk_score(record, self.clock.now());
        debug!(
            user_id,
            role = %record.role,
            trust_score = record.trust_score,
            risk_score,
            "resolved user identity"
        );

        UserIdentity {
            authenticated: true,
            user_id: user_id.to_string(),
            display_name: Some(record.name.clone()),
            department: Some(record.department.clone()),
            role: record.role,
            trust_score: record.trust_score,
            risk_score,
            mfa_enabled: record.mfa_enabled,
        }
    }
}
