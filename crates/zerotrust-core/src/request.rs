use serde::{Deserialize, Serialize};

/// A single access request as it arrives at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub user_id: String,
    pub device_id: String,
    pub application_id: String,
    /// Free-form network location token; the broker default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AccessRequest {
    pub fn new(user_id: &str, device_id: &str, application_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            device_id: device_id.to_string(),
            application_id: application_id.to_string(),
            location: None,
        }
    }

    pub fn from_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }
}
