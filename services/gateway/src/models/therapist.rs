//! Therapist model

use serde::{Deserialize, Serialize};

/// Skincare specialist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub work_schedule: String,
    #[serde(default)]
    pub service_ids: Vec<u64>,
}

impl Therapist {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the therapist performs the given service
    pub fn offers(&self, service_id: u64) -> bool {
        self.service_ids.contains(&service_id)
    }
}
