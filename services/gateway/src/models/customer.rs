//! Customer model

use serde::{Deserialize, Serialize};

/// Customer profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: Option<String>,
    pub skin_concerns: Option<String>,
    pub skin_type: Option<String>,
    pub allergies: Option<String>,
}
