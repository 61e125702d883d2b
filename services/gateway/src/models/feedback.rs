//! Feedback model

use serde::{Deserialize, Serialize};

/// Feedback left for a completed booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: u64,
    pub booking_id: u64,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Feedback submission payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub booking_id: u64,
    pub rating: u8,
    pub comment: String,
    pub is_public: bool,
}
