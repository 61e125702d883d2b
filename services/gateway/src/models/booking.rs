//! Booking model and related functionality

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Booked,
    CheckedIn,
    InProgress,
    Completed,
    Cancelled,
}

/// How a booking was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    BankTransfer,
    Online,
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u64,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub service_id: u64,
    #[serde(default)]
    pub therapist_id: Option<u64>,
    pub appointment_time: NaiveDateTime,
    pub status: BookingStatus,
    #[serde(default)]
    pub checkin_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub checkout_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub service_results: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub payment_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// New booking creation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,
    pub service_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub therapist_id: Option<u64>,
    /// Serialized as `YYYY-MM-DDTHH:MM:SS`
    pub appointment_time: NaiveDateTime,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
