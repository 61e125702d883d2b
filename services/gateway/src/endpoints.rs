//! Typed wrappers for the backend REST endpoints
//!
//! Each wrapper is a thin call to [`ApiClient::request`] with the right verb,
//! path and payload, so every endpoint shares the same error handling.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::client::{ApiClient, Method, RequestResult};
use crate::models::{
    Booking, Customer, Feedback, HomePageData, NewBooking, NewFeedback, PaymentMethod, Service,
    SkinTestSubmission, Therapist,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentPayload {
    payment_method: PaymentMethod,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignPayload {
    therapist_id: u64,
}

#[derive(Serialize)]
struct ResultPayload<'a> {
    results: &'a str,
}

#[derive(Serialize)]
struct CancelPayload<'a> {
    reason: &'a str,
}

impl ApiClient {
    /// List all services
    pub async fn services(&self) -> RequestResult<Vec<Service>> {
        self.get("/services").await
    }

    /// Find a service by ID
    pub async fn service(&self, id: u64) -> RequestResult<Service> {
        self.get(&format!("/services/{}", id)).await
    }

    /// List all therapists
    pub async fn therapists(&self) -> RequestResult<Vec<Therapist>> {
        self.get("/therapists").await
    }

    /// Find a therapist by ID
    pub async fn therapist(&self, id: u64) -> RequestResult<Therapist> {
        self.get(&format!("/therapists/{}", id)).await
    }

    /// Landing page content
    pub async fn home(&self) -> RequestResult<HomePageData> {
        self.get("/home").await
    }

    /// Dashboard report. The payload shape differs per backend revision, so
    /// it is kept as raw JSON.
    pub async fn dashboard(&self) -> RequestResult<Value> {
        self.get("/dashboard").await
    }

    pub async fn payment_policy(&self) -> RequestResult<Map<String, Value>> {
        self.get("/payment-policy").await
    }

    /// Opening hours keyed by weekday
    pub async fn schedule(&self) -> RequestResult<HashMap<String, String>> {
        self.get("/schedule").await
    }

    pub async fn customer(&self, id: u64) -> RequestResult<Customer> {
        self.get(&format!("/customers/{}", id)).await
    }

    pub async fn update_customer(&self, id: u64, customer: &Customer) -> RequestResult<Customer> {
        self.put(&format!("/customers/{}", id), customer).await
    }

    /// Booking history of a customer
    pub async fn customer_bookings(&self, id: u64) -> RequestResult<Vec<Booking>> {
        self.get(&format!("/customers/{}/bookings", id)).await
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> RequestResult<Booking> {
        self.post("/bookings", booking).await
    }

    pub async fn process_payment(&self, id: u64, method: PaymentMethod) -> RequestResult<Booking> {
        let payload = PaymentPayload {
            payment_method: method,
        };
        self.post(&format!("/bookings/{}/payment", id), &payload)
            .await
    }

    pub async fn check_in(&self, id: u64) -> RequestResult<Booking> {
        self.request::<_, ()>(Method::PUT, &format!("/bookings/{}/checkin", id), None)
            .await
    }

    pub async fn check_out(&self, id: u64) -> RequestResult<Booking> {
        self.request::<_, ()>(Method::PUT, &format!("/bookings/{}/checkout", id), None)
            .await
    }

    pub async fn assign_therapist(&self, id: u64, therapist_id: u64) -> RequestResult<Booking> {
        let payload = AssignPayload { therapist_id };
        self.put(&format!("/bookings/{}/assign", id), &payload).await
    }

    /// Record the outcome of a treatment
    pub async fn record_result(&self, id: u64, results: &str) -> RequestResult<Booking> {
        let payload = ResultPayload { results };
        self.put(&format!("/bookings/{}/result", id), &payload).await
    }

    /// Cancel a booking. The backend answers 204 on success.
    pub async fn cancel_booking(&self, id: u64, reason: &str) -> RequestResult<()> {
        let payload = CancelPayload { reason };
        self.delete(&format!("/bookings/{}", id), Some(&payload))
            .await
    }

    pub async fn feedback(&self) -> RequestResult<Vec<Feedback>> {
        self.get("/feedback").await
    }

    pub async fn submit_feedback(&self, feedback: &NewFeedback) -> RequestResult<Feedback> {
        self.post("/feedback", feedback).await
    }

    /// Submit a skin assessment; the backend answers with recommended services
    pub async fn submit_skin_test(
        &self,
        submission: &SkinTestSubmission,
    ) -> RequestResult<Vec<Service>> {
        self.post("/skin-test", submission).await
    }
}
