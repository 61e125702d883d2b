//! Appointment booking flow
//!
//! Three steps: pick a service, pick a date and time slot, then review the
//! optional details (therapist, notes) and submit.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gateway::models::{Booking, BookingStatus, NewBooking, Service, Therapist};
use gateway::{ApiClient, AppRoute};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::wizard::{Draft, STEP_INCOMPLETE, StepTable, Wizard, WizardError, WizardResult, notify_error};

/// Toast raised after the backend accepted a booking
pub const BOOKING_CONFIRMED: &str = "Booking confirmed! Thank you for choosing us.";

/// Toast raised when the draft cannot be packaged
pub const BOOKING_INCOMPLETE: &str = "Please complete all booking details";

/// Page shown after a successful booking
pub const BOOKINGS_ROUTE: &str = "/dashboard/bookings";

const FIRST_SLOT_HOUR: u32 = 9;
const LAST_SLOT_HOUR: u32 = 17;

/// Rejected schedule selections
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Cannot book a date in the past: {0}")]
    PastDate(NaiveDate),

    #[error("{0} is not an available time slot")]
    UnknownSlot(NaiveTime),
}

/// Bookable start times, hourly from 09:00 to 17:00
pub fn time_slots() -> Vec<NaiveTime> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

/// Booking input collected so far. A `service_id` of 0 means none picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub service_id: u64,
    pub therapist_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<NaiveTime>,
    pub notes: String,
}

/// Values a link into the booking page may carry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPrefill {
    pub service_id: Option<u64>,
    pub therapist_id: Option<u64>,
}

impl BookingPrefill {
    /// Prefill carried by a `/booking?service=<id>` route
    pub fn from_route(route: &AppRoute) -> Option<Self> {
        match route {
            AppRoute::Booking {
                service_id: Some(id),
            } => Some(Self {
                service_id: Some(*id),
                therapist_id: None,
            }),
            _ => None,
        }
    }
}

impl Draft for BookingDraft {
    type Prefill = BookingPrefill;

    fn apply_prefill(&mut self, prefill: BookingPrefill) {
        if let Some(id) = prefill.service_id {
            self.service_id = id;
        }
        if prefill.therapist_id.is_some() {
            self.therapist_id = prefill.therapist_id;
        }
    }
}

impl BookingDraft {
    /// Pick a date. Changing the date drops the chosen time slot.
    pub fn set_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), ScheduleError> {
        if date < today {
            return Err(ScheduleError::PastDate(date));
        }
        if self.date != Some(date) {
            self.time_slot = None;
        }
        self.date = Some(date);
        Ok(())
    }

    pub fn set_time_slot(&mut self, slot: NaiveTime) -> Result<(), ScheduleError> {
        if !time_slots().contains(&slot) {
            return Err(ScheduleError::UnknownSlot(slot));
        }
        self.time_slot = Some(slot);
        Ok(())
    }

    /// Appointment start, once both date and slot are chosen
    pub fn appointment_time(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time_slot?))
    }

    /// Package the draft for `POST /bookings`
    pub fn to_new_booking(&self, customer_id: Option<u64>, amount: Option<f64>) -> Option<NewBooking> {
        if self.service_id == 0 {
            return None;
        }

        let notes = self.notes.trim();
        Some(NewBooking {
            customer_id,
            service_id: self.service_id,
            therapist_id: self.therapist_id,
            appointment_time: self.appointment_time()?,
            status: BookingStatus::Booked,
            amount,
            is_paid: false,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Step table of the booking wizard
pub fn booking_steps() -> StepTable<BookingDraft> {
    StepTable::new()
        .step("service", |d: &BookingDraft| d.service_id != 0)
        .step("schedule", |d: &BookingDraft| {
            d.date.is_some() && d.time_slot.is_some()
        })
        .step("details", |_: &BookingDraft| true)
}

/// Booking wizard wired to the backend
pub struct BookingFlow {
    client: ApiClient,
    wizard: Wizard<BookingDraft, Booking>,
    services: Vec<Service>,
    therapists: Vec<Therapist>,
}

impl BookingFlow {
    pub fn start(client: ApiClient, prefill: Option<BookingPrefill>) -> WizardResult<Self> {
        let wizard = Wizard::start(booking_steps(), BookingDraft::default(), prefill)?;
        Ok(Self {
            client,
            wizard,
            services: Vec::new(),
            therapists: Vec::new(),
        })
    }

    /// Fetch the services and therapists shown by the wizard.
    ///
    /// Failures have already been toasted by the client; the lists stay
    /// empty. Returns whether both lists loaded.
    pub async fn load_catalog(&mut self) -> bool {
        let services = self.client.services().await;
        let therapists = self.client.therapists().await;
        let loaded = services.is_success() && therapists.is_success();

        self.services = services.into_data().unwrap_or_default();
        self.therapists = therapists.into_data().unwrap_or_default();
        info!(
            "Loaded {} services and {} therapists",
            self.services.len(),
            self.therapists.len()
        );
        loaded
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn selected_service(&self) -> Option<&Service> {
        let id = self.wizard.draft().service_id;
        self.services.iter().find(|s| s.id == id)
    }

    /// Therapists able to perform the selected service. Therapists that list
    /// no services are assumed to offer all of them.
    pub fn available_therapists(&self) -> Vec<&Therapist> {
        let id = self.wizard.draft().service_id;
        self.therapists
            .iter()
            .filter(|t| t.service_ids.is_empty() || t.offers(id))
            .collect()
    }

    pub fn wizard(&self) -> &Wizard<BookingDraft, Booking> {
        &self.wizard
    }

    pub fn draft_mut(&mut self) -> WizardResult<&mut BookingDraft> {
        self.wizard.draft_mut()
    }

    /// Go to the next step, toasting when the current one is incomplete
    pub fn next(&mut self) -> bool {
        self.wizard
            .advance_or_notify(self.client.notifier(), STEP_INCOMPLETE)
    }

    pub fn back(&mut self) -> usize {
        self.wizard.retreat()
    }

    /// Customer id of the signed-in customer, if any
    fn customer_id(&self) -> Option<u64> {
        let session = self.client.session().get_session().ok()?;
        if !session.is_customer() {
            return None;
        }
        session.active_user_id()?.parse().ok()
    }

    /// Payload the wizard would post right now
    pub fn package(&self) -> Option<NewBooking> {
        let amount = self.selected_service().map(|s| s.price);
        self.wizard
            .draft()
            .to_new_booking(self.customer_id(), amount)
    }

    /// Post the booking. On success the user is sent to their bookings.
    pub async fn submit(&mut self) -> WizardResult<&Booking> {
        if let Err(e) = self.wizard.check_submit() {
            notify_error(self.client.notifier(), &e, BOOKING_INCOMPLETE);
            return Err(e);
        }

        let Some(payload) = self.package() else {
            self.client.notifier().error(BOOKING_INCOMPLETE);
            let step = self.wizard.current_step();
            return Err(WizardError::StepIncomplete {
                step,
                name: self.wizard.current_step_name(),
            });
        };

        let client = self.client.clone();
        let result = self
            .wizard
            .submit(move |_| async move { client.create_booking(&payload).await })
            .await;

        match result {
            Ok(booking) => {
                info!("Booking {} created", booking.id);
                self.client.notifier().success(BOOKING_CONFIRMED);
                self.client.navigator().navigate(BOOKINGS_ROUTE);
                Ok(booking)
            }
            Err(e) => {
                warn!("Booking submission failed: {}", e);
                notify_error(self.client.notifier(), &e, BOOKING_INCOMPLETE);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_time_slots_are_hourly() {
        let slots = time_slots();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots.first(), Some(&at(9)));
        assert_eq!(slots.last(), Some(&at(17)));
    }

    #[test]
    fn test_set_date_rejects_past_and_clears_slot() {
        let mut draft = BookingDraft::default();
        assert_eq!(
            draft.set_date(day(1), day(2)),
            Err(ScheduleError::PastDate(day(1)))
        );

        draft.set_date(day(2), day(2)).unwrap();
        draft.set_time_slot(at(10)).unwrap();
        draft.set_date(day(2), day(2)).unwrap();
        assert_eq!(draft.time_slot, Some(at(10)));

        draft.set_date(day(3), day(2)).unwrap();
        assert_eq!(draft.time_slot, None);
    }

    #[test]
    fn test_unknown_slot_rejected() {
        let mut draft = BookingDraft::default();
        let slot = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(draft.set_time_slot(slot), Err(ScheduleError::UnknownSlot(slot)));
        assert_eq!(draft.set_time_slot(at(18)), Err(ScheduleError::UnknownSlot(at(18))));
    }

    #[test]
    fn test_prefill_from_route() {
        let route = AppRoute::parse("/booking?service=5");
        let prefill = BookingPrefill::from_route(&route).unwrap();

        let mut draft = BookingDraft::default();
        draft.apply_prefill(prefill);
        assert_eq!(draft.service_id, 5);
        assert_eq!(BookingPrefill::from_route(&AppRoute::Home), None);
    }

    #[test]
    fn test_to_new_booking() {
        let draft = BookingDraft {
            service_id: 5,
            therapist_id: Some(2),
            date: Some(day(20)),
            time_slot: Some(at(14)),
            notes: "  ".to_string(),
        };

        let booking = draft.to_new_booking(Some(4), Some(120.0)).unwrap();
        assert_eq!(booking.appointment_time.to_string(), "2026-11-20 14:00:00");
        assert_eq!(booking.status, BookingStatus::Booked);
        assert_eq!(booking.notes, None);
        assert!(!booking.is_paid);

        let unscheduled = BookingDraft {
            time_slot: None,
            ..draft
        };
        assert_eq!(unscheduled.to_new_booking(Some(4), None), None);
    }

    #[test]
    fn test_step_predicates() {
        let steps = booking_steps();
        let mut draft = BookingDraft::default();
        assert!(!steps.holds(1, &draft));
        assert!(!steps.holds(2, &draft));
        assert!(steps.holds(3, &draft));

        draft.service_id = 5;
        draft.date = Some(day(20));
        assert!(steps.holds(1, &draft));
        assert!(!steps.holds(2, &draft));
        draft.time_slot = Some(at(9));
        assert!(steps.holds(2, &draft));
    }
}
