//! Multi-step booking and skin assessment flows
//!
//! Both flows share one [`Wizard`] driven by a table of step predicates and
//! submit through the gateway's [`ApiClient`](gateway::ApiClient).

pub mod booking;
pub mod wizard;

pub use booking::{BookingDraft, BookingFlow, BookingPrefill, ScheduleError, booking_steps, time_slots};
pub use skin_test::{Sensitivity, SkinConcern, SkinTestDraft, SkinTestFlow, SkinType, skin_test_steps};
pub use wizard::{Draft, StepTable, Wizard, WizardController, WizardError, WizardResult, WizardState, notify_error};
