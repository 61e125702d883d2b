//! Backend wire models

pub mod auth;
pub mod booking;
pub mod customer;
pub mod feedback;
pub mod home;
pub mod service;
pub mod therapist;

// Re-export for convenience
pub use auth::{JwtResponse, LoginRequest, RegisterRequest};
pub use booking::{Booking, BookingStatus, NewBooking, PaymentMethod};
pub use customer::Customer;
pub use feedback::{Feedback, NewFeedback};
pub use home::{BlogPost, HomePageData, Introduction, NewsItem};
pub use service::Service;
pub use skin_test::SkinTestSubmission;
pub use therapist::Therapist;
