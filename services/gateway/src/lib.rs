//! Session & request gateway for the glowbook client
//!
//! This crate owns the authenticated session and every call to the booking
//! backend. Failures never escape as panics or early errors: each call yields
//! a [`RequestResult`], raises a toast through the injected [`Notifier`] and,
//! on 401, clears the session and redirects through the injected
//! [`Navigator`].

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod notify;
pub mod routes;
pub mod session;
pub mod validation;

pub use client::{ApiClient, Method, RequestResult};
pub use error::{GatewayError, GatewayResult};
pub use notify::{NavigationLog, Navigator, NoticeLevel, NoticeLog, Notifier};
pub use routes::{Access, AppRoute, guard};
pub use session::{Role, Session, SessionManager, SessionState};
