//! Notification and navigation capabilities
//!
//! The gateway never talks to a UI directly. Toasts go through a [`Notifier`]
//! and redirects through a [`Navigator`], both injected by the embedding
//! application.

use std::sync::{Arc, Mutex};

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-visible notification channel
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Redirect capability
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Notifier that keeps every toast in memory
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    entries: Arc<Mutex<Vec<(NoticeLevel, String)>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every toast received so far
    pub fn entries(&self) -> Vec<(NoticeLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages of the error toasts received so far
    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn last(&self) -> Option<(NoticeLevel, String)> {
        self.entries().pop()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, level: NoticeLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

/// Navigator that records every redirect
#[derive(Debug, Clone, Default)]
pub struct NavigationLog {
    routes: Arc<Mutex<Vec<String>>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.routes().pop()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: &str) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route.to_string());
        }
    }
}
