//! Terminal rendering of toasts and redirects

use gateway::{Navigator, NoticeLevel, Notifier};

/// Prints toasts to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let tag = match level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        println!("[{}] {}", tag, message);
    }
}

/// Prints the page the user would be sent to
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        println!("-> {}", route);
    }
}
