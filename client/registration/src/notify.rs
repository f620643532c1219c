//! Transient user-visible notices ("toasts").

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

pub trait Notifier {
    fn notify(&self, severity: Severity, message: &str);
}

/// Writes notices to the log. Used by the command-line front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!(target: "notice", "{message}"),
            Severity::Error => error!(target: "notice", "{message}"),
        }
    }
}
