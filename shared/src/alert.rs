//! Themed alert host.
//!
//! Owned by the model and handed to whoever needs to raise a modal. The
//! shell's provider registers it on mount and unregisters it on unmount;
//! alerts raised while no provider is mounted are dropped.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertTone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub tone: AlertTone,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tone: AlertTone::Info,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tone: AlertTone::Error,
        }
    }
}

#[derive(Debug, Default)]
pub struct AlertHost {
    registered: bool,
    current: Option<Alert>,
}

impl AlertHost {
    pub fn register(&mut self) {
        self.registered = true;
    }

    pub fn unregister(&mut self) {
        self.registered = false;
        self.current = None;
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Replaces the visible alert. Returns false if no provider is mounted.
    pub fn show(&mut self, alert: Alert) -> bool {
        if !self.registered {
            tracing::warn!(title = %alert.title, "alert raised with no host mounted");
            return false;
        }
        self.current = Some(alert);
        true
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_host_drops_alerts() {
        let mut host = AlertHost::default();
        assert!(!host.show(Alert::info("Hi", "there")));
        assert!(host.current().is_none());
    }

    #[test]
    fn show_replaces_and_dismiss_clears() {
        let mut host = AlertHost::default();
        host.register();
        assert!(host.show(Alert::info("First", "one")));
        assert!(host.show(Alert::error("Second", "two")));
        assert_eq!(host.current().map(|a| a.title.as_str()), Some("Second"));
        host.dismiss();
        assert!(host.current().is_none());
    }

    #[test]
    fn unregister_clears_visible_alert() {
        let mut host = AlertHost::default();
        host.register();
        host.show(Alert::info("Open", "modal"));
        host.unregister();
        assert!(host.current().is_none());
        assert!(!host.is_registered());
    }
}
