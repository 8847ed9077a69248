//! Soft timeout for stalled list fetches.
//!
//! Arming hands out a token for the shell timer. A fired token only counts
//! if it is still the armed one; disarming is just forgetting the token, so
//! a timer that cannot be cancelled on the shell side is harmless.

#[derive(Debug, Default)]
pub struct LoadingWatchdog {
    issued: u64,
    armed: Option<u64>,
    reachable: Option<bool>,
    message: Option<String>,
}

pub const SLOW_CONNECTION_MESSAGE: &str =
    "This is taking longer than usual. Please check your connection and try again.";
pub const OFFLINE_MESSAGE: &str =
    "You appear to be offline. Please check your connection and try again.";

impl LoadingWatchdog {
    pub fn arm(&mut self) -> u64 {
        self.issued += 1;
        self.armed = Some(self.issued);
        self.issued
    }

    /// Stops watching and hides any connectivity message.
    pub fn disarm(&mut self) {
        self.armed = None;
        self.message = None;
    }

    pub fn record_reachability(&mut self, reachable: bool) {
        self.reachable = Some(reachable);
    }

    /// Timer callback. Returns true when the connectivity message was raised.
    pub fn fire(&mut self, token: u64, still_loading: bool, has_error: bool) -> bool {
        if self.armed != Some(token) {
            tracing::debug!(token, "stale watchdog timer ignored");
            return false;
        }
        self.armed = None;
        if !still_loading || has_error {
            return false;
        }
        let text = if self.reachable == Some(false) {
            OFFLINE_MESSAGE
        } else {
            SLOW_CONNECTION_MESSAGE
        };
        self.message = Some(text.to_string());
        true
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_while_loading_without_error() {
        let mut watchdog = LoadingWatchdog::default();
        let token = watchdog.arm();
        watchdog.record_reachability(false);
        assert!(watchdog.fire(token, true, false));
        assert_eq!(watchdog.message(), Some(OFFLINE_MESSAGE));
        assert!(!watchdog.is_armed());
    }

    #[test]
    fn reachable_network_gets_slow_message() {
        let mut watchdog = LoadingWatchdog::default();
        let token = watchdog.arm();
        watchdog.record_reachability(true);
        assert!(watchdog.fire(token, true, false));
        assert_eq!(watchdog.message(), Some(SLOW_CONNECTION_MESSAGE));
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut watchdog = LoadingWatchdog::default();
        let old = watchdog.arm();
        let _new = watchdog.arm();
        assert!(!watchdog.fire(old, true, false));
        assert!(watchdog.message().is_none());
    }

    #[test]
    fn disarmed_watchdog_never_fires() {
        let mut watchdog = LoadingWatchdog::default();
        let token = watchdog.arm();
        watchdog.disarm();
        assert!(!watchdog.fire(token, true, false));
    }

    #[test]
    fn finished_or_failed_loads_stay_quiet() {
        let mut watchdog = LoadingWatchdog::default();
        let token = watchdog.arm();
        assert!(!watchdog.fire(token, false, false));

        let token = watchdog.arm();
        assert!(!watchdog.fire(token, true, true));
        assert!(watchdog.message().is_none());
    }

    #[test]
    fn disarm_clears_message() {
        let mut watchdog = LoadingWatchdog::default();
        let token = watchdog.arm();
        watchdog.fire(token, true, false);
        watchdog.disarm();
        assert!(watchdog.message().is_none());
    }
}
