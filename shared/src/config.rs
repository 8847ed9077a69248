use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ATTACHMENT_CACHE_DIR, DRAG_SLOP, LOADING_WATCHDOG_MS, READ_NOTIFICATIONS_KEY,
    REPORT_ROUTE_PREFIX, SWIPE_THRESHOLD, TAPPED_NOTIFICATIONS_KEY,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("swipe threshold must be negative and finite, got {0}")]
    InvalidSwipeThreshold(String),
    #[error("drag slop must be non-negative and smaller than the swipe distance, got {0}")]
    InvalidDragSlop(String),
    #[error("watchdog timeout must be at least 1000 ms, got {0}")]
    WatchdogTooShort(u64),
    #[error("storage keys must be non-empty and distinct")]
    InvalidStorageKeys,
    #[error("route prefix must start and end with '/', got {0:?}")]
    InvalidRoutePrefix(String),
    #[error("attachment cache directory must be a non-empty relative path, got {0:?}")]
    InvalidCacheDir(String),
}

/// Tunables supplied by the shell. Every field falls back to the crate
/// constant when missing from the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub swipe_threshold: f64,
    pub drag_slop: f64,
    pub watchdog_timeout_ms: u64,
    pub tapped_key: String,
    pub read_key: String,
    pub report_route_prefix: String,
    pub attachment_cache_dir: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: SWIPE_THRESHOLD,
            drag_slop: DRAG_SLOP,
            watchdog_timeout_ms: LOADING_WATCHDOG_MS,
            tapped_key: TAPPED_NOTIFICATIONS_KEY.into(),
            read_key: READ_NOTIFICATIONS_KEY.into(),
            report_route_prefix: REPORT_ROUTE_PREFIX.into(),
            attachment_cache_dir: ATTACHMENT_CACHE_DIR.into(),
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.swipe_threshold.is_finite() || self.swipe_threshold >= 0.0 {
            return Err(ConfigError::InvalidSwipeThreshold(
                self.swipe_threshold.to_string(),
            ));
        }
        if !self.drag_slop.is_finite()
            || self.drag_slop < 0.0
            || self.drag_slop >= self.swipe_threshold.abs()
        {
            return Err(ConfigError::InvalidDragSlop(self.drag_slop.to_string()));
        }
        if self.watchdog_timeout_ms < 1_000 {
            return Err(ConfigError::WatchdogTooShort(self.watchdog_timeout_ms));
        }
        if self.tapped_key.trim().is_empty()
            || self.read_key.trim().is_empty()
            || self.tapped_key == self.read_key
        {
            return Err(ConfigError::InvalidStorageKeys);
        }
        if !self.report_route_prefix.starts_with('/') || !self.report_route_prefix.ends_with('/')
        {
            return Err(ConfigError::InvalidRoutePrefix(
                self.report_route_prefix.clone(),
            ));
        }
        let dir = self.attachment_cache_dir.trim();
        if dir.is_empty() || dir.starts_with('/') || dir.contains("..") {
            return Err(ConfigError::InvalidCacheDir(
                self.attachment_cache_dir.clone(),
            ));
        }
        Ok(())
    }
}
