// lib.rs - Dispatch: Officer shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod alert;
pub mod app;
pub mod attachments;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod flag_store;
pub mod guard;
pub mod lifecycle;
pub mod model;
pub mod projector;
pub mod selection;
pub mod swipe;
pub mod view;
pub mod watchdog;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::CoreConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub const SWIPE_THRESHOLD: f64 = -80.0;
pub const DRAG_SLOP: f64 = 5.0;
pub const LOADING_WATCHDOG_MS: u64 = 12_000;
pub const TAPPED_NOTIFICATIONS_KEY: &str = "tappedNotifications";
pub const READ_NOTIFICATIONS_KEY: &str = "readNotifications";
pub const REPORT_ROUTE_PREFIX: &str = "/report/";
pub const ATTACHMENT_CACHE_DIR: &str = "attachments";
pub const CACHE_NAME_HEX_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Authentication,
    NotFound,
    Storage,
    Deserialization,
    Validation,
    Backend,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Authentication => "AUTH_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Storage => "STORAGE_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Backend => "BACKEND_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::Storage | Self::Backend => {
                ErrorSeverity::Transient
            }
            Self::Authentication
            | Self::NotFound
            | Self::Deserialization
            | Self::Validation
            | Self::Unknown => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::Storage | Self::Backend
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Authentication => "Your session has expired. Please sign in again.".into(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Storage => "Unable to read data saved on this device.".into(),
            ErrorKind::Deserialization => {
                "A data error occurred. Please contact support if this persists.".into()
            }
            ErrorKind::Validation | ErrorKind::Backend => self.message.clone(),
            ErrorKind::Unknown => {
                "An unexpected error occurred. Please try again or contact support.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
