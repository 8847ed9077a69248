use serde::{Deserialize, Serialize};

use crate::attachments::AttachmentKind;
use crate::capabilities::{
    BackendResult, DeleteOutcome, PermissionState, PushResult, ReachabilityStatus,
};
use crate::config::CoreConfig;
use crate::flag_store::FlagKind;
use crate::lifecycle::Epoch;
use crate::model::{NotificationId, NotificationRecord, OfficerRecord, ReportId, ReportSummary, UserId};

/// Why a reachability probe was issued.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReachabilityPurpose {
    /// Polled once when the list enters a loading state.
    Loading,
    /// Manual retry from the connectivity banner.
    Retry,
}

// --- Event enum: large payloads boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Setup & session
    Configure(Box<CoreConfig>),
    SessionStarted {
        user_id: UserId,
    },
    SessionEnded,

    // Screen lifecycle
    ScreenMounted,
    ScreenFocused,
    ScreenUnmounted,
    AlertHostMounted,
    AlertHostUnmounted,
    AlertDismissed,

    // Local flags
    FlagsLoaded {
        kind: FlagKind,
        epoch: Epoch,
        result: Result<Option<Vec<u8>>, String>,
    },
    FlagsSaved {
        kind: FlagKind,
        result: Result<(), String>,
    },

    // List loading
    RefreshRequested,
    NotificationsFetched {
        epoch: Epoch,
        request: u64,
        result: Box<BackendResult<Vec<NotificationRecord>>>,
    },
    ReachabilityChecked {
        epoch: Epoch,
        purpose: ReachabilityPurpose,
        status: ReachabilityStatus,
    },
    WatchdogFired {
        token: u64,
    },
    RetryRequested,

    // Row interaction
    NotificationTapped {
        id: NotificationId,
    },
    ToggleReadRequested {
        id: NotificationId,
    },
    SwipeMoved {
        id: NotificationId,
        dx: f64,
    },
    SwipeReleased {
        id: NotificationId,
        dx: f64,
    },
    DeleteRequested {
        id: NotificationId,
    },
    NotificationDeleted {
        epoch: Epoch,
        id: NotificationId,
        result: BackendResult<()>,
    },

    // Selection & bulk delete
    SelectionModeEntered,
    SelectionCancelled,
    SelectAllToggled,
    BulkDeleteRequested,
    BulkDeleteFinished {
        epoch: Epoch,
        outcomes: Vec<DeleteOutcome>,
    },

    // Navigation guard
    ReportStatusFetched {
        token: u64,
        report_id: ReportId,
        result: Box<BackendResult<Option<ReportSummary>>>,
    },
    AssignmentFetched {
        token: u64,
        report_id: ReportId,
        result: Box<BackendResult<Option<OfficerRecord>>>,
    },
    BackRequested,

    // Attachments
    AttachmentRequested {
        url: String,
    },
    AttachmentChecked {
        url: String,
        path: String,
        kind: AttachmentKind,
        exists: bool,
    },
    AttachmentDownloaded {
        url: String,
        path: String,
        kind: AttachmentKind,
        result: Result<(), String>,
    },

    // Push registration
    PushRegistrationRequested,
    PushPermissionResolved {
        result: PushResult<PermissionState>,
    },
    PushTokenReceived {
        result: PushResult<String>,
    },
    PushTokenRegistered {
        result: BackendResult<()>,
    },
    PushReceived,
}

impl Event {
    /// Stable name used as the `event` field in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::SessionStarted { .. } => "session_started",
            Self::SessionEnded => "session_ended",
            Self::ScreenMounted => "screen_mounted",
            Self::ScreenFocused => "screen_focused",
            Self::ScreenUnmounted => "screen_unmounted",
            Self::AlertHostMounted => "alert_host_mounted",
            Self::AlertHostUnmounted => "alert_host_unmounted",
            Self::AlertDismissed => "alert_dismissed",
            Self::FlagsLoaded { .. } => "flags_loaded",
            Self::FlagsSaved { .. } => "flags_saved",
            Self::RefreshRequested => "refresh_requested",
            Self::NotificationsFetched { .. } => "notifications_fetched",
            Self::ReachabilityChecked { .. } => "reachability_checked",
            Self::WatchdogFired { .. } => "watchdog_fired",
            Self::RetryRequested => "retry_requested",
            Self::NotificationTapped { .. } => "notification_tapped",
            Self::ToggleReadRequested { .. } => "toggle_read_requested",
            Self::SwipeMoved { .. } => "swipe_moved",
            Self::SwipeReleased { .. } => "swipe_released",
            Self::DeleteRequested { .. } => "delete_requested",
            Self::NotificationDeleted { .. } => "notification_deleted",
            Self::SelectionModeEntered => "selection_mode_entered",
            Self::SelectionCancelled => "selection_cancelled",
            Self::SelectAllToggled => "select_all_toggled",
            Self::BulkDeleteRequested => "bulk_delete_requested",
            Self::BulkDeleteFinished { .. } => "bulk_delete_finished",
            Self::ReportStatusFetched { .. } => "report_status_fetched",
            Self::AssignmentFetched { .. } => "assignment_fetched",
            Self::BackRequested => "back_requested",
            Self::AttachmentRequested { .. } => "attachment_requested",
            Self::AttachmentChecked { .. } => "attachment_checked",
            Self::AttachmentDownloaded { .. } => "attachment_downloaded",
            Self::PushRegistrationRequested => "push_registration_requested",
            Self::PushPermissionResolved { .. } => "push_permission_resolved",
            Self::PushTokenReceived { .. } => "push_token_received",
            Self::PushTokenRegistered { .. } => "push_token_registered",
            Self::PushReceived => "push_received",
        }
    }

    /// Events that come straight from a user gesture rather than from the
    /// shell answering a request.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::RefreshRequested
                | Self::RetryRequested
                | Self::NotificationTapped { .. }
                | Self::ToggleReadRequested { .. }
                | Self::SwipeReleased { .. }
                | Self::DeleteRequested { .. }
                | Self::SelectionModeEntered
                | Self::SelectionCancelled
                | Self::SelectAllToggled
                | Self::BulkDeleteRequested
                | Self::BackRequested
                | Self::AlertDismissed
                | Self::AttachmentRequested { .. }
                | Self::PushRegistrationRequested
        )
    }
}
