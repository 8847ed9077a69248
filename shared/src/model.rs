use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::alert::AlertHost;
use crate::attachments::AttachmentCache;
use crate::config::CoreConfig;
use crate::flag_store::FlagSet;
use crate::guard::GuardTracker;
use crate::lifecycle::{FetchSequence, ScreenLifecycle};
use crate::selection::SelectionController;
use crate::swipe::SwipeBoard;
use crate::watchdog::LoadingWatchdog;
use crate::AppError;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(NotificationId);
typed_id!(UserId);
typed_id!(ReportId);

/// Report ids arrive as integers from some tables and as strings from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for ReportId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        }
    }
}

fn report_id<'de, D: Deserializer<'de>>(d: D) -> Result<ReportId, D::Error> {
    RawId::deserialize(d).map(ReportId::from)
}

fn optional_report_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ReportId>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(ReportId::from))
}

// --- Backend records ---

/// Row of the backend `notifications` table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Remote flag. Display uses the local tapped set instead.
    #[serde(default)]
    pub is_read: bool,
}

/// Subset of the backend `reports` table the guard needs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportSummary {
    #[serde(deserialize_with = "report_id")]
    pub id: ReportId,
    pub status: String,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ReportSummary {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("resolved")
    }
}

/// Subset of the backend `officers` table the guard needs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OfficerRecord {
    pub id: UserId,
    #[serde(default, deserialize_with = "optional_report_id")]
    pub assigned_report_id: Option<ReportId>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PushRegistrationState {
    #[default]
    Idle,
    RequestingPermission,
    FetchingToken,
    Registering,
    Registered,
    Denied,
    Failed,
}

/// In-memory state of the notifications screen. Nothing here is persisted
/// except the two flag sets, which go through the key-value capability.
#[derive(Debug, Default)]
pub struct Model {
    pub config: CoreConfig,
    pub user_id: Option<UserId>,
    pub screen: ScreenLifecycle,

    // Remote list + local flags
    pub notifications: Vec<NotificationRecord>,
    pub tapped: FlagSet,
    pub read: FlagSet,

    // Loading state
    pub is_loading: bool,
    pub fetches: FetchSequence,
    pub fetch_error: Option<AppError>,
    pub watchdog: LoadingWatchdog,

    // Interaction
    pub swipes: SwipeBoard,
    pub selection: SelectionController,
    pub guard: GuardTracker,
    pub alerts: AlertHost,

    pub attachments: AttachmentCache,
    pub push_registration: PushRegistrationState,

    pub now: DateTime<Utc>,
}

impl Model {
    pub fn update_timestamp(&mut self) {
        self.now = Utc::now();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Ids of the notifications currently shown, in display order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<NotificationId> {
        crate::projector::project(
            &self.notifications,
            self.user_id.as_ref(),
            &self.tapped,
            self.now,
        )
        .into_iter()
        .map(|item| item.id)
        .collect()
    }

    pub fn find_notification(&self, id: &NotificationId) -> Option<&NotificationRecord> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    /// Drops the record locally. Returns false when the id is not in the list.
    pub fn remove_notification(&mut self, id: &NotificationId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| &n.id != id);
        self.swipes.remove(id);
        self.notifications.len() != before
    }

    pub fn clear_session(&mut self) {
        self.user_id = None;
        self.notifications.clear();
        self.tapped.clear();
        self.read.clear();
        self.is_loading = false;
        self.fetch_error = None;
        self.watchdog.disarm();
        self.swipes.clear();
        self.selection.cancel();
        self.guard.cancel();
        self.push_registration = PushRegistrationState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_backend_row() {
        let json = r#"{
            "id": "n-1",
            "user_id": "u-1",
            "title": null,
            "body": "Report #42 has been updated",
            "created_at": "2026-10-19T08:30:00Z",
            "is_read": true
        }"#;
        let record: NotificationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, NotificationId::new("n-1"));
        assert_eq!(record.title, None);
        assert!(record.is_read);
    }

    #[test]
    fn missing_optional_columns_default() {
        let json = r#"{"id": "n-2", "user_id": "u-1", "created_at": "2026-10-19T08:30:00+02:00"}"#;
        let record: NotificationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.body, "");
        assert!(!record.is_read);
    }

    #[test]
    fn report_status_is_case_insensitive() {
        let report = ReportSummary {
            id: ReportId::new("42"),
            status: "Resolved".into(),
            resolved_at: None,
        };
        assert!(report.is_resolved());

        let report = ReportSummary {
            status: "in_progress".into(),
            ..report
        };
        assert!(!report.is_resolved());
    }

    #[test]
    fn numeric_assignment_is_read_as_text() {
        let officer: OfficerRecord =
            serde_json::from_str(r#"{"id": "u-1", "assigned_report_id": 42}"#).unwrap();
        assert_eq!(officer.assigned_report_id, Some(ReportId::new("42")));

        let officer: OfficerRecord =
            serde_json::from_str(r#"{"id": "u-1", "assigned_report_id": null}"#).unwrap();
        assert_eq!(officer.assigned_report_id, None);

        let officer: OfficerRecord = serde_json::from_str(r#"{"id": "u-1"}"#).unwrap();
        assert_eq!(officer.assigned_report_id, None);
    }

    #[test]
    fn remove_absent_notification_is_noop() {
        let mut model = Model::default();
        model.notifications.push(NotificationRecord {
            id: NotificationId::new("a"),
            user_id: UserId::new("u"),
            title: None,
            body: String::new(),
            created_at: DateTime::<Utc>::default(),
            is_read: false,
        });
        assert!(!model.remove_notification(&NotificationId::new("x")));
        assert_eq!(model.notifications.len(), 1);
    }
}
