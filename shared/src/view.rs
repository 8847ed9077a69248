use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::Alert;
use crate::attachments::AttachmentState;
use crate::model::{Model, NotificationId, PushRegistrationState};
use crate::projector::{self, NotificationKind};
use crate::swipe::{SwipeGeometry, SwipePhase};
use crate::{AppError, ErrorSeverity};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotificationRow {
    pub id: NotificationId,
    pub title: Option<String>,
    pub body: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub time_label: String,
    /// Drives the unread dot. Mirrors the local tapped set, not the
    /// backend's `is_read` column.
    pub is_read: bool,
    pub swipe_phase: SwipePhase,
    pub swipe_offset: f64,
    /// Offset the row's animation should settle on.
    pub swipe_target: f64,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttachmentView {
    pub url: String,
    pub state: AttachmentState,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewModel {
    pub is_authenticated: bool,
    pub rows: Vec<NotificationRow>,
    pub unread_count: usize,
    pub is_loading: bool,
    pub error: Option<UserFacingError>,
    pub connection_message: Option<String>,
    pub selection_mode: bool,
    pub selected_count: usize,
    pub all_selected: bool,
    pub bulk_delete_in_flight: bool,
    pub alert: Option<Alert>,
    pub attachments: Vec<AttachmentView>,
    pub push_registration: PushRegistrationState,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let geometry = SwipeGeometry::from_config(&model.config);
        let projected = projector::project(
            &model.notifications,
            model.user_id.as_ref(),
            &model.tapped,
            model.now,
        );
        let visible: Vec<NotificationId> = projected.iter().map(|p| p.id.clone()).collect();
        let selecting = model.selection.is_active();

        let rows: Vec<NotificationRow> = projected
            .into_iter()
            .map(|item| {
                let swipe = model.swipes.state(&item.id);
                let is_selected = selecting && model.selection.contains(&item.id);
                NotificationRow {
                    title: item.title,
                    body: item.body,
                    kind: item.kind,
                    created_at: item.created_at,
                    time_label: item.time_label,
                    is_read: item.is_read,
                    swipe_phase: swipe.phase(),
                    swipe_offset: swipe.offset(),
                    swipe_target: swipe.target_offset(geometry),
                    is_selected,
                    id: item.id,
                }
            })
            .collect();

        Self {
            is_authenticated: model.is_authenticated(),
            unread_count: rows.iter().filter(|r| !r.is_read).count(),
            rows,
            is_loading: model.is_loading,
            error: model.fetch_error.as_ref().map(UserFacingError::from),
            connection_message: model.watchdog.message().map(str::to_string),
            selection_mode: selecting,
            selected_count: model.selection.len(),
            all_selected: selecting && model.selection.all_selected(&visible),
            bulk_delete_in_flight: model.selection.is_busy(),
            alert: model.alerts.current().cloned(),
            attachments: model
                .attachments
                .iter()
                .map(|(url, state)| AttachmentView {
                    url: url.clone(),
                    state: state.clone(),
                })
                .collect(),
            push_registration: model.push_registration,
        }
    }
}
