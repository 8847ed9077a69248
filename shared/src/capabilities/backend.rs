//! Backend SDK capability.
//!
//! The shell owns the dispatch backend client (auth, transport). The core
//! only describes which table call it needs and gets back typed rows.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{NotificationId, NotificationRecord, OfficerRecord, ReportId, ReportSummary, UserId};
use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum BackendOperation {
    FetchNotifications { user_id: UserId },
    DeleteNotification { id: NotificationId },
    ReportStatus { report_id: ReportId },
    OfficerAssignment { user_id: UserId },
    RegisterPushToken { user_id: UserId, token: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackendError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("not authenticated")]
    Unauthorized,

    #[error("row not found")]
    NotFound,

    #[error("backend rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("unexpected response: {message}")]
    Decode { message: String },
}

impl BackendError {
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Timeout => ErrorKind::Timeout,
            Self::Unauthorized => ErrorKind::Authentication,
            Self::NotFound => ErrorKind::NotFound,
            Self::Rejected { .. } => ErrorKind::Backend,
            Self::Decode { .. } => ErrorKind::Deserialization,
        }
    }

    /// Wraps the error for display, keeping the raw text as internal detail.
    #[must_use]
    pub fn into_app_error(self, message: impl Into<String>) -> AppError {
        let internal = self.to_string();
        AppError::new(self.kind(), message).with_internal(internal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum BackendOutput {
    Notifications(Vec<NotificationRecord>),
    Deleted,
    Report(Option<ReportSummary>),
    Officer(Option<OfficerRecord>),
    PushTokenRegistered,
    Failed(BackendError),
}

pub type BackendResult<T> = Result<T, BackendError>;

fn unexpected(output: &BackendOutput) -> BackendError {
    BackendError::Decode {
        message: format!("unexpected backend output {output:?}"),
    }
}

impl BackendOutput {
    pub fn into_notifications(self) -> BackendResult<Vec<NotificationRecord>> {
        match self {
            Self::Notifications(rows) => Ok(rows),
            Self::Failed(e) => Err(e),
            other => Err(unexpected(&other)),
        }
    }

    pub fn into_deleted(self) -> BackendResult<()> {
        match self {
            Self::Deleted => Ok(()),
            Self::Failed(e) => Err(e),
            other => Err(unexpected(&other)),
        }
    }

    pub fn into_report(self) -> BackendResult<Option<ReportSummary>> {
        match self {
            Self::Report(report) => Ok(report),
            Self::Failed(e) => Err(e),
            other => Err(unexpected(&other)),
        }
    }

    pub fn into_officer(self) -> BackendResult<Option<OfficerRecord>> {
        match self {
            Self::Officer(officer) => Ok(officer),
            Self::Failed(e) => Err(e),
            other => Err(unexpected(&other)),
        }
    }

    pub fn into_push_registered(self) -> BackendResult<()> {
        match self {
            Self::PushTokenRegistered => Ok(()),
            Self::Failed(e) => Err(e),
            other => Err(unexpected(&other)),
        }
    }
}

impl Operation for BackendOperation {
    type Output = BackendOutput;
}

/// Per-id result of a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: NotificationId,
    pub result: BackendResult<()>,
}

pub struct Backend<Ev> {
    context: CapabilityContext<BackendOperation, Ev>,
}

impl<Ev> Clone for Backend<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Backend<Ev> {
    type Operation = BackendOperation;
    type MappedSelf<MappedEv> = Backend<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Backend::new(self.context.map_event(f))
    }
}

impl<Ev> Backend<Ev> {
    pub fn new(context: CapabilityContext<BackendOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Backend<Ev>
where
    Ev: 'static,
{
    fn request<T, F, G>(&self, operation: BackendOperation, convert: G, make_event: F)
    where
        G: FnOnce(BackendOutput) -> BackendResult<T> + Send + 'static,
        F: FnOnce(BackendResult<T>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(convert(output)));
        });
    }

    pub fn fetch_notifications<F>(&self, user_id: UserId, make_event: F)
    where
        F: FnOnce(BackendResult<Vec<NotificationRecord>>) -> Ev + Send + 'static,
    {
        self.request(
            BackendOperation::FetchNotifications { user_id },
            BackendOutput::into_notifications,
            make_event,
        );
    }

    pub fn delete_notification<F>(&self, id: NotificationId, make_event: F)
    where
        F: FnOnce(BackendResult<()>) -> Ev + Send + 'static,
    {
        self.request(
            BackendOperation::DeleteNotification { id },
            BackendOutput::into_deleted,
            make_event,
        );
    }

    /// Deletes one id at a time, each awaited before the next. A failure is
    /// recorded and the loop moves on.
    pub fn delete_notifications<F>(&self, ids: Vec<NotificationId>, make_event: F)
    where
        F: FnOnce(Vec<DeleteOutcome>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let mut outcomes = Vec::with_capacity(ids.len());
            for id in ids {
                let output = ctx
                    .request_from_shell(BackendOperation::DeleteNotification { id: id.clone() })
                    .await;
                outcomes.push(DeleteOutcome {
                    id,
                    result: output.into_deleted(),
                });
            }
            ctx.update_app(make_event(outcomes));
        });
    }

    pub fn report_status<F>(&self, report_id: ReportId, make_event: F)
    where
        F: FnOnce(BackendResult<Option<ReportSummary>>) -> Ev + Send + 'static,
    {
        self.request(
            BackendOperation::ReportStatus { report_id },
            BackendOutput::into_report,
            make_event,
        );
    }

    pub fn officer_assignment<F>(&self, user_id: UserId, make_event: F)
    where
        F: FnOnce(BackendResult<Option<OfficerRecord>>) -> Ev + Send + 'static,
    {
        self.request(
            BackendOperation::OfficerAssignment { user_id },
            BackendOutput::into_officer,
            make_event,
        );
    }

    pub fn register_push_token<F>(&self, user_id: UserId, token: String, make_event: F)
    where
        F: FnOnce(BackendResult<()>) -> Ev + Send + 'static,
    {
        self.request(
            BackendOperation::RegisterPushToken { user_id, token },
            BackendOutput::into_push_registered,
            make_event,
        );
    }
}
