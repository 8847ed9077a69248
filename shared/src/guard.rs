//! Checks run before a notification tap opens its report.
//!
//! The chain is: extract `#<digits>` from the text, look up the report's
//! status, then the officer's assignment. Lookup failures never block
//! navigation.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::alert::Alert;
use crate::capabilities::BackendError;
use crate::model::{OfficerRecord, ReportId, ReportSummary};

static REPORT_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\d+)").expect("report reference pattern is valid"));

fn find_report_ref(text: &str) -> Option<ReportId> {
    REPORT_REF
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| ReportId::new(m.as_str()))
}

/// Body first, title as fallback.
#[must_use]
pub fn extract_report_id(title: Option<&str>, body: &str) -> Option<ReportId> {
    find_report_ref(body).or_else(|| title.and_then(find_report_ref))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardStep {
    ShowResolved {
        report_id: ReportId,
        resolved_at: Option<DateTime<Utc>>,
    },
    CheckAssignment,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Navigate(ReportId),
    Resolved {
        report_id: ReportId,
        resolved_at: Option<DateTime<Utc>>,
    },
    NotAssigned(ReportId),
}

impl GuardOutcome {
    #[must_use]
    pub fn alert(&self) -> Option<Alert> {
        match self {
            GuardOutcome::Navigate(_) => None,
            GuardOutcome::Resolved {
                report_id,
                resolved_at,
            } => {
                let when = resolved_at.map_or_else(
                    || "an unknown time".to_string(),
                    |t| t.format("%-m/%-d/%Y %H:%M UTC").to_string(),
                );
                Some(Alert::info(
                    "Report Resolved",
                    format!("Report #{report_id} was resolved on {when}."),
                ))
            }
            GuardOutcome::NotAssigned(report_id) => Some(Alert::info(
                "Not Assigned",
                format!("Report #{report_id} is not assigned to you."),
            )),
        }
    }
}

/// Status lookup result. Errors and unknown reports fall through to the
/// assignment check.
#[must_use]
pub fn after_status(
    report_id: &ReportId,
    result: &Result<Option<ReportSummary>, BackendError>,
) -> GuardStep {
    match result {
        Ok(Some(report)) if report.is_resolved() => GuardStep::ShowResolved {
            report_id: report_id.clone(),
            resolved_at: report.resolved_at,
        },
        Ok(_) => GuardStep::CheckAssignment,
        Err(e) => {
            tracing::warn!(%report_id, error = %e, "report status lookup failed, continuing");
            GuardStep::CheckAssignment
        }
    }
}

/// Assignment lookup result. Errors fail open toward navigation.
#[must_use]
pub fn after_assignment(
    report_id: &ReportId,
    result: &Result<Option<OfficerRecord>, BackendError>,
) -> GuardOutcome {
    match result {
        Ok(officer) => {
            let assigned = officer.as_ref().and_then(|o| o.assigned_report_id.as_ref());
            if assigned == Some(report_id) {
                GuardOutcome::Navigate(report_id.clone())
            } else {
                GuardOutcome::NotAssigned(report_id.clone())
            }
        }
        Err(e) => {
            tracing::warn!(%report_id, error = %e, "assignment lookup failed, navigating anyway");
            GuardOutcome::Navigate(report_id.clone())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardTicket {
    pub token: u64,
    pub report_id: ReportId,
}

/// Only the latest tap may finish its chain.
#[derive(Debug, Default)]
pub struct GuardTracker {
    issued: u64,
    pending: Option<GuardTicket>,
}

impl GuardTracker {
    pub fn begin(&mut self, report_id: ReportId) -> u64 {
        self.issued += 1;
        self.pending = Some(GuardTicket {
            token: self.issued,
            report_id,
        });
        self.issued
    }

    #[must_use]
    pub fn is_current(&self, token: u64) -> bool {
        self.pending.as_ref().is_some_and(|t| t.token == token)
    }

    #[must_use]
    pub fn pending(&self) -> Option<&GuardTicket> {
        self.pending.as_ref()
    }

    pub fn finish(&mut self, token: u64) -> Option<GuardTicket> {
        if self.is_current(token) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
