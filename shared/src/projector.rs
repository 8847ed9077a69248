//! Merges the remote notification list with local flags into display rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flag_store::FlagSet;
use crate::model::{NotificationId, NotificationRecord, UserId};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Assignment,
    Update,
    Alert,
    Info,
}

impl NotificationKind {
    /// Keyword match over title and body, first hit wins.
    #[must_use]
    pub fn classify(title: Option<&str>, body: &str) -> Self {
        let text = format!("{} {}", title.unwrap_or_default(), body).to_lowercase();
        if text.contains("assign") {
            Self::Assignment
        } else if text.contains("update") {
            Self::Update
        } else if text.contains("alert") || text.contains("urgent") {
            Self::Alert
        } else {
            Self::Info
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProjectedNotification {
    pub id: NotificationId,
    pub title: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub kind: NotificationKind,
    pub time_label: String,
}

/// Keeps the current user's records, overrides `is_read` with tapped-set
/// membership and orders newest first. Ties keep their input order.
#[must_use]
pub fn project(
    records: &[NotificationRecord],
    user_id: Option<&UserId>,
    tapped: &FlagSet,
    now: DateTime<Utc>,
) -> Vec<ProjectedNotification> {
    let Some(user_id) = user_id else {
        return Vec::new();
    };

    let mut items: Vec<ProjectedNotification> = records
        .iter()
        .filter(|record| &record.user_id == user_id)
        .map(|record| ProjectedNotification {
            id: record.id.clone(),
            title: record.title.clone(),
            body: record.body.clone(),
            created_at: record.created_at,
            is_read: tapped.contains(&record.id),
            kind: NotificationKind::classify(record.title.as_deref(), &record.body),
            time_label: format_relative_time(record.created_at, now),
        })
        .collect();

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

fn plural(n: i64, unit: &str, units: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {units} ago")
    }
}

#[must_use]
pub fn format_relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(created_at);

    let minutes = diff.num_minutes();
    if minutes < 1 {
        return "Just now".into();
    }
    if minutes < 60 {
        return plural(minutes, "min", "mins");
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return plural(hours, "hour", "hours");
    }

    let days = diff.num_days();
    if days < 7 {
        return plural(days, "day", "days");
    }

    created_at.format("%-m/%-d/%Y").to_string()
}
