//! Local tapped/read flag sets.
//!
//! Each set lives under its own key in device key-value storage as a JSON
//! array of notification ids. Loading never fails: anything missing or
//! unreadable decodes to an empty set and is only logged.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::config::CoreConfig;
use crate::model::NotificationId;

pub type FlagSet = HashSet<NotificationId>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Unread dot cleared by opening the notification.
    Tapped,
    /// Explicit "mark as read" toggle from the long-press menu.
    Read,
}

impl FlagKind {
    pub const ALL: [FlagKind; 2] = [FlagKind::Tapped, FlagKind::Read];

    #[must_use]
    pub fn storage_key(self, config: &CoreConfig) -> &str {
        match self {
            FlagKind::Tapped => &config.tapped_key,
            FlagKind::Read => &config.read_key,
        }
    }
}

#[derive(Debug, Error)]
pub enum FlagStoreError {
    #[error("storage read failed for {key}: {message}")]
    Storage { key: String, message: String },

    #[error("corrupt flag set under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode flag set: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Parses a stored value. `None` (key never written) is an empty set.
pub fn decode(key: &str, bytes: Option<&[u8]>) -> Result<FlagSet, FlagStoreError> {
    let Some(bytes) = bytes else {
        return Ok(FlagSet::new());
    };
    if bytes.is_empty() {
        return Ok(FlagSet::new());
    }
    let ids: Vec<String> = serde_json::from_slice(bytes).map_err(|source| {
        FlagStoreError::Corrupt {
            key: key.to_string(),
            source,
        }
    })?;
    Ok(ids.into_iter().map(NotificationId).collect())
}

/// Fail-open load: storage errors and corrupt payloads both yield an empty set.
pub fn decode_or_empty(key: &str, result: Result<Option<Vec<u8>>, String>) -> FlagSet {
    let decoded = result
        .map_err(|message| FlagStoreError::Storage {
            key: key.to_string(),
            message,
        })
        .and_then(|bytes| decode(key, bytes.as_deref()));

    match decoded {
        Ok(set) => {
            tracing::debug!(key, count = set.len(), "flag set loaded");
            set
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "flag set unreadable, using empty set");
            FlagSet::new()
        }
    }
}

/// Sorted JSON array so equal sets always produce identical bytes.
pub fn encode(set: &FlagSet) -> Result<Vec<u8>, FlagStoreError> {
    let mut ids: Vec<&str> = set.iter().map(NotificationId::as_str).collect();
    ids.sort_unstable();
    Ok(serde_json::to_vec(&ids)?)
}

/// Adds `id`. Returns true when the set changed.
pub fn mark(set: &mut FlagSet, id: &NotificationId) -> bool {
    set.insert(id.clone())
}

/// Flips membership of `id`. Returns the new membership.
pub fn toggle(set: &mut FlagSet, id: &NotificationId) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.clone());
        true
    }
}
