//! Local cache for report attachments (audio clips and PDFs).
//!
//! A remote URL maps to a stable file path; the shell checks whether the
//! file exists and downloads it on a miss.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::CACHE_NAME_HEX_LEN;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Audio,
    Pdf,
}

impl AttachmentKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "mp3" | "m4a" | "aac" | "wav" | "ogg" => Some(Self::Audio),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    fn dir_name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AttachmentError {
    #[error("invalid attachment url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported attachment type {extension:?}")]
    Unsupported { extension: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CachedAttachment {
    pub kind: AttachmentKind,
    pub path: String,
}

/// Derives the cache location for `raw_url` under `cache_dir`.
pub fn cache_location(raw_url: &str, cache_dir: &str) -> Result<CachedAttachment, AttachmentError> {
    let url = Url::parse(raw_url).map_err(|e| AttachmentError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(AttachmentError::InvalidUrl {
            url: raw_url.to_string(),
            reason: format!("scheme {} is not allowed", url.scheme()),
        });
    }

    let extension = url
        .path_segments()
        .and_then(|segments| segments.last())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let kind = AttachmentKind::from_extension(&extension)
        .ok_or_else(|| AttachmentError::Unsupported {
            extension: extension.clone(),
        })?;

    let hex = blake3::hash(url.as_str().as_bytes()).to_hex();
    let name = &hex[..CACHE_NAME_HEX_LEN];
    Ok(CachedAttachment {
        kind,
        path: format!(
            "{}/{}/{name}.{extension}",
            cache_dir.trim_end_matches('/'),
            kind.dir_name()
        ),
    })
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttachmentState {
    Checking,
    Downloading,
    Ready { path: String, kind: AttachmentKind },
    Failed { reason: String },
}

/// Per-URL cache status shown to the shell.
#[derive(Debug, Default)]
pub struct AttachmentCache {
    entries: BTreeMap<String, AttachmentState>,
}

impl AttachmentCache {
    pub fn set(&mut self, url: &str, state: AttachmentState) {
        self.entries.insert(url.to_string(), state);
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<&AttachmentState> {
        self.entries.get(url)
    }

    /// True when a lookup or download for `url` is already running.
    #[must_use]
    pub fn is_pending(&self, url: &str) -> bool {
        matches!(
            self.entries.get(url),
            Some(AttachmentState::Checking | AttachmentState::Downloading)
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttachmentState)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_and_pdf_are_classified() {
        let audio = cache_location("https://cdn.example.com/r/42/clip.M4A", "attachments").unwrap();
        assert_eq!(audio.kind, AttachmentKind::Audio);
        assert!(audio.path.starts_with("attachments/audio/"));
        assert!(audio.path.ends_with(".m4a"));

        let pdf = cache_location("https://cdn.example.com/r/42/report.pdf?token=x", "attachments/")
            .unwrap();
        assert_eq!(pdf.kind, AttachmentKind::Pdf);
        assert!(pdf.path.starts_with("attachments/pdf/"));
    }

    #[test]
    fn path_is_stable_and_url_specific() {
        let a1 = cache_location("https://cdn.example.com/a.pdf", "c").unwrap();
        let a2 = cache_location("https://cdn.example.com/a.pdf", "c").unwrap();
        let b = cache_location("https://cdn.example.com/b.pdf", "c").unwrap();
        assert_eq!(a1, a2);
        assert_ne!(a1.path, b.path);
        let file = a1.path.rsplit('/').next().unwrap();
        assert_eq!(file.len(), CACHE_NAME_HEX_LEN + ".pdf".len());
    }

    #[test]
    fn rejects_bad_urls_and_types() {
        assert!(matches!(
            cache_location("not a url", "c"),
            Err(AttachmentError::InvalidUrl { .. })
        ));
        assert!(matches!(
            cache_location("file:///etc/passwd.pdf", "c"),
            Err(AttachmentError::InvalidUrl { .. })
        ));
        assert_eq!(
            cache_location("https://cdn.example.com/photo.jpg", "c"),
            Err(AttachmentError::Unsupported {
                extension: "jpg".into()
            })
        );
    }

    #[test]
    fn pending_states() {
        let mut cache = AttachmentCache::default();
        cache.set("u", AttachmentState::Checking);
        assert!(cache.is_pending("u"));
        cache.set(
            "u",
            AttachmentState::Ready {
                path: "p".into(),
                kind: AttachmentKind::Pdf,
            },
        );
        assert!(!cache.is_pending("u"));
        assert!(!cache.is_pending("other"));
    }
}
