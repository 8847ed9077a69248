//! File cache operations for report attachments. Paths are produced by
//! [`crate::attachments::cache_location`]; the shell resolves them against
//! its cache root.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum FileCacheOperation {
    Exists { path: String },
    Download { url: String, path: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum FileCacheOutput {
    Exists(bool),
    Downloaded,
    Failed { message: String },
}

impl FileCacheOutput {
    /// Existence check result. A failed check counts as a miss.
    #[must_use]
    pub fn exists(&self) -> bool {
        matches!(self, Self::Exists(true))
    }

    pub fn into_downloaded(self) -> Result<(), String> {
        match self {
            Self::Downloaded => Ok(()),
            Self::Failed { message } => Err(message),
            Self::Exists(_) => Err("unexpected existence result for download".into()),
        }
    }
}

impl Operation for FileCacheOperation {
    type Output = FileCacheOutput;
}

pub struct FileCache<Ev> {
    context: CapabilityContext<FileCacheOperation, Ev>,
}

impl<Ev> Clone for FileCache<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for FileCache<Ev> {
    type Operation = FileCacheOperation;
    type MappedSelf<MappedEv> = FileCache<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        FileCache::new(self.context.map_event(f))
    }
}

impl<Ev> FileCache<Ev> {
    pub fn new(context: CapabilityContext<FileCacheOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> FileCache<Ev>
where
    Ev: 'static,
{
    pub fn exists<F>(&self, path: String, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(FileCacheOperation::Exists { path })
                .await;
            ctx.update_app(make_event(output.exists()));
        });
    }

    pub fn download<F>(&self, url: String, path: String, make_event: F)
    where
        F: FnOnce(Result<(), String>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(FileCacheOperation::Download { url, path })
                .await;
            ctx.update_app(make_event(output.into_downloaded()));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_check_is_a_miss() {
        assert!(FileCacheOutput::Exists(true).exists());
        assert!(!FileCacheOutput::Exists(false).exists());
        assert!(!FileCacheOutput::Failed {
            message: "eacces".into()
        }
        .exists());
    }

    #[test]
    fn download_result() {
        assert_eq!(FileCacheOutput::Downloaded.into_downloaded(), Ok(()));
        assert_eq!(
            FileCacheOutput::Failed {
                message: "404".into()
            }
            .into_downloaded(),
            Err("404".to_string())
        );
    }
}
