use serde::{Deserialize, Serialize};

/// Generation counter tagged onto every request the screen issues.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Epoch(pub u64);

/// Mounted guard for the notifications screen. Results that come back for
/// an older epoch, or while unmounted, must be dropped.
#[derive(Debug, Default)]
pub struct ScreenLifecycle {
    mounted: bool,
    epoch: Epoch,
}

impl ScreenLifecycle {
    pub fn mount(&mut self) -> Epoch {
        self.mounted = true;
        self.epoch = Epoch(self.epoch.0 + 1);
        self.epoch
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.epoch = Epoch(self.epoch.0 + 1);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub fn accepts(&self, epoch: Epoch) -> bool {
        self.mounted && epoch == self.epoch
    }
}

/// Numbers list fetches so only the most recent one may land. Retries and
/// session changes can overlap an in-flight request on the same epoch.
#[derive(Debug, Default)]
pub struct FetchSequence {
    issued: u64,
}

impl FetchSequence {
    pub fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    #[must_use]
    pub fn latest(&self) -> u64 {
        self.issued
    }

    #[must_use]
    pub fn is_latest(&self, request: u64) -> bool {
        request == self.issued
    }
}
