//! On-demand network reachability probe.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReachabilityOperation {
    Check,
}

/// What the platform network-info API reports. `internet_reachable` is
/// `None` while the platform has not finished probing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReachabilityStatus {
    pub connected: bool,
    #[serde(default)]
    pub internet_reachable: Option<bool>,
}

impl ReachabilityStatus {
    /// Connected, and not known to be cut off from the internet.
    #[must_use]
    pub fn is_reachable(self) -> bool {
        self.connected && self.internet_reachable != Some(false)
    }
}

impl Operation for ReachabilityOperation {
    type Output = ReachabilityStatus;
}

pub struct Reachability<Ev> {
    context: CapabilityContext<ReachabilityOperation, Ev>,
}

impl<Ev> Clone for Reachability<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Reachability<Ev> {
    type Operation = ReachabilityOperation;
    type MappedSelf<MappedEv> = Reachability<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Reachability::new(self.context.map_event(f))
    }
}

impl<Ev> Reachability<Ev> {
    pub fn new(context: CapabilityContext<ReachabilityOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Reachability<Ev>
where
    Ev: 'static,
{
    pub fn check<F>(&self, make_event: F)
    where
        F: FnOnce(ReachabilityStatus) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let status = ctx.request_from_shell(ReachabilityOperation::Check).await;
            ctx.update_app(make_event(status));
        });
    }
}
